use std::path::Path;
use std::sync::Arc;

use crate::auth::password::{CredentialCheck, PlaintextCredentials};
use crate::store::Store;

/// What every session operation needs: the store and the credential check.
/// The store stays private to the crate so callers go through the session
/// operations.
#[derive(Clone)]
pub struct AppState {
    pub(crate) store: Store,
    pub credentials: Arc<dyn CredentialCheck>,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self::from_parts(store, Arc::new(PlaintextCredentials))
    }

    pub fn from_parts(store: Store, credentials: Arc<dyn CredentialCheck>) -> Self {
        Self { store, credentials }
    }

    pub fn data_file(&self) -> &Path {
        self.store.path()
    }
}

#[cfg(test)]
impl AppState {
    /// Fresh seeded store in a temp dir. Keep the `TempDir` alive for the test.
    pub(crate) fn fake() -> (Self, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = crate::db::init_db(&dir.path().join("attendance_data.json"))
            .expect("seeded store");
        (Self::new(store), dir)
    }

    pub(crate) fn admin() -> crate::model::UserAccount {
        use crate::store::state::{SEED_ADMIN_PASSWORD, SEED_ADMIN_USERNAME};
        crate::model::UserAccount::admin(SEED_ADMIN_USERNAME, SEED_ADMIN_PASSWORD)
    }
}
