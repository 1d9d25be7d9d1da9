use std::path::Path;

use tracing::info;

use crate::store::{Store, StoreError};

/// Open the store at `data_file`, seeding it on first run.
pub fn init_db(data_file: &Path) -> Result<Store, StoreError> {
    let store = Store::open(data_file)?;

    if store.initialize()? {
        info!(path = %store.path().display(), "created new attendance store");
    }

    Ok(store)
}
