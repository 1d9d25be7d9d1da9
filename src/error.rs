use derive_more::Display;
use tracing::error;

use crate::store::StoreError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Outcomes a caller of the session layer has to handle. Everything except
/// `StoreUnavailable` is an expected, user-correctable condition.
#[derive(Debug, Display)]
pub enum ServiceError {
    #[display(fmt = "attendance store unavailable")]
    StoreUnavailable(StoreError),
    #[display(fmt = "invalid username or password")]
    AuthFailed,
    #[display(fmt = "username '{}' already exists", _0)]
    UsernameTaken(String),
    #[display(fmt = "{}", _0)]
    ValidationFailed(String),
    #[display(fmt = "already checked in on {}", _0)]
    AlreadyCheckedIn(String),
    #[display(fmt = "no check-in found for {}", _0)]
    NoOpenCheckIn(String),
    #[display(fmt = "{} requires an admin account", _0)]
    Forbidden(&'static str),
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::StoreUnavailable(e) => Some(e),
            _ => None,
        }
    }
}

// Every store failure reaching the session layer passes through here.
impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        error!(error = %e, "store transaction failed");
        ServiceError::StoreUnavailable(e)
    }
}
