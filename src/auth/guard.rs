use crate::error::{ServiceError, ServiceResult};
use crate::model::UserAccount;

impl UserAccount {
    /// Gate for the administrative path. `action` names the operation in the error.
    pub fn require_admin(&self, action: &'static str) -> ServiceResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(action))
        }
    }

    /// Admins see everyone's records, employees only their own.
    pub fn can_view(&self, username: &str) -> bool {
        self.is_admin() || self.username == username
    }
}
