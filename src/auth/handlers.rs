use tracing::{debug, info, instrument};

use crate::error::{ServiceError, ServiceResult};
use crate::model::UserAccount;
use crate::state::AppState;

/// Look up the account matching both username and password.
///
/// Inputs are trimmed the way the login form trims them. There is no lockout
/// and no rate limiting.
#[instrument(name = "auth_login", skip(state, password), fields(username = %username.trim()))]
pub fn authenticate(state: &AppState, username: &str, password: &str) -> ServiceResult<UserAccount> {
    let username = username.trim();
    let password = password.trim();

    debug!("Fetching user from store");

    let found = state.store.read(|s| {
        s.users
            .iter()
            .find(|u| u.username == username && state.credentials.verify(password, &u.password))
            .cloned()
    })?;

    match found {
        Some(user) => {
            info!(role = %user.role, "Login successful");
            Ok(user)
        }
        None => {
            info!("Invalid credentials");
            Err(ServiceError::AuthFailed)
        }
    }
}

/// Create a new `employee` account.
#[instrument(name = "auth_register", skip(state, password), fields(username = %username.trim()))]
pub fn register(state: &AppState, username: &str, password: &str) -> ServiceResult<UserAccount> {
    let username = username.trim();
    let password = password.trim();

    if username.is_empty() || password.is_empty() {
        info!("Validation failed: empty username or password");
        return Err(ServiceError::ValidationFailed(
            "username and password must not be empty".to_string(),
        ));
    }

    let account = UserAccount::employee(username, state.credentials.encode(password));

    state.store.transaction(|s| {
        if s.find_user(username).is_some() {
            info!("Username already taken");
            return Err(ServiceError::UsernameTaken(username.to_owned()));
        }
        s.users.push(account.clone());
        Ok(())
    })?;

    info!("Employee registered");
    Ok(account)
}
