use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::{AttendanceEntry, UserAccount};

pub const SEED_ADMIN_USERNAME: &str = "admin";
pub const SEED_ADMIN_PASSWORD: &str = "admin123";

/// Everything the store persists. Field order is the on-disk key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreState {
    pub users: Vec<UserAccount>,
    pub attendance: Vec<AttendanceEntry>,
}

impl StoreState {
    /// First-run state: a single admin and no attendance.
    pub fn seeded() -> Self {
        Self {
            users: vec![UserAccount::admin(SEED_ADMIN_USERNAME, SEED_ADMIN_PASSWORD)],
            attendance: Vec::new(),
        }
    }

    pub fn find_user(&self, username: &str) -> Option<&UserAccount> {
        self.users.iter().find(|u| u.username == username)
    }

    /// Shape checks serde cannot express.
    pub(crate) fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::with_capacity(self.users.len());
        for user in &self.users {
            if user.username.is_empty() {
                return Err("user account with empty username".to_string());
            }
            if !seen.insert(user.username.as_str()) {
                return Err(format!("duplicate username '{}'", user.username));
            }
        }

        if !self.users.iter().any(UserAccount::is_admin) {
            return Err("no admin account".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_state_is_valid() {
        let state = StoreState::seeded();
        assert!(state.validate().is_ok());
        assert_eq!(state.users.len(), 1);
        assert!(state.users[0].is_admin());
        assert!(state.attendance.is_empty());
    }

    #[test]
    fn rejects_duplicate_usernames() {
        let mut state = StoreState::seeded();
        state.users.push(UserAccount::employee("admin", "other"));
        let err = state.validate().unwrap_err();
        assert!(err.contains("duplicate"));
    }

    #[test]
    fn usernames_are_case_sensitive() {
        let mut state = StoreState::seeded();
        state.users.push(UserAccount::employee("Admin", "x"));
        assert!(state.validate().is_ok());
    }

    #[test]
    fn rejects_state_without_admin() {
        let state = StoreState {
            users: vec![UserAccount::employee("alice", "pw")],
            attendance: Vec::new(),
        };
        assert_eq!(state.validate().unwrap_err(), "no admin account");
    }

    #[test]
    fn rejects_empty_username() {
        let mut state = StoreState::seeded();
        state.users.push(UserAccount::employee("", "pw"));
        assert!(state.validate().is_err());
    }

    #[test]
    fn orphaned_entries_are_tolerated() {
        let mut state = StoreState::seeded();
        state
            .attendance
            .push(AttendanceEntry::checked_in("ghost", "2024-01-01", "08:00:00".into()));
        assert!(state.validate().is_ok());
    }
}
