use serde::{Deserialize, Serialize};

/// One attendance row. Dates and times stay as the strings the store holds:
/// the admin path may write anything into them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEntry {
    pub username: String,
    pub date: String,
    /// `HH:MM:SS`, empty until checked in.
    #[serde(default)]
    pub check_in: String,
    /// `HH:MM:SS`, empty until checked out.
    #[serde(default)]
    pub check_out: String,
}

impl AttendanceEntry {
    pub fn checked_in(username: &str, date: &str, check_in: String) -> Self {
        Self {
            username: username.to_owned(),
            date: date.to_owned(),
            check_in,
            check_out: String::new(),
        }
    }

    /// Entries are matched by value on (username, date); there is no row id.
    pub fn matches(&self, username: &str, date: &str) -> bool {
        self.username == username && self.date == date
    }
}
