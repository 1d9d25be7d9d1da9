pub mod attendance;
pub mod role;
pub mod user;

pub use attendance::AttendanceEntry;
pub use role::Role;
pub use user::UserAccount;
