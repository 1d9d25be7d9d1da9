pub mod attendance;
pub mod records;
