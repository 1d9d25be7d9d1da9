/// Which attendance rows a listing covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttendanceScope {
    All,
    User(String),
}

/// Admin-supplied row for `add_record`. An empty `date` means today.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordReq {
    pub username: String,
    pub date: String,
    pub check_in: String,
    pub check_out: String,
}
