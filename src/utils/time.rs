use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// One reading of the local clock; take both date and time from it.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Whole seconds only; sub-second precision is dropped.
pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}
