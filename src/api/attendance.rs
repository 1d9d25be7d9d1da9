//! Self-service check-in / check-out and attendance listing.

use chrono::NaiveDateTime;
use tracing::{info, instrument};

use crate::error::{ServiceError, ServiceResult};
use crate::model::{AttendanceEntry, UserAccount};
use crate::models::AttendanceScope;
use crate::state::AppState;
use crate::utils::time::{format_date, format_time, now};

/// Check in at the current local time. Date and time come from one clock
/// reading.
pub fn check_in(state: &AppState, username: &str) -> ServiceResult<AttendanceEntry> {
    check_in_at(state, username, now())
}

/// Open the day's entry for `username`. Any existing entry for that date,
/// checked out or not, counts as already checked in.
#[instrument(skip(state))]
pub fn check_in_at(state: &AppState, username: &str, at: NaiveDateTime) -> ServiceResult<AttendanceEntry> {
    let date = format_date(at.date());

    let entry = state.store.transaction(|s| {
        if s.attendance.iter().any(|e| e.matches(username, &date)) {
            info!("Already checked in today");
            return Err(ServiceError::AlreadyCheckedIn(date.clone()));
        }

        let entry = AttendanceEntry::checked_in(username, &date, format_time(at.time()));
        s.attendance.push(entry.clone());
        Ok(entry)
    })?;

    info!(check_in = %entry.check_in, "Checked in");
    Ok(entry)
}

/// Check out at the current local time.
pub fn check_out(state: &AppState, username: &str) -> ServiceResult<AttendanceEntry> {
    check_out_at(state, username, now())
}

/// Stamp `check_out` on the day's entry. With duplicate rows for the same
/// day only the first in stored order is touched. A second check-out
/// overwrites the earlier time.
#[instrument(skip(state))]
pub fn check_out_at(state: &AppState, username: &str, at: NaiveDateTime) -> ServiceResult<AttendanceEntry> {
    let date = format_date(at.date());

    let entry = state.store.transaction(|s| {
        let Some(entry) = s.attendance.iter_mut().find(|e| e.matches(username, &date)) else {
            info!("No check-in found for today");
            return Err(ServiceError::NoOpenCheckIn(date.clone()));
        };

        entry.check_out = format_time(at.time());
        Ok(entry.clone())
    })?;

    info!(check_out = %entry.check_out, "Checked out");
    Ok(entry)
}

/// Entries in stored order. `All` is admin-only; employees may list only
/// their own rows.
#[instrument(skip(state, viewer), fields(viewer = %viewer.username))]
pub fn list_attendance(
    state: &AppState,
    viewer: &UserAccount,
    scope: AttendanceScope,
) -> ServiceResult<Vec<AttendanceEntry>> {
    match scope {
        AttendanceScope::All => {
            viewer.require_admin("listing all attendance")?;
            Ok(state.store.read(|s| s.attendance.clone())?)
        }
        AttendanceScope::User(username) => {
            if !viewer.can_view(&username) {
                return Err(ServiceError::Forbidden("listing another user's attendance"));
            }
            let entries = state.store.read(|s| {
                s.attendance
                    .iter()
                    .filter(|e| e.username == username)
                    .cloned()
                    .collect()
            })?;
            Ok(entries)
        }
    }
}
