//! Administrative record CRUD. None of these enforce the one-entry-per-day
//! rule, and update/delete act on every row matching (username, date).

use tracing::{info, instrument};

use crate::error::{ServiceError, ServiceResult};
use crate::model::{AttendanceEntry, UserAccount};
use crate::models::RecordReq;
use crate::state::AppState;
use crate::utils::time::{format_date, today};

#[instrument(skip(state, actor, record), fields(admin = %actor.username, username = %record.username))]
pub fn add_record(state: &AppState, actor: &UserAccount, record: RecordReq) -> ServiceResult<AttendanceEntry> {
    actor.require_admin("adding a record")?;

    let RecordReq {
        username,
        date,
        check_in,
        check_out,
    } = record;
    let date = if date.is_empty() { format_date(today()) } else { date };

    let entry = AttendanceEntry {
        username,
        date,
        check_in,
        check_out,
    };

    state.store.transaction(|s| {
        s.attendance.push(entry.clone());
        Ok::<_, ServiceError>(())
    })?;

    info!(date = %entry.date, "Record added");
    Ok(entry)
}

/// Overwrite both times on every row for (username, date). Returns how many
/// rows changed; zero is not an error.
#[instrument(skip(state, actor), fields(admin = %actor.username))]
pub fn update_record(
    state: &AppState,
    actor: &UserAccount,
    username: &str,
    date: &str,
    check_in: &str,
    check_out: &str,
) -> ServiceResult<usize> {
    actor.require_admin("updating a record")?;

    let updated = state.store.transaction(|s| {
        let mut updated = 0;
        for entry in s.attendance.iter_mut().filter(|e| e.matches(username, date)) {
            entry.check_in = check_in.to_owned();
            entry.check_out = check_out.to_owned();
            updated += 1;
        }
        Ok::<_, ServiceError>(updated)
    })?;

    info!(updated, "Records updated");
    Ok(updated)
}

/// Remove every row for (username, date). Returns how many were removed.
#[instrument(skip(state, actor), fields(admin = %actor.username))]
pub fn delete_record(state: &AppState, actor: &UserAccount, username: &str, date: &str) -> ServiceResult<usize> {
    actor.require_admin("deleting a record")?;

    let removed = state.store.transaction(|s| {
        let before = s.attendance.len();
        s.attendance.retain(|e| !e.matches(username, date));
        Ok::<_, ServiceError>(before - s.attendance.len())
    })?;

    info!(removed, "Records deleted");
    Ok(removed)
}
