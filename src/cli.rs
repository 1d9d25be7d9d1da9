//! Command-line front end. Every command goes through the session layer.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use attendease::api::{attendance, records};
use attendease::auth::handlers::{authenticate, register};
use attendease::error::ServiceResult;
use attendease::model::{AttendanceEntry, UserAccount};
use attendease::models::{AttendanceScope, RecordReq};
use attendease::state::AppState;

#[derive(Parser)]
#[command(name = "attendease", version, about = "Employee attendance monitoring")]
pub struct Cli {
    /// Data file to use instead of ATTENDANCE_DATA_FILE
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args)]
pub struct Credentials {
    #[arg(short, long)]
    username: String,
    #[arg(short, long)]
    password: String,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the data file with the default admin if it is missing
    Init,
    /// Register a new employee account
    Register { username: String, password: String },
    /// Log in and show the records visible to the account
    Login { username: String, password: String },
    /// Check in for today
    CheckIn(Credentials),
    /// Check out for today
    CheckOut(Credentials),
    /// Show your records (all records for an admin)
    Records(Credentials),
    /// Append a record (admin)
    AddRecord {
        #[command(flatten)]
        login: Credentials,
        #[arg(long)]
        employee: String,
        /// Defaults to today
        #[arg(long, default_value = "")]
        date: String,
        #[arg(long, default_value = "")]
        check_in: String,
        #[arg(long, default_value = "")]
        check_out: String,
    },
    /// Overwrite the times of every record for an employee and date (admin)
    UpdateRecord {
        #[command(flatten)]
        login: Credentials,
        #[arg(long)]
        employee: String,
        #[arg(long)]
        date: String,
        #[arg(long, default_value = "")]
        check_in: String,
        #[arg(long, default_value = "")]
        check_out: String,
    },
    /// Delete every record for an employee and date (admin)
    DeleteRecord {
        #[command(flatten)]
        login: Credentials,
        #[arg(long)]
        employee: String,
        #[arg(long)]
        date: String,
    },
}

impl Credentials {
    fn authenticate(&self, state: &AppState) -> ServiceResult<UserAccount> {
        authenticate(state, &self.username, &self.password)
    }
}

pub fn run(state: &AppState, command: Command) -> ServiceResult<()> {
    match command {
        Command::Init => {
            println!("Attendance store ready at {}", state.data_file().display());
        }
        Command::Register { username, password } => {
            let account = register(state, &username, &password)?;
            println!("Employee {} registered successfully!", account.username);
        }
        Command::Login { username, password } => {
            let user = authenticate(state, &username, &password)?;
            if user.is_admin() {
                println!("Admin panel: all attendance records");
            } else {
                println!("Welcome, {}", user.username);
            }
            print_records(&visible_records(state, &user)?);
        }
        Command::CheckIn(login) => {
            let user = login.authenticate(state)?;
            let entry = attendance::check_in(state, &user.username)?;
            println!("Checked in on {} at {}", entry.date, entry.check_in);
        }
        Command::CheckOut(login) => {
            let user = login.authenticate(state)?;
            let entry = attendance::check_out(state, &user.username)?;
            println!("Checked out on {} at {}", entry.date, entry.check_out);
        }
        Command::Records(login) => {
            let user = login.authenticate(state)?;
            print_records(&visible_records(state, &user)?);
        }
        Command::AddRecord {
            login,
            employee,
            date,
            check_in,
            check_out,
        } => {
            let admin = login.authenticate(state)?;
            let entry = records::add_record(
                state,
                &admin,
                RecordReq {
                    username: employee,
                    date,
                    check_in,
                    check_out,
                },
            )?;
            println!("Added record for {} on {}", entry.username, entry.date);
        }
        Command::UpdateRecord {
            login,
            employee,
            date,
            check_in,
            check_out,
        } => {
            let admin = login.authenticate(state)?;
            let n = records::update_record(state, &admin, &employee, &date, &check_in, &check_out)?;
            println!("Updated {n} record(s)");
        }
        Command::DeleteRecord {
            login,
            employee,
            date,
        } => {
            let admin = login.authenticate(state)?;
            let n = records::delete_record(state, &admin, &employee, &date)?;
            println!("Deleted {n} record(s)");
        }
    }

    Ok(())
}

fn visible_records(state: &AppState, user: &UserAccount) -> ServiceResult<Vec<AttendanceEntry>> {
    let scope = if user.is_admin() {
        AttendanceScope::All
    } else {
        AttendanceScope::User(user.username.clone())
    };
    attendance::list_attendance(state, user, scope)
}

fn print_records(entries: &[AttendanceEntry]) {
    println!("{:<16} {:<12} {:<10} {:<10}", "Username", "Date", "Check In", "Check Out");
    for e in entries {
        println!(
            "{:<16} {:<12} {:<10} {:<10}",
            e.username, e.date, e.check_in, e.check_out
        );
    }
    if entries.is_empty() {
        println!("(no records)");
    }
}
