use std::env;
use std::path::PathBuf;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

pub const DEFAULT_DATA_FILE: &str = "attendance_data.json";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const LOG_FILE_PREFIX: &str = "attendease.log";

#[derive(Clone, Debug)]
pub struct Config {
    pub data_file: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: Level,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            data_file: lookup("ATTENDANCE_DATA_FILE")
                .unwrap_or_else(|| DEFAULT_DATA_FILE.to_string())
                .into(),
            log_dir: lookup("LOG_DIR")
                .unwrap_or_else(|| DEFAULT_LOG_DIR.to_string())
                .into(),
            log_level: log_level
                .parse()
                .with_context(|| format!("LOG_LEVEL '{log_level}' is not a tracing level"))?,
        })
    }

    /// Daily rolling appender under `log_dir`, which is created if missing.
    pub fn log_appender(&self) -> anyhow::Result<RollingFileAppender> {
        RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(LOG_FILE_PREFIX)
            .build(&self.log_dir)
            .with_context(|| format!("cannot open log directory {}", self.log_dir.display()))
    }
}
