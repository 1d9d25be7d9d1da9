use clap::Parser;
use tracing::info;

use attendease::config::Config;
use attendease::db::init_db;
use attendease::state::AppState;

mod cli;

use cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(path) = cli.data_file {
        config.data_file = path;
    }

    // Rolling daily log
    let file_appender = config.log_appender()?;
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(data_file = %config.data_file.display(), "AttendEase starting");

    let store = init_db(&config.data_file)?;
    let state = AppState::new(store);

    cli::run(&state, cli.command)?;
    Ok(())
}
