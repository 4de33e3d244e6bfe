use clap::Parser;
use movies_api::cli::{run_cli, Cli};
use movies_api::logging::{init_logging_with_config, LogConfig};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    // Dropping the guard flushes buffered log lines, so it lives until exit.
    let _log_guard = init_logging_with_config(&LogConfig::from_env())?;
    run_cli(cli)
}
