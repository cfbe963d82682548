use anyhow::{Context, Result};
use clap::Parser;
use speedog_core::logging::init_logging;
use speedog_core::service::SpeedogService;
use std::env;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "speedog.conf";

#[derive(Parser, Debug)]
#[command(
    name = "speedog",
    about = "Speedog: changes a game's speed when its log reaches configured nodes"
)]
struct Cli {
    /// Path to the Speedog config file (defaults to speedog.conf next to the executable)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    init_logging();

    let config = cli.config.unwrap_or_else(default_config_path);

    if let Err(e) = run(&config) {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(config: &Path) -> Result<()> {
    let mut service = SpeedogService::initialize(config).context("initialization failed")?;

    service
        .install_signal_handler()
        .context("initialization failed")?;

    service.run().context("startup failed")?;

    Ok(())
}

fn default_config_path() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(CONFIG_FILE_NAME)))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}
