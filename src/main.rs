use anyhow::Result;
use clap::Parser;
use modalist::config::Config;
use modalist::logger::Logger;
use modalist::ui;
use std::path::PathBuf;

/// Employee roster demo for the modalist dialog
#[derive(Parser, Debug)]
#[command(name = "modalist", version, about)]
struct Cli {
    /// Path to a configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write a default configuration file and exit
    #[arg(long)]
    generate_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.generate_config {
        let path = match cli.config {
            Some(path) => path,
            None => Config::get_default_config_path()?,
        };
        return Config::generate_default_config(&path);
    }

    let config = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load()?,
    };

    let logger = Logger::from_config(&config.logging)?;
    logger.install()?;
    log::info!("Starting modalist");
    if logger.is_enabled() {
        log::info!("Writing logs to {}", Logger::get_log_file_path()?.display());
    }

    // Run the TUI application
    ui::run_app(config, logger).await?;

    Ok(())
}
