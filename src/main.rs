use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use tokio::runtime::Runtime;

use video_vault::cli::{Args, Commands};
use video_vault::config::{load_config, ArchiverConfig};
use video_vault::server;
use video_vault::service::Archiver;

fn main() -> Result<()> {
    let args = Args::parse();

    initialize_logging(args.verbose)?;

    let overrides = args.overrides();
    let config_path = args.config.clone();

    match args.command {
        Commands::InitConfig { path } => {
            info!("Creating default configuration file at {}", path.display());
            ArchiverConfig::create_default_config_file(&path)?;
            info!("Configuration created successfully");
        }
        Commands::Upload { link } => {
            let config = load_config(config_path.as_deref(), overrides)?;
            let archiver = Archiver::from_config(&config)?;
            let runtime = Runtime::new().context("Failed to create tokio runtime")?;

            let report = runtime.block_on(archiver.archive(&link));

            let json = serde_json::to_string_pretty(&report)
                .context("Failed to serialize transfer report")?;
            println!("{}", json);

            if !report.is_success() {
                process::exit(1);
            }
        }
        Commands::Serve { address } => {
            let mut config = load_config(config_path.as_deref(), overrides)?;
            if let Some(address) = address {
                config.listen_address = address;
            }
            let address = config.listen_socket_addr()?;
            let archiver = Archiver::from_config(&config)?;
            let runtime = Runtime::new().context("Failed to create tokio runtime")?;

            runtime.block_on(server::run(address, archiver));
        }
    }

    Ok(())
}

/// Initialize logging based on verbosity level
fn initialize_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logger")?;
    Ok(())
}
