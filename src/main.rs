//! Charging infrastructure API server
//!
//! Reads configuration from a TOML file (~/.config/charging-infra/config.toml
//! unless `--config` or `CHARGING_INFRA_CONFIG` say otherwise).

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use charging_infra::config::{default_config_path, AppConfig};
use charging_infra::server::{init_tracing, ServerHandle};

#[derive(Parser, Debug)]
#[command(
    name = "charging-infra-api",
    version,
    about = "In-memory e-mobility roaming network registry with a REST API",
    long_about = "Serves roaming networks, operators, charging pools, stations and EVSEs \
                  as JSON and GeoJSON.\n\n\
                  Default config: ~/.config/charging-infra/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "CHARGING_INFRA_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(default_config_path);
    let loaded = AppConfig::load(&config_path);

    let mut config = loaded.as_ref().cloned().unwrap_or_default();
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config);

    match &loaded {
        Ok(_) => info!("Configuration loaded from {}", config_path.display()),
        Err(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }

    if let Some(port) = cli.port {
        info!("CLI override: port = {}", port);
        config.server.port = port;
    }

    if cli.check {
        if let Err(e) = loaded {
            return Err(e.into());
        }
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   Address     : {}", config.address());
        println!("   Tenancy     : {:?}", config.tenancy.mode);
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    let handle = ServerHandle::start(config).await?;
    handle.install_signal_handler();
    info!("Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.shutdown().await;

    Ok(())
}
