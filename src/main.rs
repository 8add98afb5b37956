use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use cabinet::{Config, Database, FileStorage, WebServer};

/// Cabinet - personal file storage.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
    /// Listen host, overrides the config file.
    #[arg(long)]
    host: Option<String>,
    /// Listen port, overrides the config file.
    #[arg(short, long)]
    port: Option<u16>,
}

fn load_config(args: &Args) -> cabinet::Result<Config> {
    let mut config = if args.config.exists() {
        Config::load_with_env(&args.config)?
    } else {
        eprintln!(
            "{} not found, using default configuration.",
            args.config.display()
        );
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    };

    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    config.validate()?;
    Ok(config)
}

async fn run(config: Config) -> cabinet::Result<()> {
    let db = Database::open(&config.database.url).await?;
    let storage = FileStorage::new(&config.storage.upload_path)?;
    info!(
        "Blob storage at {}",
        storage.base_path().display()
    );

    let server = WebServer::new(&config, db, storage)?;
    server.run().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = cabinet::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        cabinet::logging::init_console_only(&config.logging.level);
    }

    info!("Cabinet - personal file storage");
    info!(
        "Server configured on {}:{}",
        config.server.host, config.server.port
    );

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Server stopped: {}", e);
            ExitCode::FAILURE
        }
    }
}
