//! QueryGate server binary.
//!
//! Usage:
//!   querygate-server [--config querygate.toml] [--host 0.0.0.0] [--port 8080]
//!   querygate-server --init-config    # write a commented default config and exit

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use querygate_server::{ServerConfig, CONFIG_FILE_NAME};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "querygate-server")]
#[command(about = "HTTP gateway for relational, document and key-value commands")]
struct Args {
    /// Config file (defaults to ./querygate.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overrides the config file
    #[arg(long)]
    host: Option<String>,

    /// Listen port, overrides the config file
    #[arg(short, long)]
    port: Option<u16>,

    /// Write the default config file if missing, then exit
    #[arg(long)]
    init_config: bool,
}

fn load_config(args: &Args) -> anyhow::Result<ServerConfig> {
    let path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));

    let mut config = if args.config.is_some() || path.exists() {
        ServerConfig::from_file(&path)
            .with_context(|| format!("loading {}", path.display()))?
    } else {
        ServerConfig::default()
    };

    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.init_config {
        let path = args
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        ServerConfig::write_default_if_missing(&path)?;
        println!("Config file ready at {}", path.display());
        return Ok(());
    }

    let config = load_config(&args)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    querygate_server::run(&config).await
}
