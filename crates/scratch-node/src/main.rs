//! Scratch node entry point.
//!
//! Starts a node with configuration from a TOML file or defaults.

use clap::Parser;
use std::path::PathBuf;

use scratch_node::logging::{init_logging, LogFormat};
use scratch_node::{ScratchConfig, ScratchNode};

/// Scratch Node
#[derive(Parser, Debug)]
#[command(name = "scratch-node", version, about = "Scratch settlement node")]
struct Args {
    /// Path to the configuration file (TOML).
    #[arg(short, long, default_value = "scratch.toml")]
    config: PathBuf,

    /// Override the API port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,

    /// Generate a default config file and exit.
    #[arg(long)]
    init: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Handle --init flag
    if args.init {
        let config = ScratchConfig::default();
        config.save(&args.config)?;
        println!("wrote default config to {}", args.config.display());
        return Ok(());
    }

    // Load configuration
    let mut config = ScratchConfig::load(&args.config)?;

    // Apply CLI overrides
    if let Some(api_port) = args.api_port {
        config.api.port = api_port;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    init_logging(
        &config.logging.level,
        LogFormat::from_str_lossy(&config.logging.format),
    );

    tracing::info!("Scratch node v{}", env!("CARGO_PKG_VERSION"));

    // Create and start the node
    let mut node = ScratchNode::new(config)?;
    node.start().await?;

    // Set up graceful shutdown on SIGINT
    let shutdown = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
        tracing::info!("received shutdown signal");
    };

    tokio::select! {
        result = node.run() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "node event loop error");
            }
        }
        _ = shutdown => {
            tracing::info!("initiating graceful shutdown");
        }
    }

    node.shutdown().await?;
    tracing::info!("Scratch node exited cleanly");
    Ok(())
}
