//! Scratch CLI: command-line client for a running Scratch node.
//!
//! Subcommands: init, status, send, fee, admin, balance, chain, quote, events.

mod client;
mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Scratch: tips with a bounded platform fee.
#[derive(Parser, Debug)]
#[command(name = "scratch", version, about, long_about = None)]
struct Cli {
    /// Log level for the client itself (RUST_LOG overrides).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default node configuration.
    Init(commands::init::InitArgs),
    /// Query the status of a running node.
    Status(commands::status::StatusArgs),
    /// Send a payment through the settlement module.
    Send(commands::send::SendArgs),
    /// Show or change the platform fee rate.
    Fee(commands::fee::FeeArgs),
    /// Show or transfer the administrator role.
    Admin(commands::admin::AdminArgs),
    /// Show the module balance or any account's balance.
    Balance(commands::balance::BalanceArgs),
    /// Show the network identifier.
    Chain(commands::chain::ChainArgs),
    /// Preview the fee split of an amount.
    Quote(commands::quote::QuoteArgs),
    /// List emitted events.
    Events(commands::events::EventsArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Init(args) => commands::init::run(args),
        Commands::Status(args) => commands::status::run(args).await,
        Commands::Send(args) => commands::send::run(args).await,
        Commands::Fee(args) => commands::fee::run(args).await,
        Commands::Admin(args) => commands::admin::run(args).await,
        Commands::Balance(args) => commands::balance::run(args).await,
        Commands::Chain(args) => commands::chain::run(args).await,
        Commands::Quote(args) => commands::quote::run(args).await,
        Commands::Events(args) => commands::events::run(args).await,
    }
}
