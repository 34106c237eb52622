//! `scratch init`: Write a default node configuration.

use clap::Args;
use scratch_core::{Address, ETHER};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (defaults to current directory).
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Initial platform fee rate in basis points (at most 1000).
    #[arg(long, default_value_t = 0)]
    pub fee_rate_bps: u16,
}

/// Default configuration with development identities funded on a local chain.
fn render_config(fee_rate_bps: u16) -> String {
    let mut out = format!(
        r#"# Scratch Node Configuration

[chain]
chain_id = 31337

[module]
administrator = "{admin}"
fee_rate_bps = {fee_rate_bps}
harden_admin_transfer = false

[api]
listen_addr = "127.0.0.1"
port = 9001

[logging]
level = "info"
format = "text"
"#,
        admin = Address::dev("admin"),
    );
    for name in ["alice", "bob", "carol"] {
        out.push_str(&format!(
            "\n# {name}\n[[ledger.accounts]]\naddress = \"{}\"\nbalance = \"{}\"\n",
            Address::dev(name),
            100 * ETHER
        ));
    }
    out
}

pub fn run(args: &InitArgs) -> anyhow::Result<()> {
    if args.fee_rate_bps > scratch_core::MAX_FEE_RATE.value() {
        anyhow::bail!(
            "fee rate {} bps exceeds the maximum of {}",
            args.fee_rate_bps,
            scratch_core::MAX_FEE_RATE
        );
    }

    let config_path = args.dir.join("scratch.toml");
    if config_path.exists() {
        anyhow::bail!("configuration file already exists at {}", config_path.display());
    }

    std::fs::create_dir_all(&args.dir)?;
    std::fs::write(&config_path, render_config(args.fee_rate_bps))?;

    println!("Initialized Scratch node at {}", config_path.display());
    println!("Edit scratch.toml to customize your configuration.");
    println!("Run 'scratch-node --config {}' to start the node.", config_path.display());
    Ok(())
}
