//! `scratch status`: Query the status of a running node.

use clap::Args;
use scratch_core::format_ether;

use crate::client::{ApiArgs, ApiClient, StatusResponse};

#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub api: ApiArgs,
}

pub async fn run(args: &StatusArgs) -> anyhow::Result<()> {
    let client = ApiClient::new(&args.api);
    let status: StatusResponse = client.get("/status").await?;

    println!("Node Status:");
    println!("  Endpoint:       {}", args.api.endpoint);
    println!("  Version:        {}", status.version);
    println!("  Chain ID:       {}", status.chain_id);
    println!("  Module:         {}", status.module_address);
    println!("  Administrator:  {}", status.administrator);
    println!("  Fee rate:       {} bps", status.fee_rate_bps);
    println!("  Module balance: {} ETH", format_ether(status.balance));
    println!("  Events:         {}", status.event_count);
    println!("  Uptime:         {}s", status.uptime_secs);
    Ok(())
}
