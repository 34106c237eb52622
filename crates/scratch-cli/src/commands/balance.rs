//! `scratch balance`: Show the module balance or any account's balance.

use clap::Args;
use scratch_core::format_ether;

use crate::client::{parse_identity, ApiArgs, ApiClient, BalanceResponse};

#[derive(Args, Debug)]
pub struct BalanceArgs {
    /// Account to query (address or dev identity name). Defaults to the module.
    #[arg(short, long)]
    pub account: Option<String>,

    #[command(flatten)]
    pub api: ApiArgs,
}

pub async fn run(args: &BalanceArgs) -> anyhow::Result<()> {
    let client = ApiClient::new(&args.api);
    let balance: BalanceResponse = match &args.account {
        Some(account) => {
            let address = parse_identity(account)?;
            client.get(&format!("/accounts/{address}")).await?
        }
        None => client.get("/balance").await?,
    };

    println!(
        "{}: {} ETH ({} wei)",
        balance.address,
        format_ether(balance.balance),
        balance.balance
    );
    Ok(())
}
