//! `scratch quote`: Preview the fee split of an amount.

use clap::Args;
use scratch_core::{format_ether, FeeQuote};

use crate::client::{parse_amount, ApiArgs, ApiClient};

#[derive(Args, Debug)]
pub struct QuoteArgs {
    /// Amount in ether (e.g. 0.01), or wei with a `wei` suffix.
    pub amount: String,

    #[command(flatten)]
    pub api: ApiArgs,
}

pub async fn run(args: &QuoteArgs) -> anyhow::Result<()> {
    let amount = parse_amount(&args.amount)?;
    let quote: FeeQuote = ApiClient::new(&args.api)
        .get(&format!("/quote/{amount}"))
        .await?;

    println!("Quote at {}:", quote.fee_rate);
    println!("  Gross:     {} ETH", format_ether(quote.gross));
    println!("  Fee:       {} ETH", format_ether(quote.fee));
    println!("  Recipient: {} ETH", format_ether(quote.net));
    Ok(())
}
