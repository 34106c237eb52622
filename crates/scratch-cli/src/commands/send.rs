//! `scratch send`: Send a payment through the settlement module.

use clap::Args;
use scratch_core::format_ether;
use scratch_settlement::SettlementReceipt;
use serde::Serialize;

use crate::client::{parse_amount, parse_identity, ApiArgs, ApiClient};

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Paying account (address or dev identity name).
    #[arg(short, long)]
    pub from: String,

    /// Recipient account (address or dev identity name).
    #[arg(short = 'r', long)]
    pub recipient: String,

    /// Amount in ether (e.g. 0.01), or wei with a `wei` suffix.
    #[arg(short, long)]
    pub amount: String,

    /// Message attached to the payment.
    #[arg(short, long, default_value = "")]
    pub message: String,

    #[command(flatten)]
    pub api: ApiArgs,
}

#[derive(Serialize)]
struct SendPaymentRequest {
    caller: String,
    recipient: String,
    message: String,
    amount: String,
}

pub async fn run(args: &SendArgs) -> anyhow::Result<()> {
    let caller = parse_identity(&args.from)?;
    let recipient = parse_identity(&args.recipient)?;
    let amount = parse_amount(&args.amount)?;

    println!("Sending payment...");
    println!("  From:     {}", caller);
    println!("  To:       {}", recipient);
    println!("  Amount:   {} ETH", format_ether(amount));
    println!("  Via:      {}", args.api.endpoint);
    println!();

    let client = ApiClient::new(&args.api);
    let receipt: SettlementReceipt = client
        .post(
            "/payments",
            &SendPaymentRequest {
                caller: caller.to_string(),
                recipient: recipient.to_string(),
                message: args.message.clone(),
                amount: amount.to_string(),
            },
        )
        .await?;

    println!("Payment settled!");
    println!("  Settlement: {}", receipt.settlement_id);
    println!("  Sequence:   {}", receipt.sequence);
    println!("  Recipient:  {} ETH", format_ether(receipt.net_amount));
    println!(
        "  Fee:        {} ETH ({}) to {}",
        format_ether(receipt.fee),
        receipt.fee_rate,
        receipt.fee_recipient
    );
    Ok(())
}
