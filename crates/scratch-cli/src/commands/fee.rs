//! `scratch fee`: Show or change the platform fee rate.

use clap::Args;
use serde::Serialize;

use crate::client::{parse_identity, ApiArgs, ApiClient, FeeResponse};

#[derive(Args, Debug)]
pub struct FeeArgs {
    /// New fee rate in basis points. Requires --from.
    #[arg(long)]
    pub set: Option<u16>,

    /// Administrator making the change (address or dev identity name).
    #[arg(short, long, requires = "set")]
    pub from: Option<String>,

    #[command(flatten)]
    pub api: ApiArgs,
}

#[derive(Serialize)]
struct SetFeeRequest {
    caller: String,
    fee_rate_bps: u16,
}

pub async fn run(args: &FeeArgs) -> anyhow::Result<()> {
    let client = ApiClient::new(&args.api);

    let fee: FeeResponse = match args.set {
        Some(rate) => {
            let from = args
                .from
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("--set requires --from"))?;
            let caller = parse_identity(from)?;
            let fee = client
                .put(
                    "/fee",
                    &SetFeeRequest {
                        caller: caller.to_string(),
                        fee_rate_bps: rate,
                    },
                )
                .await?;
            println!("Fee rate updated.");
            fee
        }
        None => client.get("/fee").await?,
    };

    println!(
        "  Fee rate: {} bps ({:.2}%), max {} bps",
        fee.fee_rate_bps,
        f64::from(fee.fee_rate_bps) / 100.0,
        fee.max_fee_rate_bps
    );
    Ok(())
}
