//! `scratch chain`: Show the network identifier.

use clap::Args;

use crate::client::{ApiArgs, ApiClient, ChainResponse};

#[derive(Args, Debug)]
pub struct ChainArgs {
    #[command(flatten)]
    pub api: ApiArgs,
}

pub async fn run(args: &ChainArgs) -> anyhow::Result<()> {
    let chain: ChainResponse = ApiClient::new(&args.api).get("/chain").await?;
    println!("Chain ID: {}", chain.chain_id);
    Ok(())
}
