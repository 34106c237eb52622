//! `scratch admin`: Show or transfer the administrator role.

use clap::Args;
use serde::Serialize;

use crate::client::{parse_identity, AdminResponse, ApiArgs, ApiClient};

#[derive(Args, Debug)]
pub struct AdminArgs {
    /// Hand administration to this account. Requires --from.
    #[arg(long)]
    pub transfer: Option<String>,

    /// Current administrator (address or dev identity name).
    #[arg(short, long, requires = "transfer")]
    pub from: Option<String>,

    #[command(flatten)]
    pub api: ApiArgs,
}

#[derive(Serialize)]
struct TransferAdminRequest {
    caller: String,
    new_admin: String,
}

pub async fn run(args: &AdminArgs) -> anyhow::Result<()> {
    let client = ApiClient::new(&args.api);

    let admin: AdminResponse = match &args.transfer {
        Some(target) => {
            let from = args
                .from
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("--transfer requires --from"))?;
            let body = TransferAdminRequest {
                caller: parse_identity(from)?.to_string(),
                new_admin: parse_identity(target)?.to_string(),
            };
            let admin = client.put("/admin", &body).await?;
            println!("Administrator transferred.");
            admin
        }
        None => client.get("/admin").await?,
    };

    println!("  Administrator: {}", admin.administrator);
    Ok(())
}
