//! `scratch events`: List emitted events.

use clap::Args;
use scratch_core::{format_ether, ModuleEvent};

use crate::client::{ApiArgs, ApiClient, EventsResponse};

#[derive(Args, Debug)]
pub struct EventsArgs {
    /// First sequence number to show.
    #[arg(long, default_value_t = 0)]
    pub since: u64,

    #[command(flatten)]
    pub api: ApiArgs,
}

pub async fn run(args: &EventsArgs) -> anyhow::Result<()> {
    let resp: EventsResponse = ApiClient::new(&args.api)
        .get(&format!("/events?since={}", args.since))
        .await?;

    if resp.events.is_empty() {
        println!("No events since #{}.", args.since);
    }
    for recorded in &resp.events {
        let when = recorded.event.timestamp().format("%Y-%m-%d %H:%M:%S");
        match &recorded.event {
            ModuleEvent::PaymentSent(p) => println!(
                "#{:<4} {when} PaymentSent {} -> {} {} ETH {:?}",
                recorded.sequence,
                p.sender,
                p.recipient,
                format_ether(p.amount),
                p.message
            ),
            ModuleEvent::FeeRateUpdated(e) => println!(
                "#{:<4} {when} FeeRateUpdated {} -> {}",
                recorded.sequence, e.previous, e.current
            ),
            ModuleEvent::AdministratorTransferred(e) => println!(
                "#{:<4} {when} AdministratorTransferred {} -> {}",
                recorded.sequence, e.previous, e.current
            ),
        }
    }
    println!("Next: --since {}", resp.next);
    Ok(())
}
