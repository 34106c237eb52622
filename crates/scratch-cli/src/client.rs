//! Thin HTTP client for the node API, plus argument parsing helpers.

use anyhow::Context;
use clap::Args;
use scratch_core::{parse_ether, Address, Wei};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Args, Debug, Clone)]
pub struct ApiArgs {
    /// API endpoint of the node.
    #[arg(short, long, default_value = "http://127.0.0.1:9001")]
    pub endpoint: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    pub version: String,
    pub chain_id: u64,
    pub module_address: Address,
    pub administrator: Address,
    pub fee_rate_bps: u16,
    pub balance: Wei,
    pub event_count: usize,
    pub uptime_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct FeeResponse {
    pub fee_rate_bps: u16,
    pub max_fee_rate_bps: u16,
}

#[derive(Debug, Deserialize)]
pub struct AdminResponse {
    pub administrator: Address,
}

#[derive(Debug, Deserialize)]
pub struct BalanceResponse {
    pub address: Address,
    pub balance: Wei,
}

#[derive(Debug, Deserialize)]
pub struct ChainResponse {
    pub chain_id: u64,
}

#[derive(Debug, Deserialize)]
pub struct EventsResponse {
    pub events: Vec<scratch_settlement::RecordedEvent>,
    pub next: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
    code: String,
}

pub struct ApiClient {
    endpoint: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(args: &ApiArgs) -> Self {
        Self {
            endpoint: args.endpoint.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.endpoint, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| self.unreachable())?;
        Self::decode(resp).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> anyhow::Result<T> {
        let url = self.url(path);
        tracing::debug!(%url, "POST");
        let resp = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| self.unreachable())?;
        Self::decode(resp).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> anyhow::Result<T> {
        let url = self.url(path);
        tracing::debug!(%url, "PUT");
        let resp = self
            .http
            .put(&url)
            .json(body)
            .send()
            .await
            .with_context(|| self.unreachable())?;
        Self::decode(resp).await
    }

    fn unreachable(&self) -> String {
        format!(
            "could not reach node at {} (is scratch-node running?)",
            self.endpoint
        )
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> anyhow::Result<T> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json().await?);
        }
        match resp.json::<ErrorResponse>().await {
            Ok(err) => anyhow::bail!("{} (HTTP {}, {})", err.error, status, err.code),
            Err(_) => anyhow::bail!("request failed (HTTP {})", status),
        }
    }
}

/// Accepts a hex address or a development identity name (`alice`).
pub fn parse_identity(s: &str) -> anyhow::Result<Address> {
    let looks_hex =
        s.starts_with("0x") || (s.len() == 40 && s.chars().all(|c| c.is_ascii_hexdigit()));
    let looks_name = !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if looks_hex {
        Ok(Address::parse(s)?)
    } else if looks_name {
        Ok(Address::dev(s))
    } else {
        anyhow::bail!("not an address or identity name: {s}")
    }
}

/// Ether by default (`0.01`); raw wei with a `wei` suffix (`1000wei`).
pub fn parse_amount(s: &str) -> anyhow::Result<Wei> {
    let s = s.trim();
    match s.strip_suffix("wei") {
        Some(wei) => wei
            .trim()
            .parse()
            .with_context(|| format!("invalid wei amount: {s}")),
        None => Ok(parse_ether(s.strip_suffix("eth").unwrap_or(s).trim())?),
    }
}
