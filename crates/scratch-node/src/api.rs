//! HTTP API server for the Scratch node.
//!
//! Reads are answered straight from the shared module. Payments and
//! configuration changes go through the node's command channel so they are
//! applied in a single order.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use scratch_core::{Address, BasisPoints, FeeQuote, ModuleError, Wei, MAX_FEE_RATE};
use scratch_settlement::{Ledger, RecordedEvent, SettlementReceipt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::oneshot;

use crate::commands::NodeCommand;
use crate::state::NodeState;

// --- Response types ---

#[derive(Debug, Serialize, Deserialize)]
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

#[derive(Debug, Serialize, Deserialize)]
pub struct FeeResponse {
    pub fee_rate_bps: u16,
    pub max_fee_rate_bps: u16,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminResponse {
    pub administrator: Address,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub address: Address,
    pub balance: Wei,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChainResponse {
    pub chain_id: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EventsResponse {
    pub events: Vec<RecordedEvent>,
    /// Sequence to poll from next.
    pub next: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

// --- Request types ---

#[derive(Debug, Serialize, Deserialize)]
pub struct SetFeeRequest {
    pub caller: Address,
    pub fee_rate_bps: u16,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransferAdminRequest {
    pub caller: Address,
    pub new_admin: Address,
}

/// Amounts travel as decimal strings; wei values overflow JSON doubles.
#[derive(Debug, Serialize, Deserialize)]
pub struct SendPaymentRequest {
    pub caller: Address,
    pub recipient: Address,
    #[serde(default)]
    pub message: String,
    pub amount: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    #[serde(default)]
    pub since: u64,
}

// --- Errors ---

/// Failure of an API call, rendered as `{error, code}`.
#[derive(Debug)]
pub enum ApiError {
    Module(ModuleError),
    /// Malformed input the module never saw.
    BadRequest { reason: String, code: &'static str },
    /// The event loop is gone or dropped the reply.
    Unavailable(&'static str),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Module(e) => match e {
                ModuleError::Unauthorized { .. } => StatusCode::FORBIDDEN,
                ModuleError::Reentrancy => StatusCode::CONFLICT,
                ModuleError::TransferFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ModuleError::ArithmeticOverflow => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_REQUEST,
            },
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn bad_request(reason: impl Into<String>) -> Self {
        ApiError::BadRequest {
            reason: reason.into(),
            code: "BAD_REQUEST",
        }
    }

    /// Body or query text that failed to decode. Address failures keep the
    /// module's own code.
    fn undecodable(text: String) -> Self {
        let code = if text.contains("invalid address") {
            "INVALID_ADDRESS"
        } else {
            "BAD_REQUEST"
        };
        ApiError::BadRequest { reason: text, code }
    }
}

impl From<ModuleError> for ApiError {
    fn from(e: ModuleError) -> Self {
        ApiError::Module(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::undecodable(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::undecodable(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Module(e) => ErrorResponse {
                error: e.to_string(),
                code: e.code().into(),
            },
            ApiError::BadRequest { reason, code } => ErrorResponse {
                error: reason.clone(),
                code: (*code).into(),
            },
            ApiError::Unavailable(reason) => ErrorResponse {
                error: (*reason).into(),
                code: "UNAVAILABLE".into(),
            },
        };
        (status, Json(body)).into_response()
    }
}

fn parse_amount(raw: &str) -> Result<Wei, ApiError> {
    raw.trim()
        .parse::<Wei>()
        .map_err(|_| ApiError::bad_request(format!("invalid amount: {raw}")))
}

/// Send a command to the event loop and wait for its answer.
async fn submit<T>(
    state: &NodeState,
    build: impl FnOnce(oneshot::Sender<Result<T, ModuleError>>) -> NodeCommand,
) -> Result<T, ApiError> {
    let (reply_tx, reply_rx) = oneshot::channel();
    state
        .command_tx
        .send(build(reply_tx))
        .await
        .map_err(|_| ApiError::Unavailable("node event loop not running"))?;

    match reply_rx.await {
        Ok(result) => result.map_err(ApiError::from),
        Err(_) => Err(ApiError::Unavailable(
            "event loop dropped the reply channel",
        )),
    }
}

// --- Handlers ---

async fn handle_status(State(state): State<Arc<NodeState>>) -> Json<StatusResponse> {
    let module = &state.module;
    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        chain_id: module.network_identifier().value(),
        module_address: module.address(),
        administrator: module.current_administrator(),
        fee_rate_bps: module.current_fee_rate().value(),
        balance: module.contract_balance(),
        event_count: module.events().len(),
        uptime_secs: state.uptime_secs(),
    })
}

async fn handle_get_fee(State(state): State<Arc<NodeState>>) -> Json<FeeResponse> {
    Json(FeeResponse {
        fee_rate_bps: state.module.current_fee_rate().value(),
        max_fee_rate_bps: MAX_FEE_RATE.value(),
    })
}

async fn handle_set_fee(
    State(state): State<Arc<NodeState>>,
    payload: Result<Json<SetFeeRequest>, JsonRejection>,
) -> Result<Json<FeeResponse>, ApiError> {
    let Json(req) = payload?;
    let rate = BasisPoints(req.fee_rate_bps);
    submit(&state, |reply| NodeCommand::SetFeeRate {
        caller: req.caller,
        rate,
        reply,
    })
    .await?;
    Ok(Json(FeeResponse {
        fee_rate_bps: rate.value(),
        max_fee_rate_bps: MAX_FEE_RATE.value(),
    }))
}

async fn handle_get_admin(State(state): State<Arc<NodeState>>) -> Json<AdminResponse> {
    Json(AdminResponse {
        administrator: state.module.current_administrator(),
    })
}

async fn handle_transfer_admin(
    State(state): State<Arc<NodeState>>,
    payload: Result<Json<TransferAdminRequest>, JsonRejection>,
) -> Result<Json<AdminResponse>, ApiError> {
    let Json(req) = payload?;
    submit(&state, |reply| NodeCommand::TransferAdministrator {
        caller: req.caller,
        new_admin: req.new_admin,
        reply,
    })
    .await?;
    Ok(Json(AdminResponse {
        administrator: req.new_admin,
    }))
}

async fn handle_module_balance(State(state): State<Arc<NodeState>>) -> Json<BalanceResponse> {
    Json(BalanceResponse {
        address: state.module.address(),
        balance: state.module.contract_balance(),
    })
}

async fn handle_account_balance(
    State(state): State<Arc<NodeState>>,
    Path(address): Path<String>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let address = Address::parse(&address)?;
    Ok(Json(BalanceResponse {
        address,
        balance: state.ledger.balance_of(&address),
    }))
}

async fn handle_chain(State(state): State<Arc<NodeState>>) -> Json<ChainResponse> {
    Json(ChainResponse {
        chain_id: state.module.network_identifier().value(),
    })
}

async fn handle_quote(
    State(state): State<Arc<NodeState>>,
    Path(amount): Path<String>,
) -> Result<Json<FeeQuote>, ApiError> {
    let amount = parse_amount(&amount)?;
    Ok(Json(state.module.quote(amount)?))
}

async fn handle_send_payment(
    State(state): State<Arc<NodeState>>,
    payload: Result<Json<SendPaymentRequest>, JsonRejection>,
) -> Result<Json<SettlementReceipt>, ApiError> {
    let Json(req) = payload?;
    let amount = parse_amount(&req.amount)?;
    let receipt = submit(&state, |reply| NodeCommand::SendPayment {
        caller: req.caller,
        recipient: req.recipient,
        message: req.message,
        amount,
        reply,
    })
    .await?;
    Ok(Json(receipt))
}

async fn handle_events(
    State(state): State<Arc<NodeState>>,
    query: Result<Query<EventsQuery>, QueryRejection>,
) -> Result<Json<EventsResponse>, ApiError> {
    let Query(query) = query?;
    let events = state.module.events().since(query.since);
    let next = events
        .last()
        .map(|e| e.sequence + 1)
        .unwrap_or(query.since);
    Ok(Json(EventsResponse { events, next }))
}

// --- Server ---

pub fn build_router(state: Arc<NodeState>) -> Router {
    Router::new()
        .route("/api/v1/status", get(handle_status))
        .route("/api/v1/fee", get(handle_get_fee).put(handle_set_fee))
        .route("/api/v1/admin", get(handle_get_admin).put(handle_transfer_admin))
        .route("/api/v1/balance", get(handle_module_balance))
        .route("/api/v1/accounts/{address}", get(handle_account_balance))
        .route("/api/v1/chain", get(handle_chain))
        .route("/api/v1/quote/{amount}", get(handle_quote))
        .route("/api/v1/payments", post(handle_send_payment))
        .route("/api/v1/events", get(handle_events))
        .with_state(state)
}

pub async fn serve(listener: tokio::net::TcpListener, state: Arc<NodeState>) -> anyhow::Result<()> {
    let app = build_router(state);
    axum::serve(listener, app).await?;
    Ok(())
}
