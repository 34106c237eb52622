//! Integration test: the node's HTTP surface driving a live command loop.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use scratch_core::{Address, ETHER};
use scratch_node::api::{build_router, BalanceResponse, ErrorResponse, SendPaymentRequest};
use scratch_node::{ScratchConfig, ScratchNode};
use scratch_settlement::SettlementReceipt;
use tower::ServiceExt;

async fn call(router: &axum::Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();
    (status, body)
}

fn post_payment(body: &SendPaymentRequest) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/payments")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn test_payment_over_http_moves_funds() {
    let mut config = ScratchConfig::default();
    config.module.fee_rate_bps = 500;
    let mut node = ScratchNode::new(config).unwrap();
    let state = node.prepare();
    tokio::spawn(async move { node.run().await });
    let router = build_router(state);

    // 50 ether exceeds u64::MAX wei; amounts travel as strings.
    let (status, body) = call(
        &router,
        post_payment(&SendPaymentRequest {
            caller: Address::dev("alice"),
            recipient: Address::dev("bob"),
            message: "big tip".into(),
            amount: (50 * ETHER).to_string(),
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let receipt: SettlementReceipt = serde_json::from_slice(&body).unwrap();
    assert_eq!(receipt.fee, 50 * ETHER / 20);

    let uri = format!("/api/v1/accounts/{}", Address::dev("bob"));
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (_, body) = call(&router, req).await;
    let balance: BalanceResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(balance.balance, 100 * ETHER + 50 * ETHER * 95 / 100);

    let req = Request::builder()
        .uri(format!("/api/v1/accounts/{}", Address::dev("admin")))
        .body(Body::empty())
        .unwrap();
    let (_, body) = call(&router, req).await;
    let balance: BalanceResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(balance.balance, 50 * ETHER / 20);
}

#[tokio::test]
async fn test_overdraft_over_http_is_unprocessable() {
    let mut node = ScratchNode::new(ScratchConfig::default()).unwrap();
    let state = node.prepare();
    tokio::spawn(async move { node.run().await });
    let router = build_router(state);

    let (status, body) = call(
        &router,
        post_payment(&SendPaymentRequest {
            caller: Address::dev("alice"),
            recipient: Address::dev("bob"),
            message: String::new(),
            amount: (101 * ETHER).to_string(),
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let err: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(err.code, "TRANSFER_FAILED");
}
