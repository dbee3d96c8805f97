mod common;

use base64::Engine;
use common::{client_with, is_token_request, json, token_ok, MockTransport};
use fakturoid_mcp::fakturoid::FakturoidError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn account_body() -> serde_json::Value {
    serde_json::json!({ "subdomain": "acme", "name": "ACME s.r.o.", "currency": "CZK" })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_calls_share_one_token_exchange() {
    let transport = MockTransport::with_delay(Duration::from_millis(25), |request| {
        if is_token_request(request) {
            token_ok("shared", 3600)
        } else {
            json(200, account_body())
        }
    });
    let client = Arc::new(client_with(transport.clone()));

    let calls = (0..8).map(|_| {
        let client = client.clone();
        async move { client.get_account().await }
    });
    let results = futures::future::join_all(calls).await;

    assert!(results.iter().all(|r| r.is_ok()));
    assert_eq!(transport.token_calls(), 1);
    let resources = transport.resource_calls();
    assert_eq!(resources.len(), 8);
    assert!(resources
        .iter()
        .all(|r| r.header_value("authorization") == Some("Bearer shared")));
}

#[tokio::test]
async fn fresh_token_is_reused_across_calls() {
    let transport = MockTransport::api(|_| json(200, account_body()));
    let client = client_with(transport.clone());

    client.get_account().await.unwrap();
    client.get_account().await.unwrap();
    client.ensure_valid_token().await.unwrap();

    assert_eq!(transport.token_calls(), 1);
    assert_eq!(transport.resource_calls().len(), 2);
}

#[tokio::test]
async fn token_inside_refresh_margin_is_exchanged_again() {
    let issued = Arc::new(AtomicUsize::new(0));
    let counter = issued.clone();
    let transport = MockTransport::new(move |request| {
        if is_token_request(request) {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            // Four minutes is inside the five-minute margin.
            token_ok(&format!("short-{}", n), 240)
        } else {
            json(200, account_body())
        }
    });
    let client = client_with(transport.clone());

    client.get_account().await.unwrap();
    client.get_account().await.unwrap();

    assert_eq!(transport.token_calls(), 2);
    let resources = transport.resource_calls();
    assert_eq!(resources[1].header_value("Authorization"), Some("Bearer short-1"));
}

#[tokio::test]
async fn token_exchange_uses_basic_auth_and_client_credentials_grant() {
    let transport = MockTransport::api(|_| json(200, account_body()));
    let client = client_with(transport.clone());
    client.ensure_valid_token().await.unwrap();

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    let exchange = &calls[0];
    assert_eq!(exchange.method, reqwest::Method::POST);

    let expected = base64::engine::general_purpose::STANDARD.encode("client-id:client-secret");
    assert_eq!(
        exchange.header_value("Authorization"),
        Some(format!("Basic {}", expected).as_str())
    );
    assert_eq!(
        exchange.json_body(),
        Some(serde_json::json!({ "grant_type": "client_credentials" }))
    );
    assert!(exchange
        .header_value("User-Agent")
        .is_some_and(|ua| ua.starts_with("fakturoid-mcp")));
}

#[tokio::test]
async fn rejected_exchange_is_an_authentication_error() {
    let transport = MockTransport::new(|request| {
        if is_token_request(request) {
            json(401, serde_json::json!({ "error": "invalid_client" }))
        } else {
            json(200, account_body())
        }
    });
    let client = client_with(transport.clone());

    let err = client.get_account().await.unwrap_err();
    match err {
        FakturoidError::Authentication { status, message } => {
            assert_eq!(status, Some(401));
            assert!(message.contains("invalid_client"));
        }
        other => panic!("expected authentication error, got {:?}", other),
    }
    assert!(transport.resource_calls().is_empty());
}

#[tokio::test]
async fn malformed_token_response_is_an_authentication_error() {
    let transport = MockTransport::new(|request| {
        if is_token_request(request) {
            fakturoid_mcp::fakturoid::HttpResponse::new(200, b"<html>".to_vec())
        } else {
            json(200, account_body())
        }
    });
    let client = client_with(transport.clone());

    let err = client.ensure_valid_token().await.unwrap_err();
    assert!(matches!(err, FakturoidError::Authentication { .. }));
    assert!(err.to_string().contains("unmarshal token"));
}

#[tokio::test]
async fn failed_exchange_is_retried_on_next_call() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = attempts.clone();
    let transport = MockTransport::new(move |request| {
        if is_token_request(request) {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                json(500, serde_json::json!({}))
            } else {
                token_ok("second", 3600)
            }
        } else {
            json(200, account_body())
        }
    });
    let client = client_with(transport.clone());

    assert!(client.get_account().await.is_err());
    assert!(client.get_account().await.is_ok());
    assert_eq!(transport.token_calls(), 2);
}
