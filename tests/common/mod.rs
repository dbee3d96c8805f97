#![allow(dead_code)]

use async_trait::async_trait;
use fakturoid_mcp::fakturoid::{
    Credentials, Endpoints, FakturoidClient, FakturoidError, HttpRequest, HttpResponse,
    HttpTransport,
};
use fakturoid_mcp::services::logger::{LogLevel, Logger};
use once_cell::sync::Lazy;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Mutex as AsyncMutex;

pub static ENV_LOCK: Lazy<AsyncMutex<()>> = Lazy::new(|| AsyncMutex::new(()));

pub const BASE_URL: &str = "https://fakturoid.test/api/v3";
pub const TOKEN_URL: &str = "https://fakturoid.test/api/v3/oauth/token";
pub const SLUG: &str = "acme";

type Responder = dyn Fn(&HttpRequest) -> HttpResponse + Send + Sync;

/// Transport double: answers from a closure and records every request.
pub struct MockTransport {
    responder: Box<Responder>,
    calls: Mutex<Vec<HttpRequest>>,
    delay: Option<Duration>,
}

impl MockTransport {
    pub fn new<F>(responder: F) -> Arc<Self>
    where
        F: Fn(&HttpRequest) -> HttpResponse + Send + Sync + 'static,
    {
        Arc::new(Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
            delay: None,
        })
    }

    pub fn with_delay<F>(delay: Duration, responder: F) -> Arc<Self>
    where
        F: Fn(&HttpRequest) -> HttpResponse + Send + Sync + 'static,
    {
        Arc::new(Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
            delay: Some(delay),
        })
    }

    /// Token endpoint answers with a one-hour token; everything else with
    /// `resource`.
    pub fn api<F>(resource: F) -> Arc<Self>
    where
        F: Fn(&HttpRequest) -> HttpResponse + Send + Sync + 'static,
    {
        Self::new(move |request| {
            if is_token_request(request) {
                token_ok("token-1", 3600)
            } else {
                resource(request)
            }
        })
    }

    pub fn calls(&self) -> Vec<HttpRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn token_calls(&self) -> usize {
        self.calls().iter().filter(|r| is_token_request(r)).count()
    }

    pub fn resource_calls(&self) -> Vec<HttpRequest> {
        self.calls()
            .into_iter()
            .filter(|r| !is_token_request(r))
            .collect()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, FakturoidError> {
        self.calls.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok((self.responder)(&request))
    }
}

pub fn is_token_request(request: &HttpRequest) -> bool {
    request.url == TOKEN_URL
}

pub fn token_ok(token: &str, expires_in: i64) -> HttpResponse {
    json(
        200,
        serde_json::json!({
            "access_token": token,
            "token_type": "Bearer",
            "expires_in": expires_in,
        }),
    )
}

pub fn json(status: u16, body: serde_json::Value) -> HttpResponse {
    HttpResponse::new(status, body.to_string().into_bytes())
}

pub fn quiet_logger() -> Logger {
    Logger::with_level("test", LogLevel::Error)
}

pub fn client_with(transport: Arc<MockTransport>) -> FakturoidClient {
    FakturoidClient::with_transport(
        Credentials::new("client-id", "client-secret", SLUG),
        transport,
        quiet_logger(),
    )
    .with_endpoints(Endpoints::new(BASE_URL, TOKEN_URL))
}

pub fn resource_url(endpoint: &str) -> String {
    format!("{}/accounts/{}{}", BASE_URL, SLUG, endpoint)
}
