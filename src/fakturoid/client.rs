use super::auth::{AccessToken, Credentials, TokenResponse};
use super::transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
use super::FakturoidError;
use crate::constants::auth::GRANT_TYPE;
use crate::constants::limits::LOG_BODY_PREVIEW_BYTES;
use crate::constants::network::{
    DEFAULT_BASE_URL, DEFAULT_TOKEN_URL, TIMEOUT_API_REQUEST_MS, USER_AGENT,
};
use crate::services::logger::Logger;
use crate::utils::text::clip_for_log;
use chrono::Utc;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub base_url: String,
    pub token_url: String,
}

impl Endpoints {
    pub fn new(base_url: impl Into<String>, token_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token_url: token_url.into(),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_TOKEN_URL)
    }
}

/// Client for one Fakturoid account.
pub struct FakturoidClient {
    credentials: Credentials,
    endpoints: Endpoints,
    transport: Arc<dyn HttpTransport>,
    timeout: Duration,
    token: Mutex<Option<AccessToken>>,
    refresh: tokio::sync::Mutex<()>,
    logger: Logger,
}

impl FakturoidClient {
    pub fn new(credentials: Credentials, logger: Logger) -> Result<Self, FakturoidError> {
        let timeout = Duration::from_millis(TIMEOUT_API_REQUEST_MS);
        let transport = ReqwestTransport::new(timeout)?;
        Ok(Self::with_transport(credentials, Arc::new(transport), logger))
    }

    pub fn with_transport(
        credentials: Credentials,
        transport: Arc<dyn HttpTransport>,
        logger: Logger,
    ) -> Self {
        Self {
            credentials,
            endpoints: Endpoints::default(),
            transport,
            timeout: Duration::from_millis(TIMEOUT_API_REQUEST_MS),
            token: Mutex::new(None),
            refresh: tokio::sync::Mutex::new(()),
            logger: logger.child("client"),
        }
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn ensure_valid_token(&self) -> Result<(), FakturoidError> {
        self.bearer_token().await.map(|_| ())
    }

    fn cached_token(&self) -> Option<String> {
        let guard = self.token.lock().unwrap_or_else(|err| err.into_inner());
        guard
            .as_ref()
            .filter(|token| token.is_fresh(Utc::now()))
            .map(|token| token.value.clone())
    }

    async fn bearer_token(&self) -> Result<String, FakturoidError> {
        if let Some(token) = self.cached_token() {
            return Ok(token);
        }

        let _in_flight = self.refresh.lock().await;
        // Another caller may have refreshed while we waited.
        if let Some(token) = self.cached_token() {
            return Ok(token);
        }

        let fresh = self.exchange_token().await?;
        let value = fresh.value.clone();
        *self.token.lock().unwrap_or_else(|err| err.into_inner()) = Some(fresh);
        Ok(value)
    }

    async fn exchange_token(&self) -> Result<AccessToken, FakturoidError> {
        self.logger.debug(
            "requesting access token",
            Some(&serde_json::json!({ "token_url": self.endpoints.token_url })),
        );
        let payload = serde_json::to_vec(&serde_json::json!({ "grant_type": GRANT_TYPE }))
            .map_err(|err| FakturoidError::Encode(err.to_string()))?;
        let request = HttpRequest::new(Method::POST, self.endpoints.token_url.clone())
            .header("Authorization", self.credentials.basic_authorization())
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
            .body(payload);

        let response = self.send(request).await?;
        if response.status != 200 {
            let body = response.text();
            self.logger.warn(
                "token exchange rejected",
                Some(&serde_json::json!({
                    "status": response.status,
                    "body": clip_for_log(&body, LOG_BODY_PREVIEW_BYTES),
                })),
            );
            return Err(FakturoidError::Authentication {
                status: Some(response.status),
                message: body,
            });
        }

        let parsed: TokenResponse =
            serde_json::from_slice(&response.body).map_err(|err| {
                FakturoidError::Authentication {
                    status: Some(response.status),
                    message: format!("unmarshal token: {}", err),
                }
            })?;
        if parsed.access_token.trim().is_empty() {
            return Err(FakturoidError::Authentication {
                status: Some(response.status),
                message: "token response did not contain an access_token".to_string(),
            });
        }

        let token = AccessToken::from_response(parsed, Utc::now());
        self.logger.info(
            "access token refreshed",
            Some(&serde_json::json!({ "expires_at": token.expires_at.to_rfc3339() })),
        );
        Ok(token)
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, FakturoidError> {
        match tokio::time::timeout(self.timeout, self.transport.send(request)).await {
            Ok(result) => result,
            Err(_) => Err(FakturoidError::Timeout(self.timeout.as_millis() as u64)),
        }
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}/accounts/{}{}",
            self.endpoints.base_url, self.credentials.slug, endpoint
        )
    }

    pub async fn execute(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<Vec<u8>, FakturoidError> {
        let token = self.bearer_token().await?;

        let mut request = HttpRequest::new(method.clone(), self.endpoint_url(endpoint))
            .header("Authorization", format!("Bearer {}", token))
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT);
        if let Some(body) = body {
            let encoded =
                serde_json::to_vec(body).map_err(|err| FakturoidError::Encode(err.to_string()))?;
            request = request.body(encoded);
        }

        let started = Instant::now();
        let response = self.send(request).await?;
        self.logger.debug(
            "fakturoid request",
            Some(&serde_json::json!({
                "method": method.as_str(),
                "endpoint": endpoint,
                "status": response.status,
                "duration_ms": started.elapsed().as_millis() as u64,
            })),
        );

        if response.status == 429 {
            self.logger.warn(
                "rate limited by fakturoid",
                Some(&serde_json::json!({ "endpoint": endpoint })),
            );
            return Err(FakturoidError::RateLimited {
                body: response.text(),
            });
        }
        if !response.is_success() {
            return Err(FakturoidError::Api {
                status: response.status,
                body: response.text(),
            });
        }
        Ok(response.body)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
    ) -> Result<T, FakturoidError> {
        let body = self.execute(Method::GET, endpoint, None).await?;
        decode_body(&body)
    }

    pub(crate) async fn send_json<B, T>(
        &self,
        method: Method,
        endpoint: &str,
        payload: &B,
    ) -> Result<T, FakturoidError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let value =
            serde_json::to_value(payload).map_err(|err| FakturoidError::Encode(err.to_string()))?;
        let body = self.execute(method, endpoint, Some(&value)).await?;
        decode_body(&body)
    }

    pub(crate) async fn send_discarding<B>(
        &self,
        method: Method,
        endpoint: &str,
        payload: Option<&B>,
    ) -> Result<(), FakturoidError>
    where
        B: Serialize + ?Sized,
    {
        let value = payload
            .map(serde_json::to_value)
            .transpose()
            .map_err(|err| FakturoidError::Encode(err.to_string()))?;
        self.execute(method, endpoint, value.as_ref()).await?;
        Ok(())
    }
}

fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, FakturoidError> {
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(FakturoidError::Decode("empty response body".to_string()));
    }
    serde_json::from_slice(body).map_err(|err| FakturoidError::Decode(err.to_string()))
}
