use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::auth::CredentialStore;
use crate::error::AdminError;

/// Cancellation handle for a single in-flight request
///
/// Clones observe the same flag; cancelling any clone cancels all of them.
#[derive(Clone)]
pub struct CancelToken {
    sender: Arc<watch::Sender<bool>>,
    receiver: watch::Receiver<bool>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (sender, receiver) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
            receiver,
        }
    }

    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves once `cancel` has been called
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        if receiver.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-call overrides
#[derive(Clone, Default)]
pub struct RequestOptions {
    /// Extra headers; `Content-Type` and `Authorization` are always replaced
    pub headers: HeaderMap,
    /// Overrides the client's default request timeout
    pub timeout: Option<Duration>,
    pub cancel: Option<CancelToken>,
}

impl RequestOptions {
    pub fn with_cancel(cancel: CancelToken) -> Self {
        Self {
            cancel: Some(cancel),
            ..Self::default()
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..Self::default()
        }
    }
}

/// Fully read HTTP response
///
/// The body is read inside the same timeout and cancellation scope as the
/// request itself, so holding one of these never involves further I/O.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    body: String,
}

impl ApiResponse {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn text(&self) -> &str {
        &self.body
    }

    /// Deserialize the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// HTTP transport for the admin API
///
/// Injects the stored credential and JSON content type on every call and
/// hands back the status and body. Status codes are never interpreted here.
pub struct AdminHttpClient {
    /// Shared HTTP client with connection pooling
    client: Client,

    /// API root, without trailing slash
    base_url: String,

    /// Where the bearer credential is read from
    credentials: CredentialStore,

    /// Default timeout applied to each call
    request_timeout: Duration,
}

impl AdminHttpClient {
    /// Create a new HTTP client
    pub fn new(
        base_url: &str,
        credentials: CredentialStore,
        connect_timeout: u64,
        request_timeout: u64,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout))
            .timeout(Duration::from_secs(request_timeout))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            request_timeout: Duration::from_secs(request_timeout),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Send a request carrying the stored credential, if any
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        options: RequestOptions,
    ) -> Result<ApiResponse, AdminError> {
        self.execute(method, path, body, options, true).await
    }

    /// Send a request that never carries a bearer header (login)
    pub async fn request_unauthenticated(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        options: RequestOptions,
    ) -> Result<ApiResponse, AdminError> {
        self.execute(method, path, body, options, false).await
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        options: RequestOptions,
        authenticated: bool,
    ) -> Result<ApiResponse, AdminError> {
        let url = format!("{}{}", self.base_url, path);
        let timeout = options.timeout.unwrap_or(self.request_timeout);

        let mut headers = options.headers;
        headers.remove(AUTHORIZATION);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if authenticated {
            if let Some(token) = self.credentials.get().await {
                let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                    AdminError::Internal(anyhow::anyhow!("Credential is not a valid header: {}", e))
                })?;
                headers.insert(AUTHORIZATION, value);
            }
        }

        tracing::debug!(
            method = %method,
            url = %url,
            authenticated = headers.contains_key(AUTHORIZATION),
            "Sending HTTP request"
        );

        let mut builder = self
            .client
            .request(method.clone(), &url)
            .headers(headers)
            .timeout(timeout);
        if let Some(body) = body {
            builder = builder.body(body.to_string());
        }

        // Headers and body share one deadline
        let exchange = tokio::time::timeout(timeout, async move {
            let response = builder.send().await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>(ApiResponse { status, body })
        });

        let result = match options.cancel {
            Some(cancel) => {
                tokio::select! {
                    result = exchange => result,
                    _ = cancel.cancelled() => {
                        tracing::warn!(method = %method, url = %url, "HTTP request cancelled");
                        return Err(AdminError::Cancelled);
                    }
                }
            }
            None => exchange.await,
        };

        match result {
            Ok(Ok(response)) => {
                tracing::debug!(status = %response.status, "Received HTTP response");
                Ok(response)
            }
            Ok(Err(e)) => {
                // Categorize the error for better debugging
                let error_kind = if e.is_timeout() {
                    "timeout"
                } else if e.is_connect() {
                    "connection_failed"
                } else if e.is_request() {
                    "request_error"
                } else if e.is_body() {
                    "body_error"
                } else {
                    "unknown"
                };

                tracing::warn!(
                    error_kind = error_kind,
                    error = %e,
                    method = %method,
                    url = %url,
                    "HTTP request error"
                );

                if e.is_timeout() {
                    return Err(AdminError::Timeout { after: timeout });
                }

                Err(AdminError::Network(format!("{} (kind: {})", e, error_kind)))
            }
            Err(_) => {
                tracing::warn!(
                    method = %method,
                    url = %url,
                    timeout_ms = timeout.as_millis() as u64,
                    "HTTP request timed out"
                );
                Err(AdminError::Timeout { after: timeout })
            }
        }
    }
}

/// Pass a 2xx response through; otherwise build an error from status and body
pub fn ensure_success<F>(response: ApiResponse, on_error: F) -> Result<ApiResponse, AdminError>
where
    F: FnOnce(u16, String) -> AdminError,
{
    if response.status.is_success() {
        return Ok(response);
    }

    Err(on_error(response.status.as_u16(), response.body))
}
