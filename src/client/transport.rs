//! HTTP transport behind the rate client.
//!
//! The client only needs "POST this JSON to that path, give me status + body",
//! so that is the whole `Transport` surface. `HttpTransport` is the real
//! implementation; tests use an in-memory fake.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;

use crate::config::ApiConfig;
use crate::error::{AppError, TaskError};

/// Raw response: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Request/response interface to the rate service.
///
/// Implementations are shared by all workers, so they must be `Send + Sync`
/// and hold no per-request mutable state.
pub trait Transport: Send + Sync {
    fn post_json(&self, path: &str, body: &Value) -> Result<HttpResponse, TaskError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post_json(&self, path: &str, body: &Value) -> Result<HttpResponse, TaskError> {
        (**self).post_json(path, body)
    }
}

/// Blocking `reqwest` transport with bearer authentication.
pub struct HttpTransport {
    client: Client,
    config: ApiConfig,
}

impl HttpTransport {
    pub fn new(config: ApiConfig) -> Result<Self, AppError> {
        // No request timeout: a slow create holds one worker until it finishes.
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

impl Transport for HttpTransport {
    fn post_json(&self, path: &str, body: &Value) -> Result<HttpResponse, TaskError> {
        let url = self.config.url(path);
        tracing::debug!(%url, "POST");

        let resp = self
            .client
            .post(&url)
            .header(ACCEPT, "application/json, text/plain, */*")
            .header(CONTENT_TYPE, "application/json;charset=UTF-8")
            .bearer_auth(self.config.token())
            .json(body)
            .send()
            .map_err(|e| TaskError::Transport(format!("POST {url}: {e}")))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .map_err(|e| TaskError::Transport(format!("reading response from {url}: {e}")))?;

        Ok(HttpResponse { status, body })
    }
}
