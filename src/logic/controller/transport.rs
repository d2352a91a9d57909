//! Controller Transport
//!
//! JSON exchange with the controller. Best effort: no retries, every call
//! bounded by a timeout.

use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;

use crate::config::Config;
use crate::error::TransportError;

/// Authenticated JSON POST/GET against the controller
pub trait Transport: Send + Sync + 'static {
    /// POST a JSON body; anything but 200 is an error
    fn post_json(
        &self,
        path: &str,
        body: &Value,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// GET and decode a JSON body; anything but 200 is an error
    fn get_json(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> impl Future<Output = Result<Value, TransportError>> + Send;
}

/// reqwest-backed transport
pub struct HttpTransport {
    base_url: String,
    get_timeout: Duration,
    http_client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self, TransportError> {
        if config.tls_skip_verify {
            tracing::warn!("TLS certificate verification DISABLED (development only)");
        }

        let http_client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .danger_accept_invalid_certs(config.tls_skip_verify)
            .build()
            .map_err(|e| TransportError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.api_server.clone(),
            get_timeout: config.poll_timeout,
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Transport for HttpTransport {
    async fn post_json(&self, path: &str, body: &Value) -> Result<(), TransportError> {
        let response = self.http_client
            .post(self.url(path))
            .json(body)
            .send()
            .await?;

        if response.status() == StatusCode::OK {
            Ok(())
        } else {
            Err(TransportError::Status(response.status().as_u16()))
        }
    }

    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, TransportError> {
        let response = self.http_client
            .get(self.url(path))
            .query(query)
            .timeout(self.get_timeout)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(TransportError::Status(response.status().as_u16()));
        }

        response.json().await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}
