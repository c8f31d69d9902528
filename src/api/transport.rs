use crate::error::ClientError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

#[async_trait]
pub trait Transport: Send + Sync {
    /// Human-readable name of the transport
    fn name(&self) -> &'static str;

    /// GET `url` and decode the body as JSON. Transport failures and bodies
    /// that are not JSON both surface as [`ClientError::Network`].
    async fn get_json(&self, url: &Url) -> Result<Value, ClientError>;
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self::from_client(client))
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn get_json(&self, url: &Url) -> Result<Value, ClientError> {
        let response = self.client.get(url.clone()).send().await?;

        // Error statuses still carry the JSON envelope, which decides the outcome.
        debug!("Extraction API answered HTTP {}", response.status());

        Ok(response.json::<Value>().await?)
    }
}
