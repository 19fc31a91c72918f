use crate::core::{ConfigProvider, CoverLocator, CoverResource, CoverSource, FetchOutcome};
use crate::utils::error::{FetchError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Talks to the remote cover service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCoverClient {
    client: Client,
    base_url: String,
    resource_kind: String,
}

impl HttpCoverClient {
    pub fn new(base_url: impl Into<String>, resource_kind: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url, resource_kind)
    }

    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        resource_kind: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        let resource_kind: String = resource_kind.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            resource_kind: resource_kind.trim_matches('/').to_string(),
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout_seconds() {
            builder = builder.timeout(Duration::from_secs(timeout));
        }
        let client = builder.build()?;

        Ok(Self::with_client(
            client,
            config.base_url(),
            config.resource_kind(),
        ))
    }

    pub fn url_for(&self, locator: &CoverLocator) -> String {
        format!("{}/{}/{}", self.base_url, self.resource_kind, locator)
    }

    /// Looks up a single cover by id, without cancellation.
    ///
    /// A non-success status yields `Ok(None)`; transport and decode failures
    /// are returned as errors.
    pub async fn get_cover(&self, id: &str) -> Result<Option<CoverResource>> {
        let locator = CoverLocator::new(id);
        match self.request(&locator).await {
            FetchOutcome::Success(cover) => Ok(Some(cover)),
            FetchOutcome::Absent(_) | FetchOutcome::Cancelled => Ok(None),
            FetchOutcome::Failed(err) => Err(err.into()),
        }
    }

    async fn request(&self, locator: &CoverLocator) -> FetchOutcome {
        let url = self.url_for(locator);
        tracing::debug!("Requesting cover: {}", url);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => return FetchOutcome::Failed(FetchError::Transport(e)),
        };

        let status = response.status();
        tracing::debug!("Cover response status for {}: {}", locator, status);

        if !status.is_success() {
            return FetchOutcome::Absent(status.as_u16());
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return FetchOutcome::Failed(FetchError::Transport(e)),
        };

        match decode_cover(&body) {
            Ok(Some(cover)) => FetchOutcome::Success(cover),
            Ok(None) => FetchOutcome::Absent(status.as_u16()),
            Err(e) => FetchOutcome::Failed(FetchError::Decode(e)),
        }
    }
}

#[async_trait]
impl CoverSource for HttpCoverClient {
    async fn fetch(&self, locator: &CoverLocator, cancel: &CancellationToken) -> FetchOutcome {
        if cancel.is_cancelled() {
            return FetchOutcome::Cancelled;
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Cover request for {} cancelled in flight", locator);
                FetchOutcome::Cancelled
            }
            outcome = self.request(locator) => outcome,
        }
    }
}

/// Decodes a cover body, matching property names case-insensitively.
///
/// A JSON `null` body decodes to `None`.
pub fn decode_cover(body: &str) -> std::result::Result<Option<CoverResource>, serde_json::Error> {
    let value: Value = serde_json::from_str(body)?;
    let value = match value {
        Value::Null => return Ok(None),
        Value::Object(obj) => Value::Object(lowercase_keys(obj)),
        other => other,
    };
    serde_json::from_value(value).map(Some)
}

// Keys arrive in document order, so a later duplicate overwrites an earlier one.
fn lowercase_keys(obj: Map<String, Value>) -> Map<String, Value> {
    obj.into_iter()
        .map(|(key, value)| (key.to_lowercase(), value))
        .collect()
}
