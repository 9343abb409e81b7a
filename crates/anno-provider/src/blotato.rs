//! Blotato API client — the asynchronous-capable video provider.
//!
//! Creation requests go to `POST {base_url}/videos/creations`; results are
//! polled from `GET {base_url}/videos/creations/{id}`. The upstream response
//! shapes vary between root-level fields and a nested `item`/`data` object,
//! so extraction probes the known locations.

use std::time::Duration;

use async_trait::async_trait;
use metrics::counter;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::error::{ProviderError, ProviderResult};
use crate::provider::{ProviderKind, VideoProvider};

/// Default style forwarded when the job carries none.
const DEFAULT_STYLE: &str = "cinematic";

/// Dispatch attempts for transient creation failures.
const DISPATCH_ATTEMPTS: u32 = 3;

/// Blotato client configuration.
#[derive(Debug, Clone)]
pub struct BlotatoConfig {
    pub api_key: String,
    pub base_url: String,
    pub template_id: String,
    /// Sleep between polls on the blocking generation path.
    pub poll_interval: Duration,
    /// Hard ceiling for blocking generation.
    pub generation_timeout: Duration,
}

impl Default for BlotatoConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://backend.blotato.com/v2".to_string(),
            template_id: String::new(),
            poll_interval: Duration::from_secs(5),
            generation_timeout: Duration::from_secs(300),
        }
    }
}

impl BlotatoConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("BLOTATO_API_KEY").unwrap_or_default(),
            base_url: std::env::var("BLOTATO_BASE_URL").unwrap_or(defaults.base_url),
            template_id: std::env::var("BLOTATO_TEMPLATE_ID").unwrap_or_default(),
            poll_interval: defaults.poll_interval,
            generation_timeout: defaults.generation_timeout,
        }
    }
}

/// Blotato video provider adapter.
pub struct BlotatoProvider {
    config: BlotatoConfig,
    client: Client,
}

impl BlotatoProvider {
    pub fn new(config: BlotatoConfig) -> ProviderResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { config, client })
    }

    fn creation_url(&self) -> String {
        format!("{}/videos/creations", self.config.base_url)
    }

    fn status_url(&self, creation_id: &str) -> String {
        format!("{}/videos/creations/{}", self.config.base_url, creation_id)
    }

    /// One creation attempt, without retry handling.
    async fn create_once(&self, prompt: &str, style: Option<&str>) -> ProviderResult<String> {
        let body = json!({
            "template": { "id": self.config.template_id },
            "script": prompt,
            "style": style.unwrap_or(DEFAULT_STYLE),
        });

        let response = self
            .client
            .post(self.creation_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        debug!(%status, "Blotato create response");

        if status.is_client_error() {
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Rejected(format!("{status}: {text}")));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Transient(format!("{status}: {text}")));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Transient(format!("invalid creation response: {e}")))?;

        extract_creation_id(&payload).ok_or(ProviderError::MissingCreationId)
    }
}

#[async_trait]
impl VideoProvider for BlotatoProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Blotato
    }

    async fn request_creation(
        &self,
        prompt: &str,
        style: Option<&str>,
    ) -> ProviderResult<String> {
        counter!("provider_requests_total", "provider" => "blotato", "operation" => "create")
            .increment(1);

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.create_once(prompt, style).await {
                Ok(creation_id) => {
                    info!(%creation_id, "Blotato creation started");
                    return Ok(creation_id);
                }
                Err(e) if e.is_transient() && attempt < DISPATCH_ATTEMPTS => {
                    warn!(attempt, "Blotato creation attempt failed: {e}");
                    counter!("provider_retries_total", "provider" => "blotato").increment(1);
                    // Linear backoff in whole seconds of the attempt number.
                    tokio::time::sleep(Duration::from_secs(attempt as u64)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_result(&self, creation_id: &str) -> ProviderResult<Option<String>> {
        counter!("provider_requests_total", "provider" => "blotato", "operation" => "poll")
            .increment(1);

        let response = self
            .client
            .get(self.status_url(creation_id))
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            warn!(
                %creation_id,
                status = %response.status(),
                "Blotato status poll returned non-OK, treating as not ready"
            );
            return Ok(None);
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Transient(format!("invalid status response: {e}")))?;

        match extract_status(&payload) {
            Some("completed") => match extract_video_url(&payload) {
                Some(url) => Ok(Some(url)),
                None => Err(ProviderError::MissingVideoUrl),
            },
            Some("failed") => Err(ProviderError::Failed(
                "video generation failed on provider side".to_string(),
            )),
            _ => Ok(None),
        }
    }

    async fn generate_blocking(
        &self,
        prompt: &str,
        style: Option<&str>,
    ) -> ProviderResult<String> {
        let creation_id = self.request_creation(prompt, style).await?;
        let deadline = tokio::time::Instant::now() + self.config.generation_timeout;

        loop {
            tokio::time::sleep(self.config.poll_interval).await;

            if tokio::time::Instant::now() >= deadline {
                return Err(ProviderError::Timeout(
                    self.config.generation_timeout.as_secs(),
                ));
            }

            match self.fetch_result(&creation_id).await {
                Ok(Some(url)) => {
                    info!(%creation_id, "Blotato generation completed");
                    return Ok(url);
                }
                Ok(None) => {
                    debug!(%creation_id, "Blotato generation still processing");
                }
                Err(e @ (ProviderError::Failed(_) | ProviderError::MissingVideoUrl)) => {
                    return Err(e);
                }
                Err(e) => {
                    // Transient poll errors are tolerated until the deadline.
                    warn!(%creation_id, "error checking video status: {e}");
                }
            }
        }
    }
}

/// Probe the known locations for the creation identifier.
fn extract_creation_id(payload: &Value) -> Option<String> {
    let candidate = payload
        .get("id")
        .or_else(|| payload.get("item").and_then(|item| item.get("id")))
        .or_else(|| payload.get("data").and_then(|data| data.get("id")))?;

    match candidate {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn extract_status(payload: &Value) -> Option<&str> {
    payload
        .get("status")
        .or_else(|| payload.get("item").and_then(|item| item.get("status")))
        .and_then(Value::as_str)
}

fn extract_video_url(payload: &Value) -> Option<String> {
    payload
        .get("videoUrl")
        .or_else(|| payload.get("item").and_then(|item| item.get("videoUrl")))
        .or_else(|| payload.get("item").and_then(|item| item.get("resultUrl")))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_creation_id_locations() {
        assert_eq!(
            extract_creation_id(&json!({"id": "abc"})).as_deref(),
            Some("abc")
        );
        assert_eq!(
            extract_creation_id(&json!({"item": {"id": 42}})).as_deref(),
            Some("42")
        );
        assert_eq!(
            extract_creation_id(&json!({"data": {"id": "xyz"}})).as_deref(),
            Some("xyz")
        );
        assert!(extract_creation_id(&json!({"ok": true})).is_none());
    }

    #[test]
    fn test_extract_status_and_url() {
        let nested = json!({"item": {"status": "completed", "resultUrl": "https://cdn/x.mp4"}});
        assert_eq!(extract_status(&nested), Some("completed"));
        assert_eq!(extract_video_url(&nested).as_deref(), Some("https://cdn/x.mp4"));

        let root = json!({"status": "pending"});
        assert_eq!(extract_status(&root), Some("pending"));
        assert!(extract_video_url(&root).is_none());
    }
}
