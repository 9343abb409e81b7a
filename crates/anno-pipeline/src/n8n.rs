//! n8n workflow notification.
//!
//! Completed videos are handed off to an n8n webhook which runs the
//! downstream publishing workflow. The payload is the contract n8n expects:
//! `{ title, description, blobUrl, targets }`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::info;

use anno_models::VideoJob;

use crate::events::JobListener;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WebhookPayload<'a> {
    title: &'a str,
    description: &'a str,
    blob_url: &'a str,
    targets: Vec<String>,
}

#[derive(Clone)]
pub struct N8nClient {
    client: Client,
    webhook_url: String,
}

impl N8nClient {
    pub fn new(webhook_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            client,
            webhook_url: webhook_url.into(),
        })
    }

    /// POST the completed video to the configured webhook.
    pub async fn notify_video_ready(
        &self,
        title: &str,
        description: &str,
        blob_url: &str,
        targets: Vec<String>,
    ) -> anyhow::Result<()> {
        let payload = WebhookPayload {
            title,
            description,
            blob_url,
            targets,
        };

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("n8n webhook returned {status}");
        }
        info!(%status, "n8n webhook notified");
        Ok(())
    }
}

/// Event listener bridging completed jobs to the n8n webhook.
pub struct N8nJobListener {
    client: N8nClient,
}

impl N8nJobListener {
    pub fn new(client: N8nClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobListener for N8nJobListener {
    fn name(&self) -> &'static str {
        "n8n"
    }

    async fn on_completed(&self, job: &VideoJob) -> anyhow::Result<()> {
        let Some(video_url) = job.video_url.as_deref() else {
            // Nothing to hand off without a media URL.
            return Ok(());
        };
        self.client
            .notify_video_ready(&job.title, &job.description, video_url, job.target_platforms())
            .await
    }
}
