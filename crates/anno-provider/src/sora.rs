//! Sora adapter. Synchronous-only: the integration has no creation/poll
//! surface yet, so the async methods report [`ProviderError::Unsupported`]
//! and blocking generation returns a placeholder URL.

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::error::{ProviderError, ProviderResult};
use crate::provider::{ProviderKind, VideoProvider};

#[derive(Debug, Default)]
pub struct SoraProvider;

impl SoraProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl VideoProvider for SoraProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Sora
    }

    fn supports_async(&self) -> bool {
        false
    }

    async fn request_creation(
        &self,
        _prompt: &str,
        _style: Option<&str>,
    ) -> ProviderResult<String> {
        Err(ProviderError::Unsupported(ProviderKind::Sora))
    }

    async fn fetch_result(&self, _creation_id: &str) -> ProviderResult<Option<String>> {
        Err(ProviderError::Unsupported(ProviderKind::Sora))
    }

    async fn generate_blocking(
        &self,
        prompt: &str,
        _style: Option<&str>,
    ) -> ProviderResult<String> {
        info!(prompt_len = prompt.len(), "Sora generation requested");
        Ok(format!(
            "https://sora.example.com/videos/{}.mp4",
            Uuid::new_v4()
        ))
    }
}
