//! The uniform provider contract.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

use crate::error::{ProviderError, ProviderResult};

/// The closed set of supported AI video backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Blotato,
    Sora,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Blotato => "BLOTATO",
            ProviderKind::Sora => "SORA",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BLOTATO" => Ok(ProviderKind::Blotato),
            "SORA" => Ok(ProviderKind::Sora),
            other => Err(ProviderError::Configuration(format!(
                "unknown video provider: {other}"
            ))),
        }
    }
}

/// Adapter contract over a specific AI video backend.
///
/// Implementations translate our domain requests into the provider's native
/// calls. Synchronous-only providers return `false` from [`supports_async`]
/// and fail the async methods with [`ProviderError::Unsupported`].
///
/// [`supports_async`]: VideoProvider::supports_async
#[async_trait]
pub trait VideoProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Whether the provider supports asynchronous creation flows.
    fn supports_async(&self) -> bool {
        true
    }

    /// Initiate an asynchronous generation and return the provider-specific
    /// creation identifier.
    async fn request_creation(&self, prompt: &str, style: Option<&str>)
        -> ProviderResult<String>;

    /// Non-blocking poll: `None` while the creation is still processing, the
    /// final media URL once it completed.
    async fn fetch_result(&self, creation_id: &str) -> ProviderResult<Option<String>>;

    /// Generate a video in a blocking fashion, polling internally until the
    /// result is ready or the time budget elapses.
    async fn generate_blocking(&self, prompt: &str, style: Option<&str>)
        -> ProviderResult<String>;
}
