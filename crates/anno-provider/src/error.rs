//! Provider error types.

use thiserror::Error;

use crate::provider::ProviderKind;

pub type ProviderResult<T> = Result<T, ProviderError>;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// Upstream failure that may succeed on retry (5xx, malformed response).
    #[error("Provider request failed: {0}")]
    Transient(String),

    /// Explicit client-error response (4xx-equivalent). Never retried.
    #[error("Provider rejected request: {0}")]
    Rejected(String),

    /// The provider reported a permanent generation failure.
    #[error("Generation failed: {0}")]
    Failed(String),

    /// A creation request succeeded but carried no usable identifier.
    #[error("No creation ID received from provider")]
    MissingCreationId,

    /// A completed generation carried no media URL.
    #[error("Generation completed but no video URL provided")]
    MissingVideoUrl,

    /// Blocking generation exceeded its time budget.
    #[error("Generation timed out after {0} seconds")]
    Timeout(u64),

    /// Async operation invoked on a synchronous-only provider.
    #[error("{0} does not support asynchronous generation")]
    Unsupported(ProviderKind),

    /// Provider resolution or capability mismatch at startup.
    #[error("Provider configuration error: {0}")]
    Configuration(String),

    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ProviderError {
    /// Whether a dispatch attempt hitting this error should be retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, ProviderError::Transient(_) | ProviderError::Http(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(ProviderError::Transient("502".into()).is_transient());
        assert!(!ProviderError::Rejected("400".into()).is_transient());
        assert!(!ProviderError::Failed("boom".into()).is_transient());
        assert!(!ProviderError::MissingCreationId.is_transient());
    }
}
