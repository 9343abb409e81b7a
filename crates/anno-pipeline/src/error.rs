//! Pipeline error types.

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Request payload failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Startup or environment misconfiguration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Stored state is inconsistent with what an operation requires.
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    /// Requested record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Provider(#[from] anno_provider::ProviderError),

    #[error(transparent)]
    Db(#[from] anno_db::DatabaseError),
}
