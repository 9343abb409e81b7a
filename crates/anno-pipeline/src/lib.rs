//! Video generation pipeline: job orchestration, background polling, and
//! terminal-event fan-out.
//!
//! The flow is create -> dispatch -> poll -> materialize:
//! 1. [`JobService::create_job`] persists a QUEUED job and dispatches it to
//!    the configured async provider.
//! 2. [`JobPoller`] periodically asks the provider for each in-flight job's
//!    result.
//! 3. On completion the service materializes the asset, draft, and post
//!    records and notifies [`JobEventBus`] listeners (n8n among them).

pub mod error;
pub mod events;
pub mod n8n;
pub mod poller;
pub mod service;

pub use error::{PipelineError, PipelineResult};
pub use events::{JobEventBus, JobListener};
pub use n8n::{N8nClient, N8nJobListener};
pub use poller::{JobPoller, PollerConfig};
pub use service::JobService;
