//! Video generation job entity and status state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Job processing status.
///
/// `Completed` and `Failed` are terminal: no transition ever leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// Job is persisted but not yet dispatched to a provider
    #[default]
    Queued,
    /// Dispatch succeeded; the provider is generating the video
    Processing,
    /// Video is ready and domain records were materialized
    Completed,
    /// Dispatch or generation failed
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "QUEUED",
            JobStatus::Processing => "PROCESSING",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Failed => "FAILED",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error for parsing an unknown status string from storage.
#[derive(Debug, thiserror::Error)]
#[error("unknown job status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for JobStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "QUEUED" => Ok(JobStatus::Queued),
            "PROCESSING" => Ok(JobStatus::Processing),
            "COMPLETED" => Ok(JobStatus::Completed),
            "FAILED" => Ok(JobStatus::Failed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Input for creating a video generation job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Text prompt for the AI provider
    pub prompt: String,
    /// Title of the resulting post
    pub title: String,
    /// Description / post body
    #[serde(default)]
    pub description: String,
    /// Target platforms, comma-separated (e.g. "instagram,tiktok")
    pub targets: String,
    /// Optional style hint forwarded to the provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl GenerationRequest {
    /// Check the required fields (prompt, title, targets must be non-blank).
    ///
    /// Returns the name of the first missing field, if any.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.prompt.trim().is_empty() {
            return Err("prompt");
        }
        if self.title.trim().is_empty() {
            return Err("title");
        }
        if self.targets.trim().is_empty() {
            return Err("targets");
        }
        Ok(())
    }
}

/// An asynchronous video generation job tracked from QUEUED to a terminal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoJob {
    /// Database identifier (0 until persisted)
    pub id: i64,

    /// Owning user profile ID
    pub owner_id: i64,

    /// Text prompt given to the provider
    pub prompt: String,

    /// Title of the resulting post
    pub title: String,

    /// Description / post body
    pub description: String,

    /// Target platforms, comma-separated
    pub targets: String,

    /// Optional style hint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    /// Provider-assigned creation identifier, set once dispatch succeeds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_id: Option<String>,

    /// Current status
    #[serde(default)]
    pub status: JobStatus,

    /// Final media URL (set only on COMPLETED)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,

    /// Error message (set only on FAILED)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,

    /// Completion timestamp (set only on transition to COMPLETED)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    /// Asset record created on completion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<i64>,

    /// Post draft record created on completion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft_id: Option<i64>,
}

impl VideoJob {
    /// Create a new QUEUED job for the given owner.
    pub fn new(owner_id: i64, request: &GenerationRequest) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            owner_id,
            prompt: request.prompt.clone(),
            title: request.title.clone(),
            description: request.description.clone(),
            targets: request.targets.clone(),
            style: request.style.clone(),
            creation_id: None,
            status: JobStatus::Queued,
            video_url: None,
            error_message: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
            asset_id: None,
            draft_id: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Record a successful dispatch: QUEUED -> PROCESSING with a creation ID.
    pub fn mark_processing(&mut self, creation_id: impl Into<String>) {
        self.status = JobStatus::Processing;
        self.creation_id = Some(creation_id.into());
        self.updated_at = Utc::now();
    }

    /// Record completion with the final media URL and materialized records.
    pub fn mark_completed(&mut self, video_url: impl Into<String>, asset_id: i64, draft_id: i64) {
        self.status = JobStatus::Completed;
        self.video_url = Some(video_url.into());
        self.asset_id = Some(asset_id);
        self.draft_id = Some(draft_id);
        self.completed_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    /// Record a terminal failure.
    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.status = JobStatus::Failed;
        self.error_message = Some(error.into());
        self.updated_at = Utc::now();
    }

    /// Parse the comma-separated targets into a platform list.
    pub fn target_platforms(&self) -> Vec<String> {
        split_targets(&self.targets)
    }
}

/// Split a comma-separated target string into trimmed, non-empty platform names.
pub fn split_targets(targets: &str) -> Vec<String> {
    targets
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerationRequest {
        GenerationRequest {
            prompt: "a cat riding a bike".into(),
            title: "Cat Bike".into(),
            description: "A short clip".into(),
            targets: "instagram,tiktok".into(),
            style: Some("cinematic".into()),
        }
    }

    #[test]
    fn test_new_job_is_queued() {
        let job = VideoJob::new(7, &request());
        assert_eq!(job.status, JobStatus::Queued);
        assert_eq!(job.owner_id, 7);
        assert!(job.creation_id.is_none());
        assert!(!job.is_terminal());
    }

    #[test]
    fn test_status_transitions() {
        let mut job = VideoJob::new(1, &request());

        job.mark_processing("creation-42");
        assert_eq!(job.status, JobStatus::Processing);
        assert_eq!(job.creation_id.as_deref(), Some("creation-42"));

        job.mark_completed("https://cdn/x.mp4", 10, 20);
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.video_url.as_deref(), Some("https://cdn/x.mp4"));
        assert_eq!(job.asset_id, Some(10));
        assert_eq!(job.draft_id, Some(20));
        assert!(job.completed_at.is_some());
        assert!(job.is_terminal());
    }

    #[test]
    fn test_failed_is_terminal() {
        let mut job = VideoJob::new(1, &request());
        job.mark_failed("provider exploded");
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error_message.as_deref(), Some("provider exploded"));
        assert!(job.is_terminal());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            JobStatus::Queued,
            JobStatus::Processing,
            JobStatus::Completed,
            JobStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<JobStatus>().unwrap(), status);
        }
        assert!("DONE".parse::<JobStatus>().is_err());
    }

    #[test]
    fn test_validate_required_fields() {
        assert!(request().validate().is_ok());

        let mut blank_prompt = request();
        blank_prompt.prompt = "   ".into();
        assert_eq!(blank_prompt.validate(), Err("prompt"));

        let mut blank_title = request();
        blank_title.title = String::new();
        assert_eq!(blank_title.validate(), Err("title"));

        let mut blank_targets = request();
        blank_targets.targets = " ".into();
        assert_eq!(blank_targets.validate(), Err("targets"));
    }

    #[test]
    fn test_split_targets() {
        assert_eq!(
            split_targets("instagram, tiktok ,,youtube"),
            vec!["instagram", "tiktok", "youtube"]
        );
        assert!(split_targets("  ").is_empty());
    }
}
