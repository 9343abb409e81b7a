//! Content records materialized when a generation job completes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted piece of media with its storage URL and ownership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    /// Database identifier (0 until persisted)
    pub id: i64,
    /// Owning user profile ID
    pub owner_id: i64,
    /// Media kind, e.g. "video" or "image"
    pub kind: String,
    /// Source tag describing where the media came from
    pub source: String,
    /// Blob storage URL
    pub blob_url: String,
    pub created_at: DateTime<Utc>,
}

impl Asset {
    pub fn new(
        owner_id: i64,
        kind: impl Into<String>,
        source: impl Into<String>,
        blob_url: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            owner_id,
            kind: kind.into(),
            source: source.into(),
            blob_url: blob_url.into(),
            created_at: Utc::now(),
        }
    }
}

/// Intermediate record linking an asset to intended publication metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDraft {
    /// Database identifier (0 until persisted)
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Referenced asset
    pub asset_id: i64,
    /// Target platforms, comma-separated
    pub targets: String,
    /// Draft status, e.g. "pending"
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl PostDraft {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        asset_id: i64,
        targets: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            title: title.into(),
            description: description.into(),
            asset_id,
            targets: targets.into(),
            status: status.into(),
            created_at: Utc::now(),
        }
    }
}

/// A user-facing post entry created for a generated video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPost {
    /// Database identifier (0 until persisted)
    pub id: i64,
    /// Owning user profile ID
    pub profile_id: i64,
    pub title: String,
    /// Post body text
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    /// Post status, e.g. "published"
    pub status: String,
    /// Parsed target platform list
    #[serde(default)]
    pub target_platforms: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl UserPost {
    pub fn new(
        profile_id: i64,
        title: impl Into<String>,
        content: impl Into<String>,
        video_url: Option<String>,
        status: impl Into<String>,
        target_platforms: Vec<String>,
    ) -> Self {
        Self {
            id: 0,
            profile_id,
            title: title.into(),
            content: content.into(),
            video_url,
            status: status.into(),
            target_platforms,
            created_at: Utc::now(),
        }
    }
}
