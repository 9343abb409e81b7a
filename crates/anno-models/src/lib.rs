//! Shared data models for the Announce backend.
//!
//! This crate contains the domain types used across the workspace:
//! - Video generation jobs and their status state machine
//! - Content records materialized on completion (assets, drafts, posts)
//! - User profiles

pub mod content;
pub mod job;
pub mod profile;

pub use content::{Asset, PostDraft, UserPost};
pub use job::{split_targets, GenerationRequest, JobStatus, VideoJob};
pub use profile::UserProfile;
