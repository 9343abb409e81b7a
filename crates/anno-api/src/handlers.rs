//! HTTP handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use anno_models::{GenerationRequest, VideoJob};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct GenerateVideoRequest {
    #[validate(length(min = 1, max = 5000, message = "prompt must be 1-5000 characters"))]
    pub prompt: String,
    #[validate(length(min = 1, max = 500, message = "title must be 1-500 characters"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, message = "targets must not be empty"))]
    pub targets: String,
    pub style: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusResponse {
    pub job_id: i64,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

fn rfc3339(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl From<&VideoJob> for JobStatusResponse {
    fn from(job: &VideoJob) -> Self {
        Self {
            job_id: job.id,
            status: job.status.to_string(),
            created_at: rfc3339(job.created_at),
            updated_at: rfc3339(job.updated_at),
            video_url: job.video_url.clone(),
            error_message: job.error_message.clone(),
        }
    }
}

/// POST /api/videos/generate
///
/// Accepts the job and returns 202 immediately; generation happens in the
/// background and is observable via the status endpoint.
pub async fn generate_video(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<GenerateVideoRequest>,
) -> ApiResult<(StatusCode, Json<JobStatusResponse>)> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    info!(profile_id = user.profile_id, "video generation requested");

    let request = GenerationRequest {
        prompt: request.prompt,
        title: request.title,
        description: request.description,
        targets: request.targets,
        style: request.style,
    };
    let job = state.service.create_job(user.profile_id, &request).await?;

    Ok((StatusCode::ACCEPTED, Json(JobStatusResponse::from(&job))))
}

/// GET /api/videos/jobs/:job_id
pub async fn get_job_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(job_id): Path<i64>,
) -> ApiResult<Json<JobStatusResponse>> {
    let job = state.service.get_job(job_id).await?;
    if job.owner_id != user.profile_id {
        return Err(ApiError::forbidden("job belongs to another user"));
    }
    Ok(Json(JobStatusResponse::from(&job)))
}

/// GET /api/videos/jobs
pub async fn list_jobs(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<JobStatusResponse>>> {
    let jobs = state.service.jobs_by_owner(user.profile_id).await?;
    Ok(Json(jobs.iter().map(JobStatusResponse::from).collect()))
}

/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /ready — also verifies the database answers.
pub async fn ready(State(state): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    state.db.with_conn(|conn| {
        conn.query_row("SELECT 1", [], |r| r.get::<_, i64>(0))
            .map_err(anno_db::DatabaseError::Sqlite)?;
        Ok(())
    })?;
    Ok(Json(serde_json::json!({ "status": "ready" })))
}
