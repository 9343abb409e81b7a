//! Job repository — persistence and guarded status transitions for the
//! `video_jobs` table.
//!
//! Terminal states are enforced here: every transition is a compare-and-set
//! restricted to non-terminal rows, so duplicate poller ticks or concurrent
//! API calls can never move a job out of COMPLETED or FAILED.

use chrono::Utc;
use rusqlite::{params, Row};
use tracing::debug;

use anno_models::{JobStatus, VideoJob};

use super::{fmt_ts, parse_ts, Database, DatabaseError, DbResult};

fn job_from_row(row: &Row<'_>) -> Result<VideoJob, rusqlite::Error> {
    let status: String = row.get("status")?;
    let status = status.parse::<JobStatus>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;
    let completed_at: Option<String> = row.get("completed_at")?;

    Ok(VideoJob {
        id: row.get("id")?,
        owner_id: row.get("owner_id")?,
        prompt: row.get("prompt")?,
        title: row.get("title")?,
        description: row.get("description")?,
        targets: row.get("targets")?,
        style: row.get("style")?,
        creation_id: row.get("creation_id")?,
        status,
        video_url: row.get("video_url")?,
        error_message: row.get("error_message")?,
        created_at: parse_ts(&created_at)?,
        updated_at: parse_ts(&updated_at)?,
        completed_at: completed_at.as_deref().map(parse_ts).transpose()?,
        asset_id: row.get("asset_id")?,
        draft_id: row.get("draft_id")?,
    })
}

/// Inserts a new job row and returns its assigned ID.
pub fn insert(db: &Database, job: &VideoJob) -> DbResult<i64> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO video_jobs (owner_id, prompt, title, description, targets, style,
             creation_id, status, video_url, error_message, created_at, updated_at,
             completed_at, asset_id, draft_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                job.owner_id,
                job.prompt,
                job.title,
                job.description,
                job.targets,
                job.style,
                job.creation_id,
                job.status.as_str(),
                job.video_url,
                job.error_message,
                fmt_ts(job.created_at),
                fmt_ts(job.updated_at),
                job.completed_at.map(fmt_ts),
                job.asset_id,
                job.draft_id,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

/// Finds a job by its ID.
pub fn find_by_id(db: &Database, id: i64) -> DbResult<Option<VideoJob>> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM video_jobs WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id], job_from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

/// All jobs belonging to an owner, newest first.
pub fn find_by_owner(db: &Database, owner_id: i64) -> DbResult<Vec<VideoJob>> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT * FROM video_jobs WHERE owner_id = ?1 ORDER BY created_at DESC, id DESC",
        )?;
        let jobs = stmt
            .query_map(params![owner_id], job_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(jobs)
    })
}

/// All non-terminal jobs (QUEUED or PROCESSING), oldest first.
///
/// The ascending creation-time order gives the poller FIFO fairness.
pub fn pending(db: &Database) -> DbResult<Vec<VideoJob>> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT * FROM video_jobs WHERE status IN ('QUEUED', 'PROCESSING')
             ORDER BY created_at ASC, id ASC",
        )?;
        let jobs = stmt
            .query_map([], job_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(jobs)
    })
}

/// QUEUED -> PROCESSING with the provider-assigned creation ID.
///
/// Returns `false` if the job was not in QUEUED (transition lost).
pub fn mark_processing(db: &Database, id: i64, creation_id: &str) -> DbResult<bool> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE video_jobs SET status = 'PROCESSING', creation_id = ?2, updated_at = ?3
             WHERE id = ?1 AND status = 'QUEUED'",
            params![id, creation_id, fmt_ts(Utc::now())],
        )?;
        debug!(job_id = id, changed, "mark_processing");
        Ok(changed > 0)
    })
}

/// Non-terminal -> COMPLETED with result references.
///
/// Returns `false` if the job was already terminal.
pub fn mark_completed(
    db: &Database,
    id: i64,
    video_url: &str,
    asset_id: i64,
    draft_id: i64,
) -> DbResult<bool> {
    db.with_conn(|conn| {
        let now = fmt_ts(Utc::now());
        let changed = conn.execute(
            "UPDATE video_jobs SET status = 'COMPLETED', video_url = ?2, asset_id = ?3,
             draft_id = ?4, completed_at = ?5, updated_at = ?5
             WHERE id = ?1 AND status IN ('QUEUED', 'PROCESSING')",
            params![id, video_url, asset_id, draft_id, now],
        )?;
        debug!(job_id = id, changed, "mark_completed");
        Ok(changed > 0)
    })
}

/// Non-terminal -> FAILED with an error message.
///
/// Returns `false` if the job was already terminal.
pub fn mark_failed(db: &Database, id: i64, error_message: &str) -> DbResult<bool> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE video_jobs SET status = 'FAILED', error_message = ?2, updated_at = ?3
             WHERE id = ?1 AND status IN ('QUEUED', 'PROCESSING')",
            params![id, error_message, fmt_ts(Utc::now())],
        )?;
        debug!(job_id = id, changed, "mark_failed");
        Ok(changed > 0)
    })
}
