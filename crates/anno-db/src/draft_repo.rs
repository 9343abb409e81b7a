//! Post draft repository.

use rusqlite::{params, Row};

use anno_models::PostDraft;

use super::{fmt_ts, parse_ts, Database, DatabaseError, DbResult};

fn draft_from_row(row: &Row<'_>) -> Result<PostDraft, rusqlite::Error> {
    let created_at: String = row.get("created_at")?;
    Ok(PostDraft {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        asset_id: row.get("asset_id")?,
        targets: row.get("targets")?,
        status: row.get("status")?,
        created_at: parse_ts(&created_at)?,
    })
}

/// Inserts a new draft row and returns its assigned ID.
pub fn insert(db: &Database, draft: &PostDraft) -> DbResult<i64> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO post_drafts (title, description, asset_id, targets, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                draft.title,
                draft.description,
                draft.asset_id,
                draft.targets,
                draft.status,
                fmt_ts(draft.created_at),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

/// Finds a draft by its ID.
pub fn find_by_id(db: &Database, id: i64) -> DbResult<Option<PostDraft>> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM post_drafts WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id], draft_from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}
