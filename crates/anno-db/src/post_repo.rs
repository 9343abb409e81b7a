//! User post repository.
//!
//! Target platforms are stored as the same CSV encoding used on the job row
//! and rehydrated into a list on read.

use rusqlite::{params, Row};

use anno_models::{split_targets, UserPost};

use super::{fmt_ts, parse_ts, Database, DatabaseError, DbResult};

fn post_from_row(row: &Row<'_>) -> Result<UserPost, rusqlite::Error> {
    let created_at: String = row.get("created_at")?;
    let platforms: String = row.get("target_platforms")?;
    Ok(UserPost {
        id: row.get("id")?,
        profile_id: row.get("profile_id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        video_url: row.get("video_url")?,
        status: row.get("status")?,
        target_platforms: split_targets(&platforms),
        created_at: parse_ts(&created_at)?,
    })
}

/// Inserts a new post row and returns its assigned ID.
pub fn insert(db: &Database, post: &UserPost) -> DbResult<i64> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO user_posts (profile_id, title, content, video_url, status,
             target_platforms, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                post.profile_id,
                post.title,
                post.content,
                post.video_url,
                post.status,
                post.target_platforms.join(","),
                fmt_ts(post.created_at),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

/// Finds a post by its ID.
pub fn find_by_id(db: &Database, id: i64) -> DbResult<Option<UserPost>> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM user_posts WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id], post_from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

/// All posts belonging to a profile, newest first.
pub fn find_by_profile(db: &Database, profile_id: i64) -> DbResult<Vec<UserPost>> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT * FROM user_posts WHERE profile_id = ?1 ORDER BY created_at DESC, id DESC",
        )?;
        let posts = stmt
            .query_map(params![profile_id], post_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(posts)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platforms_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let profile = crate::profile_repo::tests_support::insert_profile(&db, "p@example.com");

        let id = insert(
            &db,
            &UserPost::new(
                profile,
                "Cat Bike",
                "clip",
                Some("https://cdn/x.mp4".into()),
                "published",
                vec!["instagram".into(), "tiktok".into()],
            ),
        )
        .unwrap();

        let post = find_by_id(&db, id).unwrap().unwrap();
        assert_eq!(post.target_platforms, vec!["instagram", "tiktok"]);
        assert_eq!(post.video_url.as_deref(), Some("https://cdn/x.mp4"));

        let listed = find_by_profile(&db, profile).unwrap();
        assert_eq!(listed.len(), 1);
    }
}
