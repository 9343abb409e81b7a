//! Asset repository — media records with their storage URLs.

use rusqlite::{params, Row};

use anno_models::Asset;

use super::{fmt_ts, parse_ts, Database, DatabaseError, DbResult};

fn asset_from_row(row: &Row<'_>) -> Result<Asset, rusqlite::Error> {
    let created_at: String = row.get("created_at")?;
    Ok(Asset {
        id: row.get("id")?,
        owner_id: row.get("owner_id")?,
        kind: row.get("kind")?,
        source: row.get("source")?,
        blob_url: row.get("blob_url")?,
        created_at: parse_ts(&created_at)?,
    })
}

/// Inserts a new asset row and returns its assigned ID.
pub fn insert(db: &Database, asset: &Asset) -> DbResult<i64> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO assets (owner_id, kind, source, blob_url, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                asset.owner_id,
                asset.kind,
                asset.source,
                asset.blob_url,
                fmt_ts(asset.created_at),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

/// Finds an asset by its ID.
pub fn find_by_id(db: &Database, id: i64) -> DbResult<Option<Asset>> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM assets WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id], asset_from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

/// Number of assets owned by a profile.
pub fn count_by_owner(db: &Database, owner_id: i64) -> DbResult<u64> {
    db.with_conn(|conn| {
        let count: u64 = conn.query_row(
            "SELECT COUNT(*) FROM assets WHERE owner_id = ?1",
            params![owner_id],
            |r| r.get(0),
        )?;
        Ok(count)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_find() {
        let db = Database::open_in_memory().unwrap();
        let owner = crate::profile_repo::tests_support::insert_profile(&db, "a@example.com");

        let id = insert(&db, &Asset::new(owner, "video", "generated.mp4", "https://cdn/x.mp4"))
            .unwrap();
        let asset = find_by_id(&db, id).unwrap().unwrap();
        assert_eq!(asset.kind, "video");
        assert_eq!(asset.blob_url, "https://cdn/x.mp4");
        assert_eq!(count_by_owner(&db, owner).unwrap(), 1);
    }
}
