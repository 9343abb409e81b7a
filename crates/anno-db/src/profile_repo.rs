//! User profile repository.

use rusqlite::{params, Row};

use anno_models::UserProfile;

use super::{fmt_ts, parse_ts, Database, DatabaseError, DbResult};

fn profile_from_row(row: &Row<'_>) -> Result<UserProfile, rusqlite::Error> {
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;
    Ok(UserProfile {
        id: row.get("id")?,
        email: row.get("email")?,
        auth_user_id: row.get("auth_user_id")?,
        display_name: row.get("display_name")?,
        role: row.get("role")?,
        created_at: parse_ts(&created_at)?,
        updated_at: parse_ts(&updated_at)?,
    })
}

/// Inserts a new profile row and returns its assigned ID.
pub fn insert(db: &Database, profile: &UserProfile) -> DbResult<i64> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO user_profiles (email, auth_user_id, display_name, role,
             created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                profile.email,
                profile.auth_user_id,
                profile.display_name,
                profile.role,
                fmt_ts(profile.created_at),
                fmt_ts(profile.updated_at),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

/// Finds a profile by its ID.
pub fn find_by_id(db: &Database, id: i64) -> DbResult<Option<UserProfile>> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM user_profiles WHERE id = ?1")?;
        let mut rows = stmt.query_map(params![id], profile_from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

/// Finds a profile by its external auth identifier.
pub fn find_by_auth_user_id(db: &Database, auth_user_id: &str) -> DbResult<Option<UserProfile>> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT * FROM user_profiles WHERE auth_user_id = ?1")?;
        let mut rows = stmt.query_map(params![auth_user_id], profile_from_row)?;
        match rows.next() {
            Some(Ok(row)) => Ok(Some(row)),
            Some(Err(e)) => Err(DatabaseError::Sqlite(e)),
            None => Ok(None),
        }
    })
}

#[cfg(test)]
pub mod tests_support {
    //! Helpers shared by repository tests.

    use super::*;
    use chrono::Utc;

    /// Inserts a minimal profile with an auth identity and returns its ID.
    pub fn insert_profile(db: &Database, email: &str) -> i64 {
        insert(
            db,
            &UserProfile {
                id: 0,
                email: email.into(),
                auth_user_id: Some(format!("auth-{email}")),
                display_name: "Test User".into(),
                role: "ROLE_USER".into(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        )
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_insert_and_lookup() {
        let db = Database::open_in_memory().unwrap();
        let id = insert(
            &db,
            &UserProfile {
                id: 0,
                email: "user@example.com".into(),
                auth_user_id: Some("firebase-uid-1".into()),
                display_name: "User".into(),
                role: "ROLE_USER".into(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        )
        .unwrap();

        let by_id = find_by_id(&db, id).unwrap().unwrap();
        assert_eq!(by_id.email, "user@example.com");

        let by_auth = find_by_auth_user_id(&db, "firebase-uid-1").unwrap().unwrap();
        assert_eq!(by_auth.id, id);

        assert!(find_by_auth_user_id(&db, "nope").unwrap().is_none());
    }

    #[test]
    fn test_email_unique() {
        let db = Database::open_in_memory().unwrap();
        tests_support::insert_profile(&db, "dup@example.com");

        let duplicate = insert(
            &db,
            &UserProfile {
                id: 0,
                email: "dup@example.com".into(),
                auth_user_id: None,
                display_name: "Dup".into(),
                role: "ROLE_USER".into(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        );
        assert!(duplicate.is_err());
    }
}
