//! User profile record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user of the system.
///
/// `auth_user_id` is the stable identifier issued by the external auth
/// provider. Completion of a generation job requires it to be present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_user_id: Option<String>,
    pub display_name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Whether this profile carries a usable external auth identifier.
    pub fn has_auth_identity(&self) -> bool {
        self.auth_user_id
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty())
    }
}
