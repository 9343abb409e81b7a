//! Bearer token authentication.
//!
//! Tokens are HS256 JWTs signed with the shared `JWT_SECRET`. The `sub`
//! claim carries the external auth identifier, which must map onto a stored
//! user profile.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use anno_db::profile_repo;

use crate::error::ApiError;
use crate::state::AppState;

/// Decoded token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// External auth user ID
    pub sub: String,
    /// Email (if available)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Expiration (unix seconds)
    pub exp: i64,
}

/// Authenticated user resolved to a stored profile.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub profile_id: i64,
    pub auth_user_id: String,
    pub email: String,
}

/// Validate a bearer token against the shared secret.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, ApiError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| ApiError::unauthorized(format!("Token validation failed: {e}")))
}

/// Axum extractor for authenticated requests.
#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("Invalid Authorization header format"))?;

        let claims = verify_token(&state.config.jwt_secret, token)?;

        let profile = profile_repo::find_by_auth_user_id(&state.db, &claims.sub)?
            .ok_or_else(|| ApiError::unauthorized("No profile for this identity"))?;

        Ok(AuthUser {
            profile_id: profile.id,
            auth_user_id: claims.sub,
            email: profile.email,
        })
    }
}
