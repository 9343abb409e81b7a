//! HTTP-level tests driving the router with `tower::ServiceExt`.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use tower::ServiceExt;

use anno_api::auth::Claims;
use anno_api::{create_router, ApiConfig, AppState};
use anno_db::{profile_repo, Database};
use anno_models::UserProfile;
use anno_pipeline::{JobEventBus, JobService};
use anno_provider::{
    ProviderKind, ProviderRegistry, ProviderResult, RegistryConfig, VideoProvider,
};

const TEST_SECRET: &str = "test-secret";

struct StubProvider;

#[async_trait]
impl VideoProvider for StubProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Blotato
    }

    async fn request_creation(
        &self,
        _prompt: &str,
        _style: Option<&str>,
    ) -> ProviderResult<String> {
        Ok("creation-1".to_string())
    }

    async fn fetch_result(&self, _creation_id: &str) -> ProviderResult<Option<String>> {
        Ok(None)
    }

    async fn generate_blocking(
        &self,
        _prompt: &str,
        _style: Option<&str>,
    ) -> ProviderResult<String> {
        Ok("https://cdn.example.com/v.mp4".to_string())
    }
}

fn insert_profile(db: &Database, email: &str, auth_user_id: &str) -> i64 {
    profile_repo::insert(
        db,
        &UserProfile {
            id: 0,
            email: email.into(),
            auth_user_id: Some(auth_user_id.into()),
            display_name: "Test User".into(),
            role: "ROLE_USER".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        },
    )
    .unwrap()
}

fn test_state() -> (AppState, i64) {
    let db = Database::open_in_memory().unwrap();
    let owner_id = insert_profile(&db, "owner@example.com", "auth-owner");

    let registry = Arc::new(
        ProviderRegistry::new(
            vec![Arc::new(StubProvider) as Arc<dyn VideoProvider>],
            RegistryConfig::default(),
        )
        .unwrap(),
    );
    let events = Arc::new(JobEventBus::new(Vec::new()));
    let service = Arc::new(JobService::new(db.clone(), registry.clone(), events));

    let config = ApiConfig {
        jwt_secret: TEST_SECRET.to_string(),
        ..ApiConfig::default()
    };

    (
        AppState {
            config,
            db,
            service,
            registry,
        },
        owner_id,
    )
}

fn bearer_token(auth_user_id: &str) -> String {
    let claims = Claims {
        sub: auth_user_id.into(),
        email: None,
        exp: Utc::now().timestamp() + 3600,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap()
}

fn generate_request(token: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/videos/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(
            serde_json::json!({
                "prompt": "a cat riding a bike",
                "title": "Cat Bike",
                "description": "A short clip",
                "targets": "instagram,tiktok",
            })
            .to_string(),
        ))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let (state, _) = test_state();
    let app = create_router(state, None);

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_generate_requires_auth() {
    let (state, _) = test_state();
    let app = create_router(state, None);

    let request = Request::builder()
        .method("POST")
        .uri("/api/videos/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_generate_accepts_and_reports_status() {
    let (state, _) = test_state();
    let app = create_router(state, None);
    let token = bearer_token("auth-owner");

    let response = app
        .clone()
        .oneshot(generate_request(&token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let job = body_json(response).await;
    assert_eq!(job["status"], "PROCESSING");
    let job_id = job["jobId"].as_i64().unwrap();

    let response = app
        .oneshot(
            Request::get(format!("/api/videos/jobs/{job_id}"))
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let status = body_json(response).await;
    assert_eq!(status["jobId"], job_id);
    assert_eq!(status["status"], "PROCESSING");
    assert!(status.get("videoUrl").is_none());
}

#[tokio::test]
async fn test_blank_prompt_rejected() {
    let (state, _) = test_state();
    let app = create_router(state, None);
    let token = bearer_token("auth-owner");

    let request = Request::builder()
        .method("POST")
        .uri("/api/videos/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(
            serde_json::json!({
                "prompt": "",
                "title": "Cat Bike",
                "targets": "tiktok",
            })
            .to_string(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_job_of_other_user_is_forbidden() {
    let (state, _) = test_state();
    insert_profile(&state.db, "other@example.com", "auth-other");
    let app = create_router(state, None);

    let response = app
        .clone()
        .oneshot(generate_request(&bearer_token("auth-owner")))
        .await
        .unwrap();
    let job_id = body_json(response).await["jobId"].as_i64().unwrap();

    let response = app
        .oneshot(
            Request::get(format!("/api/videos/jobs/{job_id}"))
                .header(
                    header::AUTHORIZATION,
                    format!("Bearer {}", bearer_token("auth-other")),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_missing_job_is_not_found() {
    let (state, _) = test_state();
    let app = create_router(state, None);

    let response = app
        .oneshot(
            Request::get("/api/videos/jobs/9999")
                .header(
                    header::AUTHORIZATION,
                    format!("Bearer {}", bearer_token("auth-owner")),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_jobs_for_owner_only() {
    let (state, _) = test_state();
    insert_profile(&state.db, "other@example.com", "auth-other");
    let app = create_router(state, None);

    app.clone()
        .oneshot(generate_request(&bearer_token("auth-owner")))
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::get("/api/videos/jobs")
                .header(
                    header::AUTHORIZATION,
                    format!("Bearer {}", bearer_token("auth-other")),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let jobs = body_json(response).await;
    assert_eq!(jobs.as_array().unwrap().len(), 0);
}
