#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use driverflow_api::auth::jwt::{generate_access_token, JwtConfig};
use driverflow_api::auth::password::hash_password;
use driverflow_api::config::ServerConfig;
use driverflow_api::router::build_app_router;
use driverflow_api::state::AppState;
use driverflow_api::storage::LocalBlobStore;
use driverflow_core::types::DbId;
use driverflow_core::workflow::WorkflowEngine;
use driverflow_db::directory::PgRecipientDirectory;
use driverflow_db::models::user::CreateUser;
use driverflow_db::repositories::UserRepo;
use driverflow_db::store::PgWorkflowStore;
use driverflow_events::{EmailNotifier, Mailer};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(upload_dir: &std::path::Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        upload_dir: upload_dir.to_path_buf(),
        max_upload_bytes: 1024 * 1024,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// The application under test plus the upload directory it writes to.
pub struct TestApp {
    pub router: Router,
    pub config: ServerConfig,
    pub uploads: TempDir,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Mint a bearer token without going through `/auth/login`.
    pub fn token_for(&self, user_id: DbId, role: &str) -> String {
        generate_access_token(user_id, role, &self.config.jwt).unwrap()
    }
}

/// Build the full application router the way `main.rs` does, with email
/// delivery disabled.
pub fn build_test_app(pool: PgPool) -> TestApp {
    build_test_app_with_mailer(pool, None)
}

/// Same as [`build_test_app`] but delivering notifications through `mailer`.
pub fn build_test_app_with_mailer(pool: PgPool, mailer: Option<Arc<dyn Mailer>>) -> TestApp {
    let uploads = tempfile::tempdir().unwrap();
    let config = test_config(uploads.path());

    let notifier = EmailNotifier::new(Arc::new(PgRecipientDirectory::new(pool.clone())), mailer);
    let engine = WorkflowEngine::new(
        Arc::new(PgWorkflowStore::new(pool.clone())),
        Arc::new(notifier),
    );

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        engine: Arc::new(engine),
        blobs: Arc::new(LocalBlobStore::new(uploads.path())),
    };

    TestApp {
        router: build_app_router(state, &config),
        config,
        uploads,
    }
}

/// Insert a staff account with [`TEST_PASSWORD`] and return its id.
pub async fn seed_user(pool: &PgPool, username: &str, role: &str) -> DbId {
    let hashed = hash_password(TEST_PASSWORD).unwrap();
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            password_hash: hashed,
            role: role.to_string(),
            name: username.to_string(),
            designation: None,
            branch_city: None,
            email: Some(format!("{username}@test.com")),
        },
    )
    .await
    .unwrap()
    .id
}

/// Seed a user and return a bearer token for it.
pub async fn staff_token(test: &TestApp, pool: &PgPool, username: &str, role: &str) -> String {
    let id = seed_user(pool, username, role).await;
    test.token_for(id, role)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::get(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::POST, uri, None, body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, json_request(Method::POST, uri, Some(token), body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, json_request(Method::PUT, uri, Some(token), body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::delete(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

pub const BOUNDARY: &str = "driverflow-test-boundary";

/// One multipart part: a text field or a file.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        bytes: &'a [u8],
    },
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File {
                name,
                file_name,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn post_multipart(
    app: Router,
    uri: &str,
    parts: &[Part<'_>],
    token: Option<&str>,
) -> Response {
    let mut builder = Request::post(uri).header(
        "content-type",
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    send(app, builder.body(Body::from(multipart_body(parts))).unwrap()).await
}

/// Register a driver through the public form and return its id.
pub async fn register_driver(app: Router, name: &str, iqama: &str) -> DbId {
    let response = post_multipart(
        app,
        "/api/v1/public/register",
        &[
            Part::Text("full_name", name),
            Part::Text("iqama_number", iqama),
            Part::Text("saudi_driving_license", "on"),
            Part::Text("city", "Riyadh"),
            Part::Text("mobile_number", "0551234567"),
        ],
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}
