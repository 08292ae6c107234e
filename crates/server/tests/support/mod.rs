#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use sea_orm::DatabaseConnection;
use service::user::UserRepository;

pub const PASSWORD: &str = "S3cure!Pass";

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
}

/// Fresh app over a migrated in-memory SQLite database.
pub async fn spawn_app() -> anyhow::Result<TestApp> {
    let db = models::db::connect_memory().await?;
    let mut cfg = configs::AppConfig::default();
    cfg.auth.jwt_secret = "integration-test-secret-0123456789".into();
    let state = server::startup::build_state(db.clone(), &cfg);
    Ok(TestApp { router: server::startup::app(state), db })
}

impl TestApp {
    pub async fn call(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> anyhow::Result<Response> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
        }
        let req = match body {
            Some(v) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&v)?))?,
            None => builder.body(Body::empty())?,
        };
        Ok(self.router.clone().oneshot(req).await?)
    }

    pub async fn call_json(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
        let resp = self.call(method, uri, token, body).await?;
        let status = resp.status();
        Ok((status, body_json(resp).await?))
    }

    /// Register through the API and return the new user's id.
    pub async fn register(&self, user_name: &str, email: &str) -> anyhow::Result<String> {
        let (status, body) = self
            .call_json(
                Method::POST,
                "/auth/register",
                None,
                Some(json!({"userName": user_name, "fullName": "Test User", "email": email, "password": PASSWORD})),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "register failed: {status} {body}");
        Ok(body["user"]["id"].as_str().unwrap_or_default().to_string())
    }

    pub async fn login(&self, email: &str, password: &str) -> anyhow::Result<(StatusCode, Value)> {
        self.call_json(Method::POST, "/auth/login", None, Some(json!({"email": email, "password": password})))
            .await
    }

    pub async fn token_for(&self, email: &str) -> anyhow::Result<String> {
        let (status, body) = self.login(email, PASSWORD).await?;
        anyhow::ensure!(status == StatusCode::OK, "login failed: {status} {body}");
        Ok(body["token"].as_str().unwrap_or_default().to_string())
    }

    /// Token for a plain registered user.
    pub async fn user_token(&self) -> anyhow::Result<String> {
        self.register("reader", "reader@example.com").await?;
        self.token_for("reader@example.com").await
    }

    /// Token for a registered user granted `Admin` directly in the store.
    pub async fn admin_token(&self) -> anyhow::Result<String> {
        let id = self.register("admin", "admin@example.com").await?;
        UserRepository::create_role(&self.db, models::role::ADMIN_ROLE).await?;
        UserRepository::add_roles(&self.db, &id, &[models::role::ADMIN_ROLE.to_string()]).await?;
        self.token_for("admin@example.com").await
    }
}

pub async fn body_json(resp: Response) -> anyhow::Result<Value> {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await?;
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(&bytes)?)
}
