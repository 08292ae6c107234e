use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, Method},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Serialize;
use tracing::{debug, warn};
use utoipa::ToSchema;

use common::types::Message;
use service::auth::{
    domain::{AuthSession, AuthUser, LoginInput, RegisterInput},
    repo::seaorm::SeaOrmAuthRepository,
    service::{AuthConfig, AuthService},
    Claims, TokenIssuer,
};

use crate::errors::ApiError;
use crate::extract::JsonBody;

pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub tokens: TokenIssuer,
    pub settings: AuthConfig,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
}

#[derive(Serialize, ToSchema)]
pub struct RegisterOutput {
    pub message: String,
    pub user: AuthUser,
}

#[utoipa::path(post, path = "/auth/register", tag = "auth", request_body = RegisterInput, responses((status = 200, description = "Registered", body = RegisterOutput), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict")))]
pub async fn register(State(state): State<ServerState>, JsonBody(input): JsonBody<RegisterInput>) -> Result<Json<RegisterOutput>, ApiError> {
    let txn = state.db.begin().await?;
    let user = {
        let repo = Arc::new(SeaOrmAuthRepository::new(&txn));
        let svc = AuthService::new(repo, state.auth.settings.clone(), state.auth.tokens.clone());
        svc.register(input).await?
    };
    txn.commit().await?;
    Ok(Json(RegisterOutput { message: "User registered successfully.".into(), user }))
}

#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = LoginInput, responses((status = 200, description = "Logged In", body = AuthSession), (status = 401, description = "Unauthorized or locked")))]
pub async fn login(State(state): State<ServerState>, jar: CookieJar, JsonBody(input): JsonBody<LoginInput>) -> Result<(CookieJar, Json<AuthSession>), ApiError> {
    let repo = Arc::new(SeaOrmAuthRepository::new(&state.db));
    let svc = AuthService::new(repo, state.auth.settings.clone(), state.auth.tokens.clone());
    let session = svc.login(input).await?;

    let mut cookie = Cookie::new(AUTH_COOKIE, session.token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    Ok((jar.add(cookie), Json(session)))
}

#[utoipa::path(post, path = "/auth/logout", tag = "auth", responses((status = 200, description = "Logged out", body = crate::openapi::MessageResponse)), security(("bearer" = [])))]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<Message>) {
    // emitted even when the request carried no cookie
    let mut cookie = Cookie::new(AUTH_COOKIE, "");
    cookie.set_path("/");
    cookie.make_removal();
    (jar.add(cookie), Json(Message::new("User logged out successfully.")))
}

#[utoipa::path(get, path = "/auth/me", tag = "auth", responses((status = 200, description = "Current token claims", body = Claims), (status = 401, description = "Unauthorized")), security(("bearer" = [])))]
pub async fn me(Extension(claims): Extension<Claims>) -> Json<Claims> {
    Json(claims)
}

fn is_public(path: &str, method: &Method) -> bool {
    path == "/health"
        || path == "/auth/login"
        || path == "/auth/register"
        || path.starts_with("/api-docs")
        || method == Method::OPTIONS
}

/// Global middleware: every route except the public ones needs a valid
/// `Authorization: Bearer <token>`, falling back to the `auth_token` cookie.
/// Verified claims are stored in the request extensions.
pub async fn require_bearer_token_state(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = req.uri().path().to_string();
    if is_public(&path, req.method()) {
        return Ok(next.run(req).await);
    }

    let token = match req.headers().get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(h) => match h.strip_prefix("Bearer ") {
            Some(t) => t.trim().to_string(),
            None => {
                warn!(path = %path, "invalid Authorization format (expect Bearer)");
                return Err(ApiError::Unauthorized("Authorization header must use the Bearer scheme.".into()));
            }
        },
        None => match CookieJar::from_headers(req.headers()).get(AUTH_COOKIE) {
            Some(c) if !c.value().is_empty() => c.value().to_string(),
            _ => {
                debug!(path = %path, "missing Authorization header and auth_token cookie");
                return Err(ApiError::Unauthorized("Authentication required.".into()));
            }
        },
    };

    match state.auth.tokens.verify(&token) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            Ok(next.run(req).await)
        }
        Err(e) => {
            warn!(path = %path, err = %e, "token validation failed");
            Err(ApiError::from(e))
        }
    }
}

/// Route layer for administrator-only endpoints; runs after the bearer check.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .ok_or_else(|| ApiError::Unauthorized("Authentication required.".into()))?;
    if !claims.has_role(models::role::ADMIN_ROLE) {
        warn!(user_id = %claims.sub, path = %req.uri().path(), "admin role required");
        return Err(ApiError::Forbidden("Admin role required.".into()));
    }
    Ok(next.run(req).await)
}
