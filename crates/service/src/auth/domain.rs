use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Registration input
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub user_name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub email: String,
    pub password: String,
}

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Domain user (business view)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: String,
    pub user_name: String,
    pub full_name: Option<String>,
    pub email: String,
}

/// Domain credentials (hashed) with lockout bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub user_id: String,
    pub password_hash: String,
    pub password_algorithm: String,
    pub access_failed_count: i32,
    pub lockout_end: Option<DateTime<Utc>>,
}

impl Credentials {
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        matches!(self.lockout_end, Some(end) if end > now)
    }
}

/// Login result (session)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub user: AuthUser,
    pub roles: Vec<String>,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
