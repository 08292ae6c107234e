use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::domain::{AuthUser, Credentials};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn find_user_by_user_name(&self, user_name: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn create_user(&self, user_name: &str, full_name: Option<&str>, email: &str) -> Result<AuthUser, AuthError>;

    async fn get_credentials(&self, user_id: &str) -> Result<Option<Credentials>, AuthError>;
    async fn upsert_password(&self, user_id: &str, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError>;
    /// Count one more failed login in the store and return the new total.
    async fn record_failed_login(&self, user_id: &str) -> Result<i32, AuthError>;
    /// Persist failure count and lockout after a login attempt.
    async fn record_login_attempt(&self, user_id: &str, access_failed_count: i32, lockout_end: Option<DateTime<Utc>>) -> Result<(), AuthError>;

    async fn roles_of(&self, user_id: &str) -> Result<Vec<String>, AuthError>;
    /// Attach a role, creating it when it does not exist yet.
    async fn assign_role(&self, user_id: &str, role: &str) -> Result<(), AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::{BTreeSet, HashMap};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<HashMap<String, AuthUser>>,             // key: email
        creds: Mutex<HashMap<String, Credentials>>,          // key: user_id
        roles: Mutex<HashMap<String, BTreeSet<String>>>,     // key: user_id
    }

    fn poisoned<T>(_: T) -> AuthError { AuthError::Repository("mock lock poisoned".into()) }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().map_err(poisoned)?;
            Ok(users.get(email).cloned())
        }

        async fn find_user_by_user_name(&self, user_name: &str) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().map_err(poisoned)?;
            Ok(users.values().find(|u| u.user_name == user_name).cloned())
        }

        async fn create_user(&self, user_name: &str, full_name: Option<&str>, email: &str) -> Result<AuthUser, AuthError> {
            let mut users = self.users.lock().map_err(poisoned)?;
            if users.contains_key(email) || users.values().any(|u| u.user_name == user_name) {
                return Err(AuthError::Conflict("user already exists".into()));
            }
            let user = AuthUser {
                id: uuid::Uuid::new_v4().to_string(),
                user_name: user_name.to_string(),
                full_name: full_name.map(str::to_string),
                email: email.to_string(),
            };
            users.insert(email.to_string(), user.clone());
            Ok(user)
        }

        async fn get_credentials(&self, user_id: &str) -> Result<Option<Credentials>, AuthError> {
            let creds = self.creds.lock().map_err(poisoned)?;
            Ok(creds.get(user_id).cloned())
        }

        async fn upsert_password(&self, user_id: &str, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError> {
            let mut creds = self.creds.lock().map_err(poisoned)?;
            let c = Credentials {
                user_id: user_id.to_string(),
                password_hash,
                password_algorithm,
                access_failed_count: 0,
                lockout_end: None,
            };
            creds.insert(user_id.to_string(), c.clone());
            Ok(c)
        }

        async fn record_failed_login(&self, user_id: &str) -> Result<i32, AuthError> {
            let mut creds = self.creds.lock().map_err(poisoned)?;
            let c = creds.get_mut(user_id).ok_or(AuthError::NotFound)?;
            c.access_failed_count += 1;
            Ok(c.access_failed_count)
        }

        async fn record_login_attempt(&self, user_id: &str, access_failed_count: i32, lockout_end: Option<DateTime<Utc>>) -> Result<(), AuthError> {
            let mut creds = self.creds.lock().map_err(poisoned)?;
            let c = creds.get_mut(user_id).ok_or(AuthError::NotFound)?;
            c.access_failed_count = access_failed_count;
            c.lockout_end = lockout_end;
            Ok(())
        }

        async fn roles_of(&self, user_id: &str) -> Result<Vec<String>, AuthError> {
            let roles = self.roles.lock().map_err(poisoned)?;
            Ok(roles.get(user_id).map(|s| s.iter().cloned().collect()).unwrap_or_default())
        }

        async fn assign_role(&self, user_id: &str, role: &str) -> Result<(), AuthError> {
            let mut roles = self.roles.lock().map_err(poisoned)?;
            roles.entry(user_id.to_string()).or_default().insert(role.to_string());
            Ok(())
        }
    }
}
