use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info, instrument, warn};

use super::domain::{AuthSession, AuthUser, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::password::{self, PASSWORD_ALGORITHM};
use super::repository::AuthRepository;
use super::token::TokenIssuer;

/// Auth service configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub password_algorithm: String,
    /// Consecutive failures that trigger a lockout.
    pub max_failed_attempts: u32,
    pub lockout: Duration,
    /// Role granted on self-registration.
    pub default_role: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            password_algorithm: PASSWORD_ALGORITHM.into(),
            max_failed_attempts: 3,
            lockout: Duration::minutes(10),
            default_role: models::role::DEFAULT_ROLE.into(),
        }
    }
}

impl From<&configs::AuthConfig> for AuthConfig {
    fn from(cfg: &configs::AuthConfig) -> Self {
        Self {
            max_failed_attempts: cfg.max_failed_attempts,
            lockout: Duration::seconds(cfg.lockout_secs as i64),
            ..Self::default()
        }
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
    tokens: TokenIssuer,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig, tokens: TokenIssuer) -> Self { Self { repo, cfg, tokens } }

    /// Register a new user with a hashed password and the default role.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository, TokenIssuer};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let tokens = TokenIssuer::new("0123456789abcdef", "iss", "aud", 3600);
    /// let svc = AuthService::new(repo, AuthConfig::default(), tokens);
    /// let input = RegisterInput { user_name: "user1".into(), full_name: None, email: "user@example.com".into(), password: "Secret123!".into() };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "user@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email, user_name = %input.user_name))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        let email = input.email.trim();
        models::user::validate_email(email)?;
        models::user::validate_user_name(&input.user_name)?;
        if input.full_name.as_deref().is_some_and(|n| n.chars().count() > 100) {
            return Err(AuthError::Validation("full name cannot exceed 100 characters".into()));
        }
        password::check_policy(&input.password)?;

        if let Some(existing) = self.repo.find_user_by_email(email).await? {
            debug!("email taken: {}", existing.email);
            return Err(AuthError::Conflict(format!("Email '{email}' is already taken.")));
        }
        if self.repo.find_user_by_user_name(&input.user_name).await?.is_some() {
            return Err(AuthError::Conflict(format!("UserName '{}' is already taken.", input.user_name)));
        }

        let user = self.repo.create_user(&input.user_name, input.full_name.as_deref(), email).await?;
        let hash = password::hash_password(&input.password)?;
        let _cred = self.repo.upsert_password(&user.id, hash, self.cfg.password_algorithm.clone()).await?;
        self.repo.assign_role(&user.id, &self.cfg.default_role).await?;
        info!(user_id = %user.id, user_name = %user.user_name, "user_registered");
        Ok(user)
    }

    /// Authenticate a user, applying the lockout policy, and issue a token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository, TokenIssuer};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let tokens = TokenIssuer::new("0123456789abcdef", "iss", "aud", 3600);
    /// let svc = AuthService::new(repo.clone(), AuthConfig::default(), tokens.clone());
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { user_name: "u".into(), full_name: None, email: "u@e.com".into(), password: "Passw0rd!x".into() }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd!x".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert_eq!(tokens.verify(&session.token).unwrap().roles, vec!["User".to_string()]);
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self.repo
            .find_user_by_email(input.email.trim())
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let cred = self.repo
            .get_credentials(&user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let now = Utc::now();
        if let Some(until) = cred.lockout_end.filter(|_| cred.is_locked(now)) {
            warn!(user_id = %user.id, %until, "login refused: account locked");
            return Err(AuthError::Locked(until));
        }

        if !password::verify_password(&input.password, &cred.password_hash)? {
            let failed = self.repo.record_failed_login(&user.id).await?;
            if failed >= self.cfg.max_failed_attempts as i32 {
                let until = now + self.cfg.lockout;
                self.repo.record_login_attempt(&user.id, 0, Some(until)).await?;
                warn!(user_id = %user.id, %until, "account locked after repeated failures");
                return Err(AuthError::Locked(until));
            }
            info!(user_id = %user.id, failed, "login failed");
            return Err(AuthError::Unauthorized);
        }

        if cred.access_failed_count != 0 || cred.lockout_end.is_some() {
            self.repo.record_login_attempt(&user.id, 0, None).await?;
        }
        let roles = self.repo.roles_of(&user.id).await?;
        let (token, expires_at) = self.tokens.issue(&user, &roles)?;
        info!(user_id = %user.id, roles = roles.len(), "login succeeded");
        Ok(AuthSession { user, roles, token, expires_at })
    }
}
