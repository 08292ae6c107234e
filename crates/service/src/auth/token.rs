use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::domain::AuthUser;
use super::errors::AuthError;

/// JWT payload carried by every bearer token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User id.
    pub sub: String,
    /// User name.
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Signs and verifies HS256 tokens for one issuer/audience pair.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, issuer: &str, audience: &str, ttl_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.to_string(),
            audience: audience.to_string(),
            ttl: Duration::seconds(ttl_secs as i64),
        }
    }

    pub fn from_config(cfg: &configs::AuthConfig) -> Self {
        Self::new(&cfg.jwt_secret, &cfg.issuer, &cfg.audience, cfg.token_ttl_secs)
    }

    pub fn issue(&self, user: &AuthUser, roles: &[String]) -> Result<(String, DateTime<Utc>), AuthError> {
        self.issue_at(user, roles, Utc::now())
    }

    /// Issue a token as if it were `now`.
    pub fn issue_at(&self, user: &AuthUser, roles: &[String], now: DateTime<Utc>) -> Result<(String, DateTime<Utc>), AuthError> {
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: user.id.clone(),
            name: user.user_name.clone(),
            email: user.email.clone(),
            roles: roles.to_vec(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenError(e.to_string()))?;
        Ok((token, expires_at))
    }

    /// Check signature, issuer, audience and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_audience(&[self.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.leeway = 0;
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn user() -> AuthUser {
        AuthUser { id: "u-1".into(), user_name: "jdoe".into(), full_name: None, email: "j@d.com".into() }
    }

    #[test]
    fn issued_token_round_trips_claims() {
        let issuer = TokenIssuer::new(SECRET, "poseidon-api", "poseidon-clients", 3600);
        let now = Utc::now();
        let (token, expires_at) = issuer.issue_at(&user(), &["Admin".into()], now).unwrap();
        assert_eq!(expires_at.timestamp() - now.timestamp(), 3600);

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.sub, "u-1");
        assert_eq!(claims.name, "jdoe");
        assert_eq!(claims.email, "j@d.com");
        assert!(claims.has_role("Admin"));
        assert!(!claims.has_role("admin"));
    }

    #[test]
    fn rejects_other_audience_secret_and_expired() {
        let issuer = TokenIssuer::new(SECRET, "poseidon-api", "poseidon-clients", 3600);
        let (token, _) = issuer.issue(&user(), &[]).unwrap();

        let other_aud = TokenIssuer::new(SECRET, "poseidon-api", "someone-else", 3600);
        assert!(matches!(other_aud.verify(&token), Err(AuthError::TokenError(_))));

        let other_secret = TokenIssuer::new("ffffffffffffffffffffffffffffffff", "poseidon-api", "poseidon-clients", 3600);
        assert!(other_secret.verify(&token).is_err());

        let (old, _) = issuer.issue_at(&user(), &[], Utc::now() - Duration::hours(2)).unwrap();
        assert!(issuer.verify(&old).is_err());

        assert!(issuer.verify("not-a-jwt").is_err());
    }
}
