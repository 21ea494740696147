use super::config::SessionConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "jwt";
pub const REFRESH_COOKIE: &str = "refreshToken";
/// Lifetime of the identity provider refresh token cookie (7 days)
pub const REFRESH_TOKEN_TTL: i64 = 604800;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub email: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

/// Issues and verifies HS512 session tokens.
#[derive(Clone)]
pub struct SessionTokens {
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    ttl_secs: i64,
    secure_cookies: bool,
}

impl SessionTokens {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            encoding_key: Arc::new(EncodingKey::from_secret(config.secret.as_bytes())),
            decoding_key: Arc::new(DecodingKey::from_secret(config.secret.as_bytes())),
            ttl_secs: config.ttl_secs,
            secure_cookies: config.secure_cookies,
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    pub fn secure_cookies(&self) -> bool {
        self.secure_cookies
    }

    pub fn issue(&self, email: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = SessionClaims {
            email: email.to_string(),
            exp: (now + Duration::seconds(self.ttl_secs)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS512), &claims, &self.encoding_key)
    }

    /// Rejects bad signatures, other algorithms and expired tokens.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.leeway = 0;
        decode::<SessionClaims>(token, &self.decoding_key, &validation).map(|data| data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(ttl_secs: i64) -> SessionTokens {
        let config =
            SessionConfig::new("this-is-a-valid-secret-with-32-chars!", ttl_secs, false).unwrap();
        SessionTokens::new(&config)
    }

    #[test]
    fn test_issue_then_verify() {
        let tokens = tokens(3600);
        let token = tokens.issue("buyer@example.com").unwrap();
        let claims = tokens.verify(&token).unwrap();

        assert_eq!(claims.email, "buyer@example.com");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_token_uses_hs512() {
        let token = tokens(60).issue("a@example.com").unwrap();
        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::HS512);
    }

    #[test]
    fn test_verify_rejects_other_secret() {
        let token = tokens(60).issue("a@example.com").unwrap();
        let other = SessionTokens::new(
            &SessionConfig::new("another-secret-that-is-32-chars-long!!", 60, false).unwrap(),
        );
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let tokens = tokens(60);
        let claims = SessionClaims {
            email: "a@example.com".to_string(),
            exp: Utc::now().timestamp() - 10,
            iat: Utc::now().timestamp() - 70,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(&Header::new(Algorithm::HS512), &claims, &tokens.encoding_key).unwrap();
        assert!(tokens.verify(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert!(tokens(60).verify("not.a.token").is_err());
    }
}
