use core_config::{ConfigError, Environment, FromEnv, env_parse, env_required};

const MIN_SECRET_LEN: usize = 32;

/// Session signing configuration.
///
/// - `JWT_SECRET` (required, at least 32 characters)
/// - `SESSION_TTL_SECS` (default 86400)
///
/// Cookies are marked `Secure` when `APP_ENV=production`.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub secret: String,
    pub ttl_secs: i64,
    pub secure_cookies: bool,
}

impl SessionConfig {
    pub fn new(
        secret: impl Into<String>,
        ttl_secs: i64,
        secure_cookies: bool,
    ) -> Result<Self, ConfigError> {
        let secret = secret.into();
        validate_secret(&secret)?;

        if ttl_secs <= 0 {
            return Err(ConfigError::ParseError {
                key: "SESSION_TTL_SECS".to_string(),
                details: "must be positive".to_string(),
            });
        }

        Ok(Self {
            secret,
            ttl_secs,
            secure_cookies,
        })
    }
}

fn validate_secret(secret: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_SECRET_LEN {
        return Err(ConfigError::ParseError {
            key: "JWT_SECRET".to_string(),
            details: format!(
                "must be at least {} characters (got {}). Generate one with: openssl rand -base64 32",
                MIN_SECRET_LEN,
                secret.len()
            ),
        });
    }
    Ok(())
}

impl FromEnv for SessionConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = env_required("JWT_SECRET")?;
        let ttl_secs = env_parse("SESSION_TTL_SECS", "86400")?;
        Self::new(secret, ttl_secs, Environment::from_env().use_https())
    }
}
