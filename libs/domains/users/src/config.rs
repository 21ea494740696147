use core_config::{ConfigError, FromEnv, env_optional, env_required};

/// Google sign-in and post-login redirects.
///
/// - `GOOGLE_CLIENT_ID`, `GOOGLE_CLIENT_SECRET`, `GOOGLE_REDIRECT_URL` (required)
/// - `FRONTEND_URL` (required): storefront, target of login and logout redirects
/// - `CMS_URL` (optional): admin UI, target for admins logging in with `redirectTo=admin`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    pub frontend_url: String,
    pub cms_url: Option<String>,
}

impl FromEnv for GoogleOAuthConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            client_id: env_required("GOOGLE_CLIENT_ID")?,
            client_secret: env_required("GOOGLE_CLIENT_SECRET")?,
            redirect_url: env_required("GOOGLE_REDIRECT_URL")?,
            frontend_url: env_required("FRONTEND_URL")?
                .trim_end_matches('/')
                .to_string(),
            cms_url: env_optional("CMS_URL"),
        })
    }
}
