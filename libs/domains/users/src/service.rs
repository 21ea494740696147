//! Google sign-in, session refresh and profile lookup.

use std::sync::Arc;

use axum_helpers::{AuditEvent, AuditOutcome, ClientInfo, SessionTokens};
use tracing::{info, instrument, warn};

use crate::config::GoogleOAuthConfig;
use crate::error::{UserError, UserResult};
use crate::google::{IdentityProvider, new_login_secrets};
use crate::models::{GoogleProfile, LoginRecord, NewUser, PendingLogin, User};
use crate::pending::PendingLoginStore;
use crate::repository::UserRepository;

/// `redirectTo` value sending admins to the CMS
pub const ADMIN_REDIRECT: &str = "admin";

/// Result of a completed Google callback
#[derive(Debug, Clone)]
pub struct LoginSuccess {
    pub user: User,
    pub session_token: String,
    /// Present when Google issued one; stored in its own cookie
    pub refresh_token: Option<String>,
    pub redirect_url: String,
}

pub struct AuthService<R: UserRepository> {
    users: Arc<R>,
    pending: Arc<dyn PendingLoginStore>,
    google: Arc<dyn IdentityProvider>,
    tokens: SessionTokens,
    config: GoogleOAuthConfig,
}

impl<R: UserRepository> Clone for AuthService<R> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            pending: Arc::clone(&self.pending),
            google: Arc::clone(&self.google),
            tokens: self.tokens.clone(),
            config: self.config.clone(),
        }
    }
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(
        users: R,
        pending: Arc<dyn PendingLoginStore>,
        google: Arc<dyn IdentityProvider>,
        tokens: SessionTokens,
        config: GoogleOAuthConfig,
    ) -> Self {
        Self {
            users: Arc::new(users),
            pending,
            google,
            tokens,
            config,
        }
    }

    pub fn tokens(&self) -> &SessionTokens {
        &self.tokens
    }

    pub fn frontend_url(&self) -> &str {
        &self.config.frontend_url
    }

    /// Remember the PKCE verifier under a fresh state and return Google's consent URL
    #[instrument(skip(self))]
    pub async fn start_login(&self, redirect_to: Option<String>) -> UserResult<String> {
        let (state, verifier) = new_login_secrets();
        let url = self.google.authorize_url(&state, &verifier)?;

        self.pending
            .put(
                &state,
                &PendingLogin {
                    verifier,
                    redirect_to,
                },
            )
            .await?;

        Ok(url)
    }

    /// Finish the authorization-code flow and open a session
    #[instrument(skip(self, code, state, client))]
    pub async fn complete_login(
        &self,
        code: &str,
        state: &str,
        client: &ClientInfo,
    ) -> UserResult<LoginSuccess> {
        let pending = self
            .pending
            .take(state)
            .await?
            .ok_or(UserError::InvalidLoginState)?;

        let google_tokens = self.google.exchange_code(code, &pending.verifier).await?;
        let profile = self.google.user_info(&google_tokens.access_token).await?;
        let (email, google_id) = identity(&profile)?;

        let login = LoginRecord {
            ip: client.ip.clone(),
            user_agent: client.user_agent.clone(),
        };

        let user = match self.users.find_by_email(&email).await? {
            Some(existing) if existing.is_deleted => {
                AuditEvent::new(Some(email.clone()), "auth.login", None, AuditOutcome::Denied)
                    .with_client(client)
                    .with_details(serde_json::json!({ "reason": "account deleted" }))
                    .log();
                return Err(UserError::Deleted(email));
            }
            Some(_) => self.users.record_login(&email, &login).await?,
            None => {
                info!(email = %email, "First sign-in, creating account");
                self.users
                    .create(NewUser {
                        email: email.clone(),
                        name: profile.name.clone().unwrap_or_default(),
                        picture: profile.picture.clone().unwrap_or_default(),
                        google_id,
                        login,
                    })
                    .await?
            }
        };

        let session_token = self.issue_session(&user.email)?;
        let redirect_url = self.redirect_after_login(pending.redirect_to.as_deref(), user.is_admin);

        AuditEvent::new(Some(user.email.clone()), "auth.login", None, AuditOutcome::Success)
            .with_client(client)
            .log();

        Ok(LoginSuccess {
            user,
            session_token,
            refresh_token: google_tokens.refresh_token,
            redirect_url,
        })
    }

    /// New session token from a Google refresh token
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh_session(&self, refresh_token: &str) -> UserResult<String> {
        let google_tokens = self.google.refresh(refresh_token).await?;
        let profile = self.google.user_info(&google_tokens.access_token).await?;
        let (email, _) = identity(&profile)?;

        match self.users.find_by_email(&email).await? {
            Some(user) if !user.is_deleted => self.issue_session(&user.email),
            _ => {
                warn!(email = %email, "Refresh for unknown or deleted account");
                Err(UserError::Unauthorized("Account not available".to_string()))
            }
        }
    }

    /// The signed-in user's stored account
    #[instrument(skip(self))]
    pub async fn profile(&self, email: &str) -> UserResult<User> {
        self.users
            .find_by_email(email)
            .await?
            .filter(|user| !user.is_deleted)
            .ok_or_else(|| UserError::Unauthorized("Account not available".to_string()))
    }

    fn issue_session(&self, email: &str) -> UserResult<String> {
        self.tokens
            .issue(email)
            .map_err(|e| UserError::Internal(format!("Failed to sign session token: {}", e)))
    }

    fn redirect_after_login(&self, redirect_to: Option<&str>, is_admin: bool) -> String {
        match (redirect_to, &self.config.cms_url) {
            (Some(ADMIN_REDIRECT), Some(cms_url)) if is_admin => cms_url.clone(),
            // Same-origin paths only; `//host` would leave the storefront
            (Some(path), _) if path.starts_with('/') && !path.starts_with("//") => {
                format!("{}{}", self.config.frontend_url, path)
            }
            _ => self.config.frontend_url.clone(),
        }
    }
}

/// Email and subject are both required to identify an account
fn identity(profile: &GoogleProfile) -> UserResult<(String, String)> {
    let email = profile
        .email
        .clone()
        .filter(|e| !e.is_empty())
        .ok_or_else(|| UserError::OAuth("Google profile has no email".to_string()))?;
    let sub = profile
        .sub
        .clone()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| UserError::OAuth("Google profile has no subject".to_string()))?;
    Ok((email, sub))
}
