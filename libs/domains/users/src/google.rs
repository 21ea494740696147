//! Google as the identity provider: authorization URL, code exchange with
//! PKCE, refresh and the OpenID userinfo endpoint.

use async_trait::async_trait;
use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, RefreshToken, Scope, TokenResponse, TokenUrl,
};

use crate::config::GoogleOAuthConfig;
use crate::error::{UserError, UserResult};
use crate::models::{GoogleProfile, GoogleTokens};

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";
const SCOPES: [&str; 3] = ["openid", "email", "profile"];

type GoogleClient =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Consent screen URL carrying `state` and the PKCE challenge of `verifier`
    fn authorize_url(&self, state: &str, verifier: &str) -> UserResult<String>;

    async fn exchange_code(&self, code: &str, verifier: &str) -> UserResult<GoogleTokens>;

    async fn refresh(&self, refresh_token: &str) -> UserResult<GoogleTokens>;

    async fn user_info(&self, access_token: &str) -> UserResult<GoogleProfile>;
}

/// Fresh `(state, verifier)` pair for a new login
pub fn new_login_secrets() -> (String, String) {
    let state = CsrfToken::new_random().secret().clone();
    let (_challenge, verifier) = PkceCodeChallenge::new_random_sha256();
    (state, verifier.secret().clone())
}

#[derive(Clone)]
pub struct GoogleOAuth {
    client: GoogleClient,
    http_client: reqwest::Client,
}

impl GoogleOAuth {
    pub fn new(config: &GoogleOAuthConfig) -> UserResult<Self> {
        let client = BasicClient::new(ClientId::new(config.client_id.clone()))
            .set_client_secret(ClientSecret::new(config.client_secret.clone()))
            .set_auth_uri(
                AuthUrl::new(AUTH_URL.to_string())
                    .map_err(|e| UserError::Internal(format!("Invalid auth URL: {}", e)))?,
            )
            .set_token_uri(
                TokenUrl::new(TOKEN_URL.to_string())
                    .map_err(|e| UserError::Internal(format!("Invalid token URL: {}", e)))?,
            )
            .set_redirect_uri(
                RedirectUrl::new(config.redirect_url.clone())
                    .map_err(|e| UserError::Internal(format!("Invalid redirect URL: {}", e)))?,
            );

        // The token endpoint must not be able to bounce us elsewhere
        let http_client = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| UserError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            http_client,
        })
    }
}

#[async_trait]
impl IdentityProvider for GoogleOAuth {
    fn authorize_url(&self, state: &str, verifier: &str) -> UserResult<String> {
        let verifier = PkceCodeVerifier::new(verifier.to_string());
        let challenge = PkceCodeChallenge::from_code_verifier_sha256(&verifier);
        let state = state.to_string();

        let (url, _) = SCOPES
            .iter()
            .fold(
                self.client.authorize_url(|| CsrfToken::new(state)),
                |request, scope| request.add_scope(Scope::new(scope.to_string())),
            )
            .add_extra_param("access_type", "offline")
            .add_extra_param("prompt", "consent")
            .set_pkce_challenge(challenge)
            .url();

        Ok(url.to_string())
    }

    async fn exchange_code(&self, code: &str, verifier: &str) -> UserResult<GoogleTokens> {
        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .set_pkce_verifier(PkceCodeVerifier::new(verifier.to_string()))
            .request_async(&self.http_client)
            .await
            .map_err(|e| UserError::OAuth(format!("Failed to exchange code: {}", e)))?;

        Ok(GoogleTokens {
            access_token: token.access_token().secret().clone(),
            refresh_token: token.refresh_token().map(|t| t.secret().clone()),
        })
    }

    async fn refresh(&self, refresh_token: &str) -> UserResult<GoogleTokens> {
        let token = self
            .client
            .exchange_refresh_token(&RefreshToken::new(refresh_token.to_string()))
            .request_async(&self.http_client)
            .await
            .map_err(|e| UserError::OAuth(format!("Failed to refresh token: {}", e)))?;

        Ok(GoogleTokens {
            access_token: token.access_token().secret().clone(),
            refresh_token: token.refresh_token().map(|t| t.secret().clone()),
        })
    }

    async fn user_info(&self, access_token: &str) -> UserResult<GoogleProfile> {
        let response = self
            .http_client
            .get(USERINFO_URL)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| UserError::OAuth(format!("Failed to get user info: {}", e)))?;

        if !response.status().is_success() {
            return Err(UserError::OAuth(format!(
                "Google userinfo returned {}",
                response.status()
            )));
        }

        response
            .json::<GoogleProfile>()
            .await
            .map_err(|e| UserError::OAuth(format!("Failed to parse user info: {}", e)))
    }
}
