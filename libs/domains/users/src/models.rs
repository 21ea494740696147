use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A shop account, keyed by its Google email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub email: String,
    pub name: String,
    pub picture: String,
    pub google_id: String,
    /// Granted out of band, never through the API
    pub is_admin: bool,
    pub is_deleted: bool,
    pub last_login: DateTime<Utc>,
    pub last_ip: Option<String>,
    pub last_user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// First sign-in of a Google account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub picture: String,
    pub google_id: String,
    pub login: LoginRecord,
}

/// Where a sign-in came from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginRecord {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// Google's OpenID userinfo document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleProfile {
    pub sub: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// Tokens returned by Google's token endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// `{verifier, redirectTo}` kept between `/login` and `/callback`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingLogin {
    pub verifier: String,
    pub redirect_to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub email: String,
    pub name: String,
    pub picture: String,
    pub is_admin: bool,
    pub last_login: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            name: user.name,
            picture: user.picture,
            is_admin: user.is_admin,
            last_login: user.last_login,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RefreshResponse {
    pub status: String,
}

impl RefreshResponse {
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
        }
    }
}
