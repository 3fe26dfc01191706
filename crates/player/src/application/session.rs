//! Login session held by the client.

use std::fmt;

use chrono::{DateTime, Utc};
use lifesys_shared::{TokenResponse, UserResponse};

/// Bearer token plus who it belongs to. Created by a successful login and
/// dropped on logout.
#[derive(Clone, PartialEq)]
pub struct Session {
    token: String,
    expires_at: DateTime<Utc>,
    user: UserResponse,
}

impl Session {
    pub fn new(token: impl Into<String>, expires_at: DateTime<Utc>, user: UserResponse) -> Self {
        Self {
            token: token.into(),
            expires_at,
            user,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn user(&self) -> &UserResponse {
        &self.user
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

impl From<TokenResponse> for Session {
    fn from(response: TokenResponse) -> Self {
        Self::new(response.access_token, response.expires_at, response.user)
    }
}

// Keeps the token out of logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user.email)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}
