//! Authentication status consulted before protected operations
//!
//! The identity provider flow itself lives outside this crate; a session
//! only records the outcome (an ID token and when it expires).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Query answered by whatever tracks the user's login
pub trait SessionStatus: Send + Sync {
    fn is_authenticated(&self) -> bool;
}

/// Login state with token expiry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub logged_in: bool,
    pub id_token: Option<String>,
    pub token_expiry: DateTime<Utc>,
}

impl Default for Session {
    fn default() -> Self {
        Self::logged_out()
    }
}

impl Session {
    /// A session that is not authenticated
    pub fn logged_out() -> Self {
        Self {
            logged_in: false,
            id_token: None,
            token_expiry: Utc::now(),
        }
    }

    /// Record a successful login with a token valid for `ttl`
    ///
    /// Returns `None` if the expiry is past the representable date range.
    pub fn login(id_token: impl Into<String>, ttl: Duration) -> Option<Self> {
        let token_expiry = Utc::now().checked_add_signed(ttl)?;

        Some(Self {
            logged_in: true,
            id_token: Some(id_token.into()),
            token_expiry,
        })
    }

    /// Forget the token and expire the session immediately
    pub fn logout(&mut self) {
        self.logged_in = false;
        self.id_token = None;
        self.token_expiry = Utc::now();
    }

    /// The token, if the session is still authenticated
    pub fn active_token(&self) -> Option<&str> {
        if self.is_authenticated() {
            self.id_token.as_deref()
        } else {
            None
        }
    }
}

impl SessionStatus for Session {
    fn is_authenticated(&self) -> bool {
        self.logged_in && Utc::now() < self.token_expiry
    }
}
