//! Login session commands for the zeitmaschine CLI
//!
//! The identity provider flow happens outside the CLI. `zm auth login`
//! records the ID token it produced together with its lifetime, and gallery
//! commands consult the stored session before running.

use crate::config::AppConfig;
use crate::paths;
use anyhow::{Context, Result};
use chrono::Duration;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use zeitmaschine_core::{Session, SessionStatus};

/// Default token lifetime when none is given
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 3600;

/// Session persisted as JSON next to the cache database
pub struct SessionStore {
    path: PathBuf,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            path: paths::get_session_path(),
        }
    }

    /// Create a SessionStore with a specific path (for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the stored session; a missing file means logged out
    pub fn load(&self) -> Result<Session> {
        if !self.path.exists() {
            return Ok(Session::logged_out());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file {}", self.path.display()))?;
        serde_json::from_str(&content).context("Session file is corrupted")
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write session file {}", self.path.display()))
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// Record a login for `token`, valid for `expires_in_seconds`
pub fn login(store: &SessionStore, token: &str, expires_in_seconds: i64) -> Result<Session> {
    if token.trim().is_empty() {
        anyhow::bail!("Token must not be empty");
    }
    if expires_in_seconds <= 0 {
        anyhow::bail!("Token lifetime must be positive");
    }

    let session = Duration::try_seconds(expires_in_seconds)
        .and_then(|ttl| Session::login(token.trim(), ttl))
        .with_context(|| format!("Token lifetime of {expires_in_seconds} seconds is too large"))?;
    store.save(&session)?;
    log::debug!("Session valid until {}", session.token_expiry);

    Ok(session)
}

/// Forget the stored session, returning whether it was still valid
pub fn logout(store: &SessionStore) -> Result<bool> {
    let was_authenticated = store.load()?.is_authenticated();
    store.clear()?;
    Ok(was_authenticated)
}

/// Print the authentication status
pub fn status(store: &SessionStore) -> Result<()> {
    let session = store.load()?;

    if session.is_authenticated() {
        println!(
            "{} until {}",
            "Authenticated".green(),
            session.token_expiry.format("%Y-%m-%d %H:%M:%S UTC")
        );
    } else if session.logged_in {
        println!("{} (token expired)", "Not authenticated".yellow());
    } else {
        println!("{}", "Not authenticated".yellow());
    }

    Ok(())
}

/// Session guard for gallery commands
///
/// Returns the active token when there is one. Fails only if the
/// configuration requires authentication and the session is not valid.
pub fn require_session(config: &AppConfig, store: &SessionStore) -> Result<Option<String>> {
    let session = store.load()?;

    if config.auth.required && !session.is_authenticated() {
        anyhow::bail!("Not authenticated. Run 'zm auth login --token <TOKEN>' first");
    }

    Ok(session.active_token().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(temp_dir: &TempDir) -> SessionStore {
        SessionStore::with_path(temp_dir.path().join("session.json"))
    }

    #[test]
    fn test_missing_file_is_logged_out() {
        let temp_dir = TempDir::new().unwrap();
        let session = store(&temp_dir).load().unwrap();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_login_persists_session() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        login(&store, "eyJhbGciOi", 600).unwrap();

        let session = store.load().unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.active_token(), Some("eyJhbGciOi"));
    }

    #[test]
    fn test_login_rejects_empty_token() {
        let temp_dir = TempDir::new().unwrap();
        assert!(login(&store(&temp_dir), "  ", 600).is_err());
        assert!(login(&store(&temp_dir), "token", 0).is_err());
    }

    #[test]
    fn test_login_rejects_huge_lifetime() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        for seconds in [1_000_000_000_000_000, i64::MAX] {
            let err = login(&store, "eyJhbGciOi", seconds).unwrap_err();
            assert!(err.to_string().contains("too large"));
        }
        assert!(!store.load().unwrap().is_authenticated());
    }

    #[test]
    fn test_logout_removes_session() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        login(&store, "eyJhbGciOi", 600).unwrap();
        assert!(logout(&store).unwrap());
        assert!(!logout(&store).unwrap());

        assert!(!store.load().unwrap().is_authenticated());
    }

    #[test]
    fn test_guard_only_enforced_when_required() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        let mut config = AppConfig::default();

        assert_eq!(require_session(&config, &store).unwrap(), None);

        config.auth.required = true;
        assert!(require_session(&config, &store).is_err());

        login(&store, "eyJhbGciOi", 600).unwrap();
        assert_eq!(
            require_session(&config, &store).unwrap(),
            Some("eyJhbGciOi".to_string())
        );
    }
}
