//! A valid Google session (access token) for calling the Calendar API.
//!
//! Sessions are stored per account at:
//!   ~/.config/calstat/google/session/{account}.toml

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use google_calendar::{AccessToken, Client};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::app_config::{self, Credentials};
use crate::auth::redirect_uri;

/// Refresh this long before the token actually expires.
const EXPIRY_MARGIN_SECONDS: i64 = 60;

pub struct Session {
    account_email: String,
    path: PathBuf,
    data: SessionData,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionData {
    access_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

impl From<&AccessToken> for SessionData {
    fn from(tokens: &AccessToken) -> Self {
        SessionData::from_tokens(
            tokens.access_token.clone(),
            tokens.refresh_token.clone(),
            tokens.expires_in,
        )
    }
}

impl SessionData {
    pub fn from_tokens(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        SessionData {
            access_token,
            refresh_token,
            expires_at: Utc::now() + Duration::seconds(expires_in),
        }
    }

    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_MARGIN_SECONDS) >= self.expires_at
    }
}

/// Account emails become file names.
fn file_name_for(account_email: &str) -> String {
    format!("{}.toml", account_email.replace(['/', '\\', ':'], "_"))
}

impl Session {
    fn path_for_account_email(account_email: &str) -> Result<PathBuf> {
        Ok(app_config::base_dir()?
            .join("session")
            .join(file_name_for(account_email)))
    }

    pub fn new(account_email: &str, data: SessionData) -> Result<Self> {
        Ok(Session {
            account_email: account_email.to_string(),
            path: Self::path_for_account_email(account_email)?,
            data,
        })
    }

    pub fn account_email(&self) -> &str {
        &self.account_email
    }

    pub fn access_token(&self) -> &str {
        &self.data.access_token
    }

    /// Load a session and refresh it if expired.
    ///
    /// A session whose refresh fails is discarded, so the next `calstat auth`
    /// starts from scratch.
    pub async fn load_valid(account_email: &str) -> Result<Self> {
        let mut session = Self::load(account_email)?;

        if session.data.is_expired(Utc::now()) {
            debug!(account = account_email, "Access token expired, refreshing");

            if let Err(e) = session.refresh().await {
                warn!(account = account_email, error = %e, "Token refresh failed, discarding session");
                session.discard()?;
                anyhow::bail!(
                    "Google session for {} could not be refreshed ({:#}).\n\
                    Run `calstat auth` to sign in again.",
                    account_email,
                    e
                );
            }
        }

        Ok(session)
    }

    fn load(account_email: &str) -> Result<Self> {
        let path = Self::path_for_account_email(account_email)?;
        let data = read_session(&path).with_context(|| {
            format!(
                "No Google session for {}. Run `calstat auth` first.",
                account_email
            )
        })?;

        Ok(Session {
            account_email: account_email.to_string(),
            path,
            data,
        })
    }

    pub fn save(&self) -> Result<()> {
        write_session(&self.path, &self.data)
    }

    fn discard(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove {}", self.path.display()))?;
        }
        Ok(())
    }

    async fn refresh(&mut self) -> Result<()> {
        let creds: Credentials = app_config::load()?;

        let client = Client::new(
            creds.client_id,
            creds.client_secret,
            redirect_uri(),
            self.data.access_token.clone(),
            self.data.refresh_token.clone(),
        );

        let mut tokens = client
            .refresh_access_token()
            .await
            .context("Failed to refresh token")?;

        // Google typically doesn't return a new refresh_token on refresh
        if tokens.refresh_token.is_empty() {
            tokens.refresh_token = self.data.refresh_token.clone();
        }

        self.data = (&tokens).into();
        self.save()?;

        Ok(())
    }
}

fn read_session(path: &Path) -> Result<SessionData> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read Google session from {}", path.display()))?;

    toml::from_str(&contents)
        .with_context(|| format!("Failed to parse Google session from {}", path.display()))
}

fn write_session(path: &Path, data: &SessionData) -> Result<()> {
    let contents = toml::to_string_pretty(data).context("Failed to serialize session")?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write session to {}", path.display()))?;

    // Owner-only (0600), the file contains OAuth tokens
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_is_path_safe() {
        assert_eq!(file_name_for("me@example.com"), "me@example.com.toml");
        assert_eq!(file_name_for("a/b\\c:d"), "a_b_c_d.toml");
    }

    #[test]
    fn test_expiry_includes_margin() {
        let now = Utc::now();
        let data = SessionData {
            access_token: "a".into(),
            refresh_token: "r".into(),
            expires_at: now + Duration::seconds(30),
        };
        assert!(data.is_expired(now));

        let fresh = SessionData {
            expires_at: now + Duration::hours(1),
            ..data
        };
        assert!(!fresh.is_expired(now));
    }

    #[test]
    fn test_session_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session").join("me@example.com.toml");
        let data = SessionData::from_tokens("access".into(), "refresh".into(), 3600);

        write_session(&path, &data).unwrap();
        assert_eq!(read_session(&path).unwrap(), data);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }
}
