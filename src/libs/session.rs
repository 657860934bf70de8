//! The signed-in session, stored in the data directory between invocations.
//!
//! [`SessionContext`] is loaded once at startup and handed to the commands
//! that need to know who is signed in. A stored session that has been idle
//! longer than the configured sign-out threshold is treated as expired and
//! removed on load.

use super::config::LoginConfig;
use super::data_storage::DataStorage;
use super::error::{DhaError, Result};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

pub const SESSION_FILE_NAME: &str = ".session";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: String,
    pub started_at: NaiveDateTime,
    pub last_seen: NaiveDateTime,
}

impl Session {
    pub fn is_expired(&self, idle_limit: Duration, now: NaiveDateTime) -> bool {
        let idle = now.signed_duration_since(self.last_seen);
        match chrono::Duration::from_std(idle_limit) {
            Ok(limit) => idle >= limit,
            Err(_) => false,
        }
    }
}

#[derive(Debug)]
pub struct SessionContext {
    path: PathBuf,
    session: Option<Session>,
    was_expired: bool,
}

impl SessionContext {
    /// Loads the stored session, discarding it if it has gone idle.
    pub fn load(storage: &DataStorage, idle_limit: Duration, now: NaiveDateTime) -> Result<Self> {
        let path = storage.get_path(SESSION_FILE_NAME)?;
        let mut context = Self {
            path,
            session: None,
            was_expired: false,
        };

        if !context.path.exists() {
            return Ok(context);
        }

        let stored = fs::read_to_string(&context.path)?;
        let session: Session = match serde_json::from_str(&stored) {
            Ok(session) => session,
            Err(e) => {
                debug!("discarding unreadable session file: {}", e);
                context.clear()?;
                return Ok(context);
            }
        };

        if session.is_expired(idle_limit, now) {
            debug!(user = %session.user, "stored session expired");
            context.clear()?;
            context.was_expired = true;
        } else {
            context.session = Some(session);
        }
        Ok(context)
    }

    pub fn load_now(storage: &DataStorage, idle_limit: Duration) -> Result<Self> {
        Self::load(storage, idle_limit, Local::now().naive_local())
    }

    pub fn current(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// True when a session existed but had timed out.
    pub fn was_expired(&self) -> bool {
        self.was_expired
    }

    pub fn require(&self) -> Result<&Session> {
        match (&self.session, self.was_expired) {
            (Some(session), _) => Ok(session),
            (None, true) => Err(DhaError::SessionExpired),
            (None, false) => Err(DhaError::NotSignedIn),
        }
    }

    pub fn start(&mut self, user: &str, now: NaiveDateTime) -> Result<&Session> {
        let session = Session {
            user: user.to_string(),
            started_at: now,
            last_seen: now,
        };
        self.write(&session)?;
        self.was_expired = false;
        Ok(self.session.insert(session))
    }

    /// Records activity so the session stays alive across invocations.
    pub fn touch(&mut self, now: NaiveDateTime) -> Result<()> {
        let Some(mut session) = self.session.clone() else {
            return Err(DhaError::NotSignedIn);
        };
        session.last_seen = now;
        self.write(&session)?;
        self.session = Some(session);
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.session = None;
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    fn write(&self, session: &Session) -> Result<()> {
        fs::write(&self.path, serde_json::to_string_pretty(session)?)?;
        Ok(())
    }
}

/// Compares the entered credentials with the configured ones and returns
/// the signed-in user name.
///
/// Username and phone are compared after trimming, the password exactly.
pub fn verify_credentials(login: &LoginConfig, username: &str, password: &str, phone: &str) -> Result<String> {
    if !login.is_configured() {
        return Err(DhaError::Credentials(
            "Login is not configured. Please contact the administrator to set the login credentials.".to_string(),
        ));
    }

    let username = username.trim();
    let matches = username == login.username.trim() && password == login.password && phone.trim() == login.phone.trim();
    if !matches {
        return Err(DhaError::Credentials("Invalid username, password, or phone number.".to_string()));
    }
    Ok(username.to_string())
}
