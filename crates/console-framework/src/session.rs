//! # Session Context
//!
//! Who is signed in, and with which role. A [`SessionContext`] is built once at start
//! up and handed to whatever needs it by `Arc`; nothing reaches for a global.
//!
//! The signed-in [`Session`] is persisted through a [`SessionStore`] so a restart can
//! [`restore`](SessionContext::restore) it. Any request that comes back
//! [`ConsoleError::Unauthorized`] should be passed through
//! [`intercept`](SessionContext::intercept), which signs the user out.

use crate::error::ConsoleError;
use crate::navigation::can_open;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Accountant,
    Resident,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Admin => "ADMIN",
            Role::Accountant => "ACCOUNTANT",
            Role::Resident => "RESIDENT",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub role: Role,
}

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session storage failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Stored session is malformed: {0}")]
    Format(#[from] serde_json::Error),
    #[error(transparent)]
    Auth(#[from] ConsoleError),
}

/// Where the signed-in session survives between runs.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>, SessionError>;
    fn save(&self, session: &Session) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Session>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        Ok(self.slot().clone())
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        *self.slot() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.slot() = None;
        Ok(())
    }
}

/// Keeps the session as a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(session)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Exchanges credentials for a session.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Session, ConsoleError>;
}

pub struct SessionContext {
    store: Arc<dyn SessionStore>,
    authenticator: Arc<dyn Authenticator>,
    current: watch::Sender<Option<Session>>,
}

impl SessionContext {
    /// A signed-out context. Call [`restore`](Self::restore) to pick up a saved session.
    pub fn new(store: Arc<dyn SessionStore>, authenticator: Arc<dyn Authenticator>) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            store,
            authenticator,
            current,
        }
    }

    /// Loads the saved session, if any. A session that cannot be read is discarded.
    pub fn restore(&self) -> Option<Session> {
        let session = match self.store.load() {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "Discarding unreadable session");
                if let Err(e) = self.store.clear() {
                    warn!(error = %e, "Failed to clear session");
                }
                None
            }
        };
        if let Some(session) = &session {
            info!(username = %session.username, role = %session.role, "Session restored");
        }
        self.current.send_replace(session.clone());
        session
    }

    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Session, SessionError> {
        let credentials = Credentials::new(username, password);
        let session = self.authenticator.authenticate(&credentials).await?;
        self.store.save(&session)?;
        info!(username = %session.username, role = %session.role, "Signed in");
        self.current.send_replace(Some(session.clone()));
        Ok(session)
    }

    pub fn logout(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear session");
        }
        if let Some(session) = self.current.send_replace(None) {
            info!(username = %session.username, "Signed out");
        }
    }

    pub fn current_user(&self) -> Option<Session> {
        self.current.borrow().clone()
    }

    /// Bearer token for outgoing requests.
    pub fn token(&self) -> Option<String> {
        self.current.borrow().as_ref().map(|s| s.token.clone())
    }

    pub fn role(&self) -> Option<Role> {
        self.current.borrow().as_ref().map(|s| s.role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.borrow().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }

    pub fn is_accountant(&self) -> bool {
        self.role() == Some(Role::Accountant)
    }

    pub fn is_resident(&self) -> bool {
        self.role() == Some(Role::Resident)
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.current.subscribe()
    }

    /// Checks that someone is signed in and that their role may open `path`.
    pub fn authorize(&self, path: &str) -> Result<Session, ConsoleError> {
        match self.current_user() {
            Some(session) if can_open(session.role, path) => Ok(session),
            Some(session) => {
                warn!(role = %session.role, path, "Not allowed for role");
                Err(ConsoleError::Forbidden(path.to_string()))
            }
            None => Err(ConsoleError::Unauthorized),
        }
    }

    /// Signs out on [`ConsoleError::Unauthorized`]. Returns whether it did.
    pub fn handle_unauthorized(&self, error: &ConsoleError) -> bool {
        if matches!(error, ConsoleError::Unauthorized) {
            warn!("Request unauthorized; clearing session");
            self.logout();
            true
        } else {
            false
        }
    }

    /// Passes `result` through, signing out first if it is an authorization failure.
    pub fn intercept<T>(&self, result: Result<T, ConsoleError>) -> Result<T, ConsoleError> {
        if let Err(e) = &result {
            self.handle_unauthorized(e);
        }
        result
    }
}
