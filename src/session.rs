//! Client-side session cache. The authoritative session is the server's
//! `HttpOnly` cookie; this context only remembers `{email, username, role}` for
//! display and is created on login, cleared on logout, and re-checked once on
//! start with a silent profile probe.

use crate::api::{ApiClient, AppError};
use serde::{Deserialize, Serialize};
use std::{
    fmt, fs,
    path::PathBuf,
    sync::{Arc, PoisonError, RwLock},
};
use tracing::{debug, warn};

/// Path of the profile resource used for the silent probe.
pub const PROFILE_PATH: &str = "/user/profile/";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
    #[serde(other)]
    Unknown,
}

impl Role {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::Unknown => "unknown",
        };
        formatter.write_str(label)
    }
}

/// Minimal, non-authoritative session metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
    pub role: Role,
}

/// Storage slot for the session cache.
pub trait SessionSlot: Send + Sync {
    /// # Errors
    /// Returns `AppError::Storage` if the slot exists but cannot be read.
    fn load(&self) -> Result<Option<UserSession>, AppError>;

    /// # Errors
    /// Returns `AppError::Storage` if the slot cannot be written.
    fn store(&self, session: &UserSession) -> Result<(), AppError>;

    /// # Errors
    /// Returns `AppError::Storage` if the slot cannot be cleared.
    fn clear(&self) -> Result<(), AppError>;
}

/// Slot that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemorySlot {
    value: RwLock<Option<UserSession>>,
}

impl SessionSlot for MemorySlot {
    fn load(&self) -> Result<Option<UserSession>, AppError> {
        Ok(self
            .value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn store(&self, session: &UserSession) -> Result<(), AppError> {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), AppError> {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Slot backed by a small JSON file.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SessionSlot for FileSlot {
    fn load(&self) -> Result<Option<UserSession>, AppError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.path).map_err(|err| {
            AppError::Storage(format!("Failed to read {}: {err}", self.path.display()))
        })?;

        // a corrupt cache is treated as an empty slot
        Ok(serde_json::from_str(&raw).ok())
    }

    fn store(&self, session: &UserSession) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                AppError::Storage(format!("Failed to create {}: {err}", parent.display()))
            })?;
        }

        let raw = serde_json::to_string(session)
            .map_err(|err| AppError::Serialization(format!("Failed to encode session: {err}")))?;

        fs::write(&self.path, raw).map_err(|err| {
            AppError::Storage(format!("Failed to write {}: {err}", self.path.display()))
        })
    }

    fn clear(&self) -> Result<(), AppError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AppError::Storage(format!(
                "Failed to remove {}: {err}",
                self.path.display()
            ))),
        }
    }
}

/// Injected session context shared by the service, the guard and the views.
#[derive(Clone)]
pub struct SessionContext {
    current: Arc<RwLock<Option<UserSession>>>,
    slot: Arc<dyn SessionSlot>,
}

impl SessionContext {
    /// Builds a context over `slot`, restoring any cached session.
    pub fn new(slot: Arc<dyn SessionSlot>) -> Self {
        let restored = slot.load().unwrap_or_else(|err| {
            warn!("Ignoring session cache: {err}");
            None
        });

        Self {
            current: Arc::new(RwLock::new(restored)),
            slot,
        }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySlot::default()))
    }

    /// Re-checks the cached session against the server without toasts or
    /// redirects. The cookie is the source of truth: on 401 the cache is cleared.
    ///
    /// # Errors
    /// Returns an `AppError` for failures other than 401; the cache is left untouched.
    pub async fn init(&self, api: &ApiClient) -> Result<Option<UserSession>, AppError> {
        let probed = api.get_optional::<UserSession>(PROFILE_PATH).await?;
        match &probed {
            Some(session) => {
                debug!(role = %session.role, "session restored");
                self.set(session.clone());
            }
            None => {
                debug!("no active session");
                self.teardown();
            }
        }
        Ok(probed)
    }

    #[must_use]
    pub fn get(&self) -> Option<UserSession> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.get().map(|session| session.role)
    }

    /// Stores the session after login.
    pub fn set(&self, session: UserSession) {
        if let Err(err) = self.slot.store(&session) {
            warn!("Failed to persist session cache: {err}");
        }
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
    }

    /// Clears the session on logout or when the server no longer knows us.
    pub fn teardown(&self) {
        if let Err(err) = self.slot.clear() {
            warn!("Failed to clear session cache: {err}");
        }
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SessionContext")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}
