//! Credential pair and its persisted copy
//!
//! The remote API only understands basic auth, so the pair itself is what
//! gets persisted. On disk it lives under a single key in a small JSON
//! document; the key being absent means "logged out".

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{AdminError, Result};

/// Storage key holding the serialized credential pair
pub const STORAGE_KEY: &str = "adminAuth";

/// Username/password pair re-sent with every authenticated request
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
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

    /// Value for the `Authorization` header
    pub fn basic_auth_header(&self) -> String {
        let encoded = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {}", encoded)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// Persistent client-side storage for the credential pair
pub trait CredentialStore: Send + Sync {
    /// Ok(None) when nothing is stored; Err when the stored value is unreadable
    fn load(&self) -> Result<Option<Credentials>>;
    fn save(&self, credentials: &Credentials) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// JSON key/value document on disk, e.g. `~/.college-admin/session.json`
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `session.json` inside the given state directory
    pub fn in_dir(state_dir: &Path) -> Self {
        Self::new(state_dir.join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, serde_json::Value>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| AdminError::storage(&self.path, e.to_string()))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| AdminError::storage(&self.path, e.to_string()))
    }

    fn write_entries(&self, entries: &BTreeMap<String, serde_json::Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AdminError::storage(parent, e.to_string()))?;
        }
        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| AdminError::storage(&self.path, e.to_string()))?;
        fs::write(&self.path, content).map_err(|e| AdminError::storage(&self.path, e.to_string()))?;
        restrict_permissions(&self.path)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .map_err(|e| AdminError::storage(path, e.to_string()))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<Credentials>> {
        let entries = self.read_entries()?;
        match entries.get(STORAGE_KEY) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| AdminError::storage(&self.path, format!("{}: {}", STORAGE_KEY, e))),
        }
    }

    fn save(&self, credentials: &Credentials) -> Result<()> {
        // A corrupt document is replaced rather than blocking login
        let mut entries = self.read_entries().unwrap_or_default();
        let value = serde_json::to_value(credentials)
            .map_err(|e| AdminError::storage(&self.path, e.to_string()))?;
        entries.insert(STORAGE_KEY.to_string(), value);
        self.write_entries(&entries)
    }

    fn clear(&self) -> Result<()> {
        let mut entries = self.read_entries().unwrap_or_default();
        entries.remove(STORAGE_KEY);
        if entries.is_empty() {
            if self.path.exists() {
                fs::remove_file(&self.path)
                    .map_err(|e| AdminError::storage(&self.path, e.to_string()))?;
            }
            return Ok(());
        }
        self.write_entries(&entries)
    }
}

/// In-process store; also handy for `--no-persist` style usage and tests
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<Credentials>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(credentials: Credentials) -> Self {
        Self {
            slot: Mutex::new(Some(credentials)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<Credentials>> {
        Ok(self.slot.lock().map(|s| s.clone()).unwrap_or(None))
    }

    fn save(&self, credentials: &Credentials) -> Result<()> {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(credentials.clone());
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
        Ok(())
    }
}
