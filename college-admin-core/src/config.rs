use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AdminError, Result};

/// API base URL baked in at build time (`COLLEGE_API_URL=... cargo build`)
pub const DEFAULT_API_BASE_URL: &str = match option_env!("COLLEGE_API_URL") {
    Some(url) => url,
    None => "https://collegeapi-mnni.onrender.com",
};

/// Facility toggles offered by the form when the config names none
pub const DEFAULT_FACILITIES: [&str; 8] = [
    "Library",
    "Hostel",
    "Laboratory",
    "Sports",
    "Canteen",
    "Transport",
    "WiFi",
    "Auditorium",
];

/// Admin client configuration, `~/.college-admin/config.toml`
///
/// Every field is optional in the file. Precedence when resolving:
/// explicit override > environment > file > built-in default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    pub api_base_url: Option<String>,
    pub state_dir: Option<PathBuf>,
    pub facilities: Option<Vec<String>>,
}

impl AdminConfig {
    /// Load from the default location; a missing file yields defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| AdminError::config(format!("failed to read {:?}: {}", path, e)))?;
        toml::from_str(&content)
            .map_err(|e| AdminError::config(format!("invalid TOML in {:?}: {}", path, e)))
    }

    /// `~/.college-admin/config.toml`
    pub fn config_path() -> PathBuf {
        default_home().join("config.toml")
    }

    /// Flag/env/file/default resolution for the API base URL
    pub fn api_base_url(&self, flag: Option<&str>) -> String {
        flag.map(str::to_string)
            .or_else(|| env::var("COLLEGE_API_URL").ok().filter(|v| !v.is_empty()))
            .or_else(|| self.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
    }

    /// Directory holding the persisted session
    pub fn state_dir(&self) -> PathBuf {
        env::var_os("COLLEGE_ADMIN_STATE_DIR")
            .map(PathBuf::from)
            .or_else(|| self.state_dir.clone())
            .unwrap_or_else(default_home)
    }

    pub fn facilities(&self) -> Vec<String> {
        match &self.facilities {
            Some(list) if !list.is_empty() => list.clone(),
            _ => DEFAULT_FACILITIES.iter().map(|f| f.to_string()).collect(),
        }
    }
}

fn default_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".college-admin")
}
