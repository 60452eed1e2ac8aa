//! Path management for fic-expenses
//!
//! ## Path Resolution Order
//!
//! 1. `FIC_EXPENSES_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/fic-expenses` or `~/.config/fic-expenses`
//! 3. Windows: `%APPDATA%\fic-expenses`

use std::path::PathBuf;

use crate::error::FicError;

/// Environment variable overriding the config directory
pub const DIR_ENV_VAR: &str = "FIC_EXPENSES_DIR";

const APP_DIR_NAME: &str = "fic-expenses";

/// Manages all paths used by fic-expenses
#[derive(Debug, Clone)]
pub struct AppPaths {
    base_dir: PathBuf,
}

impl AppPaths {
    /// Resolve the config directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home or config directory can be determined.
    pub fn new() -> Result<Self, FicError> {
        let base_dir = match std::env::var(DIR_ENV_VAR) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create AppPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Path to the JSON settings file holding credentials
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Path to the TUI log file
    pub fn log_file(&self) -> PathBuf {
        self.base_dir.join("fic-expenses.log")
    }

    pub fn ensure_directories(&self) -> Result<(), FicError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| FicError::Io(format!("Failed to create config directory: {}", e)))
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, FicError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".config"))
            .ok_or_else(|| FicError::Config("Could not determine home directory".into()))?,
    };
    Ok(config_base.join(APP_DIR_NAME))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, FicError> {
    let appdata = directories::BaseDirs::new()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| FicError::Config("Could not determine APPDATA directory".into()))?;
    Ok(appdata.join(APP_DIR_NAME))
}
