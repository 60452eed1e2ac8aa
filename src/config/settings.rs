//! Credential storage for fic-expenses
//!
//! Three keys are persisted: the API access token, the company id and the
//! default payment account. `FileConfigStore` keeps them in `config.json`;
//! environment variables take precedence when reading.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;
use zeroize::Zeroizing;

use super::paths::AppPaths;
use crate::error::{FicError, FicResult};
use crate::models::PaymentAccountId;

/// The persisted configuration keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigKey {
    AccessToken,
    CompanyId,
    DefaultAccountId,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 3] = [
        Self::AccessToken,
        Self::CompanyId,
        Self::DefaultAccountId,
    ];

    /// Environment variable overriding this key
    pub const fn env_var(&self) -> &'static str {
        match self {
            Self::AccessToken => "FIC_ACCESS_TOKEN",
            Self::CompanyId => "FIC_COMPANY_ID",
            Self::DefaultAccountId => "FIC_DEFAULT_ACCOUNT_ID",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::AccessToken => "Access token",
            Self::CompanyId => "Company ID",
            Self::DefaultAccountId => "Default payment account",
        }
    }

    fn is_numeric(&self) -> bool {
        !matches!(self, Self::AccessToken)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.env_var())
    }
}

/// Key-value access to the three configuration keys
pub trait ConfigStore {
    fn get(&self, key: ConfigKey) -> Option<String>;

    /// Store a value; numeric keys reject non-numeric input
    fn set(&mut self, key: ConfigKey, value: &str) -> FicResult<()>;

    fn unset(&mut self, key: ConfigKey) -> FicResult<()>;
}

fn validate_value(key: ConfigKey, value: &str) -> FicResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FicError::Validation(format!("{} cannot be empty", key.label())));
    }
    if key.is_numeric() && value.parse::<u64>().is_err() {
        return Err(FicError::Validation(format!(
            "{} must be a number, got '{}'",
            key.label(),
            value
        )));
    }
    Ok(value.to_string())
}

/// On-disk settings file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_account_id: Option<String>,
}

fn default_schema_version() -> u32 {
    1
}

impl Settings {
    fn slot(&mut self, key: ConfigKey) -> &mut Option<String> {
        match key {
            ConfigKey::AccessToken => &mut self.access_token,
            ConfigKey::CompanyId => &mut self.company_id,
            ConfigKey::DefaultAccountId => &mut self.default_account_id,
        }
    }

    fn value(&self, key: ConfigKey) -> Option<&String> {
        match key {
            ConfigKey::AccessToken => self.access_token.as_ref(),
            ConfigKey::CompanyId => self.company_id.as_ref(),
            ConfigKey::DefaultAccountId => self.default_account_id.as_ref(),
        }
    }

    /// Load settings from disk, or defaults if the file doesn't exist
    pub fn load_or_default(paths: &AppPaths) -> FicResult<Self> {
        let settings_path = paths.settings_file();
        if !settings_path.exists() {
            return Ok(Self {
                schema_version: default_schema_version(),
                ..Default::default()
            });
        }

        let contents = fs::read_to_string(&settings_path)
            .map_err(|e| FicError::Io(format!("Failed to read settings file: {}", e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| FicError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings atomically; the file is readable by the owner only
    pub fn save(&self, paths: &AppPaths) -> FicResult<()> {
        paths.ensure_directories()?;
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| FicError::Config(format!("Failed to serialize settings: {}", e)))?;
        write_private(&paths.settings_file(), contents.as_bytes())
    }
}

fn write_private(path: &Path, contents: &[u8]) -> FicResult<()> {
    let temp_path = path.with_extension("json.tmp");
    let mut file = fs::File::create(&temp_path).map_err(|e| {
        FicError::Storage(format!("Failed to create {}: {}", temp_path.display(), e))
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }

    file.write_all(contents)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&temp_path, path).map_err(|e| {
        FicError::Storage(format!("Failed to replace {}: {}", path.display(), e))
    })
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String>>;

/// `ConfigStore` backed by `config.json`, overridden by environment variables
pub struct FileConfigStore {
    paths: AppPaths,
    settings: Settings,
    env: EnvLookup,
}

impl FileConfigStore {
    /// Load the store, reading overrides from the process environment
    pub fn load(paths: AppPaths) -> FicResult<Self> {
        Self::with_env(paths, Box::new(|name| std::env::var(name).ok()))
    }

    /// Load the store with a custom environment lookup
    pub fn with_env(paths: AppPaths, env: EnvLookup) -> FicResult<Self> {
        let settings = Settings::load_or_default(&paths)?;
        Ok(Self {
            paths,
            settings,
            env,
        })
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    /// True when the environment, not the file, supplies `key`
    pub fn is_overridden(&self, key: ConfigKey) -> bool {
        (self.env)(key.env_var()).is_some_and(|v| !v.trim().is_empty())
    }
}

impl ConfigStore for FileConfigStore {
    fn get(&self, key: ConfigKey) -> Option<String> {
        (self.env)(key.env_var())
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.settings.value(key).cloned())
            .map(|v| v.trim().to_string())
    }

    fn set(&mut self, key: ConfigKey, value: &str) -> FicResult<()> {
        let value = validate_value(key, value)?;
        *self.settings.slot(key) = Some(value);
        self.settings.save(&self.paths)?;
        tracing::info!(key = %key, "configuration updated");
        Ok(())
    }

    fn unset(&mut self, key: ConfigKey) -> FicResult<()> {
        *self.settings.slot(key) = None;
        self.settings.save(&self.paths)
    }
}

/// Non-persistent store
#[derive(Debug, Default, Clone)]
pub struct MemoryConfigStore {
    values: BTreeMap<ConfigKey, String>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get(&self, key: ConfigKey) -> Option<String> {
        self.values.get(&key).cloned()
    }

    fn set(&mut self, key: ConfigKey, value: &str) -> FicResult<()> {
        let value = validate_value(key, value)?;
        self.values.insert(key, value);
        Ok(())
    }

    fn unset(&mut self, key: ConfigKey) -> FicResult<()> {
        self.values.remove(&key);
        Ok(())
    }
}

/// What the API client needs to authenticate
#[derive(Clone)]
pub struct Credentials {
    pub access_token: Zeroizing<String>,
    pub company_id: u64,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &mask_token(&self.access_token))
            .field("company_id", &self.company_id)
            .finish()
    }
}

impl Credentials {
    /// Read credentials from a store, failing when either is missing
    pub fn from_store(store: &dyn ConfigStore) -> FicResult<Self> {
        let missing = |key: ConfigKey| {
            FicError::Config(format!(
                "Missing credentials: {} is not set. Run 'fic-expenses configs' or set {}",
                key.label(),
                key.env_var()
            ))
        };

        let access_token = store
            .get(ConfigKey::AccessToken)
            .ok_or_else(|| missing(ConfigKey::AccessToken))?;
        let company_id = store
            .get(ConfigKey::CompanyId)
            .ok_or_else(|| missing(ConfigKey::CompanyId))?;
        let company_id = company_id.parse::<u64>().map_err(|_| {
            FicError::Config(format!("Company ID must be a number, got '{}'", company_id))
        })?;

        Ok(Self {
            access_token: Zeroizing::new(access_token),
            company_id,
        })
    }
}

/// The configured default payment account, if any
pub fn default_account(store: &dyn ConfigStore) -> FicResult<Option<PaymentAccountId>> {
    store
        .get(ConfigKey::DefaultAccountId)
        .map(|v| {
            v.parse::<u64>().map_err(|_| {
                FicError::Config(format!("Default account ID must be a number, got '{}'", v))
            })
        })
        .transpose()
}

/// Show only the first and last four characters of a token
pub fn mask_token(token: &str) -> String {
    const VISIBLE: usize = 4;
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= VISIBLE * 2 {
        return token.to_string();
    }
    let head: String = chars[..VISIBLE].iter().collect();
    let tail: String = chars[chars.len() - VISIBLE..].iter().collect();
    format!("{}{}{}", head, "*".repeat(20), tail)
}
