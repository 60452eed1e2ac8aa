//! Per-process state shared by the CLI commands and the TUI
//!
//! The config store is loaded eagerly; the API client is only built when a
//! command first needs it, so local validation errors never require
//! credentials.

use crate::api::client::DEFAULT_BASE_URL;
use crate::api::FicClient;
use crate::config::{default_account, AppPaths, Credentials, FileConfigStore};
use crate::error::{FicError, FicResult};
use crate::models::PaymentAccountId;

/// Environment variable pointing the client at another API host
pub const API_URL_ENV_VAR: &str = "FIC_API_URL";

pub struct Session {
    store: FileConfigStore,
    client: Option<FicClient>,
}

impl Session {
    /// Load configuration from the default location
    pub fn load() -> FicResult<Self> {
        let paths = AppPaths::new()?;
        Ok(Self::with_store(FileConfigStore::load(paths)?))
    }

    pub fn with_store(store: FileConfigStore) -> Self {
        Self {
            store,
            client: None,
        }
    }

    pub fn store(&self) -> &FileConfigStore {
        &self.store
    }

    pub fn paths(&self) -> &AppPaths {
        self.store.paths()
    }

    /// Mutable store access; drops the cached client since credentials may
    /// change
    pub fn store_mut(&mut self) -> &mut FileConfigStore {
        self.client = None;
        &mut self.store
    }

    pub fn default_account(&self) -> FicResult<Option<PaymentAccountId>> {
        default_account(&self.store)
    }

    /// The API client, built from the stored credentials on first use
    pub fn client(&mut self) -> FicResult<&FicClient> {
        if self.client.is_none() {
            let credentials = Credentials::from_store(&self.store)?;
            self.client = Some(connect(&credentials)?);
        }

        self.client
            .as_ref()
            .ok_or_else(|| FicError::Config("API client unavailable".to_string()))
    }

    /// Credentials as currently stored
    pub fn credentials(&self) -> FicResult<Credentials> {
        Credentials::from_store(&self.store)
    }
}

/// Build a client for `credentials`, honoring `FIC_API_URL`
pub fn connect(credentials: &Credentials) -> FicResult<FicClient> {
    let base_url = std::env::var(API_URL_ENV_VAR)
        .ok()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    tracing::debug!(company_id = credentials.company_id, %base_url, "creating API client");
    FicClient::with_base_url(credentials, &base_url)
}
