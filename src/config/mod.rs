//! Configuration module for fic-expenses
//!
//! This module provides:
//! - XDG-compliant path resolution
//! - Credential storage behind the `ConfigStore` trait

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{
    default_account, mask_token, ConfigKey, ConfigStore, Credentials, FileConfigStore,
    MemoryConfigStore, Settings,
};
