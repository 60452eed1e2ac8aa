//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod configs;
pub mod create;
pub mod list;
pub mod pay;
pub mod prompt;
pub mod show;

pub use configs::{handle_configs_command, ConfigsArgs};
pub use create::{handle_create_command, CreateArgs};
pub use list::{handle_list_command, ListArgs, OutputFormat};
pub use pay::{handle_pay_command, PayArgs};
pub use show::{handle_show_command, ShowArgs};
