//! Dialog modules for the TUI
//!
//! Contains modal dialogs for paying, creating and configuring

pub mod create;
pub mod help;
pub mod pay;
pub mod settings;
