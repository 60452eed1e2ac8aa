//! Terminal User Interface module
//!
//! This module provides the interactive expense browser using ratatui: a
//! filterable expense table with statistics, a details screen, and dialogs
//! for paying, creating expenses and editing settings.

pub mod actions;
pub mod app;
pub mod event;
pub mod handler;
pub mod terminal;

// Views
pub mod views;

// Widgets
pub mod widgets;

// Dialogs
pub mod dialogs;

// Layout
pub mod layout;

pub use app::App;
pub use terminal::run_tui;
