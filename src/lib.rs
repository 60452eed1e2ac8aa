//! fic-expenses - Terminal client for Fatture in Cloud expenses
//!
//! This library provides the core functionality for listing, creating and
//! paying received expense documents through the Fatture in Cloud API, from
//! either the command line or an interactive TUI.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration paths and the credential store
//! - `error`: Custom error types
//! - `models`: Core data models (expenses, installments, money, quota)
//! - `api`: The `ExpenseApi` port and its HTTP adapter
//! - `services`: Schedule generation and expense workflows
//! - `session`: Lazily connected API client plus config store
//! - `display`, `export`: Terminal tables and JSON/YAML/CSV output
//! - `cli`, `tui`: The two front ends
//!
//! # Example
//!
//! ```rust,ignore
//! use fic_expenses::services::{ExpenseFilter, ExpenseService};
//! use fic_expenses::session::Session;
//!
//! let mut session = Session::load()?;
//! let service = ExpenseService::new(session.client()?);
//! let unpaid = service.list(&ExpenseFilter::default())?;
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod services;
pub mod session;
pub mod tui;

pub use error::{FicError, FicResult};
