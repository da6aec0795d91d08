//! # dnb-core
//!
//! Core types for the dnb daily notebook.
//!
//! This crate defines the pieces shared by the vault engine and the CLI:
//! - Day-file naming and the rollover date header ([`day`])
//! - Configuration loading and home-directory expansion ([`config`])
//! - Error hierarchy ([`DnbError`], [`ConfigError`])

pub mod config;
pub mod day;
pub mod error;

pub use config::{expand_home, Config, FixedHome, HomeDir, Notebook, SystemHome};
pub use error::{ConfigError, DnbError, Result};
