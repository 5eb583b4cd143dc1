//! findfood: restaurant discovery from the command line.
//!
//! The search core lives in the `place-search` crate. This crate adds the
//! application layer: TOML configuration with environment overrides,
//! backend wiring, and presentation as a terminal table or CSV file.

pub mod app;
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod export;

pub use app::run_search;
pub use config::{AppConfig, ExportConfig};
pub use error::{AppError, Result};
