//! Application configuration module.
//!
//! Manages the TOML config file holding the TMDB credential and the
//! response language.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::{AppConfig, DEFAULT_LANGUAGE, TmdbConfig};
pub use paths::{resolve_config_path, resolve_log_path};
