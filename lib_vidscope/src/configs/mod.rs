//! # Configuration Modules
//!
//! Runtime configuration for the front end plus the persisted user settings
//! record.

/// Layered runtime configuration (defaults, JSON file, env/CLI).
pub mod config;

/// The `settings` record kept in the key-value store.
pub mod settings;

pub use config::{load_config, Config};
pub use settings::{seed_settings, Settings};
