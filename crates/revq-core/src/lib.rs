//! Process configuration, validated once at startup.

pub mod config;

pub use config::{Config, ConfigError};
