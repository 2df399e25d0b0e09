//! Storage module for configuration and the athlete profile.

pub mod config;

pub use config::{AppConfig, AthleteProfile, ConfigError, WeekStart};
