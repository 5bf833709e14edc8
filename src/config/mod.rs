//! Configuration module for meeting-digest
//!
//! Handles loading settings from a TOML file plus environment overrides.

mod settings;

pub use settings::{GeneralSettings, LlmSettings, ServerSettings, Settings, API_KEY_ENV_VARS};
