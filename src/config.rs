//! Engine Configuration
//!
//! Loaded from a JSON file; every field has a default so an empty object
//! is a valid config.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    /// Errors reject the brief; warnings are dropped.
    #[default]
    Block,
    /// Never reject; record everything.
    Warn,
    Log,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SourceConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,
    /// Cooldown before an open breaker lets one trial call through.
    #[serde(default = "default_reset_after_ms")]
    pub reset_after_ms: u64,
}

fn default_true() -> bool { true }
fn default_timeout_ms() -> u64 { 8_000 }
fn default_failure_threshold() -> u32 { 3 }
fn default_reset_after_ms() -> u64 { 30_000 }

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            timeout_ms: default_timeout_ms(),
            failure_threshold: default_failure_threshold(),
            reset_after_ms: default_reset_after_ms(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    #[serde(default)]
    pub palette_source: SourceConfig,
    #[serde(default)]
    pub failure_mode: FailureMode,
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
