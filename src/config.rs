//! Sync layer configuration management.
//!
//! This module handles loading and saving the sync configuration, which
//! covers the cache TTL, the retry/backoff schedule, and the candidate
//! base paths the fallback resolver expands image references against.
//!
//! Configuration is stored at `~/.config/storesync/config.json`; every
//! field has a default so a missing or partial file still works.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::cache::ReadOptions;
use crate::fallback::FallbackResolver;
use crate::retry::{RetryPolicy, DEFAULT_MAX_RETRIES, INITIAL_BACKOFF_MS, MAX_BACKOFF_MS};

/// Application name used for the config directory path
const APP_NAME: &str = "storesync";

/// Config file name
const CONFIG_FILE: &str = "config.json";

fn default_ttl_ms() -> u64 {
    300_000
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_initial_backoff_ms() -> u64 {
    INITIAL_BACKOFF_MS
}

fn default_max_backoff_ms() -> u64 {
    MAX_BACKOFF_MS
}

fn default_image_base_paths() -> Vec<String> {
    vec![
        // Remote upload storage, then the generic remote image bucket,
        // then the two local static roots the site ships with
        "https://cdn.buildtools.store/uploads".to_string(),
        "https://cdn.buildtools.store/images".to_string(),
        "/images".to_string(),
        "/static/images".to_string(),
    ]
}

fn default_placeholder_url() -> String {
    "/images/placeholder.png".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_ttl_ms")]
    pub ttl_ms: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
    #[serde(default = "default_image_base_paths")]
    pub image_base_paths: Vec<String>,
    #[serde(default = "default_placeholder_url")]
    pub placeholder_url: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            ttl_ms: default_ttl_ms(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            image_base_paths: default_image_base_paths(),
            placeholder_url: default_placeholder_url(),
        }
    }
}

impl SyncConfig {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            initial_backoff_ms: self.initial_backoff_ms,
            max_backoff_ms: self.max_backoff_ms,
        }
    }

    pub fn read_options(&self) -> ReadOptions {
        ReadOptions::with_ttl(self.ttl())
    }

    pub fn resolver(&self) -> FallbackResolver {
        FallbackResolver::new(self.image_base_paths.clone(), self.placeholder_url.clone())
    }
}

// ============================================================================
// Tests
// ============================================================================
