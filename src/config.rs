//! Site configuration module.
//!
//! Handles loading and validating the optional `config.toml` at the content
//! root. Config files are sparse — override just the values you want:
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Documentation"   # Site title shown in page <title> and header
//! base_url = ""             # Absolute URL prefix for canonical links
//!
//! [processing]
//! max_threads = 4           # Max parallel workers (omit for auto = CPU cores)
//!
//! strict = false            # Treat warnings as build-breaking
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub site: SiteInfo,
    pub processing: ProcessingConfig,
    /// When true, any warning diagnostic fails the build.
    pub strict: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    pub title: String,
    pub base_url: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            title: "Documentation".to_string(),
            base_url: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Max parallel workers. `None` = one per CPU core.
    pub max_threads: Option<usize>,
}

impl SiteConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.processing.max_threads == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_threads must be at least 1".into(),
            ));
        }
        if !self.site.base_url.is_empty() && !self.site.base_url.starts_with("http") {
            return Err(ConfigError::Validation(
                "site.base_url must be an absolute URL".into(),
            ));
        }
        Ok(())
    }
}

/// Load `config.toml` from the content root, falling back to defaults when
/// the file doesn't exist.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let path = root.join("config.toml");
    if !path.exists() {
        return Ok(SiteConfig::default());
    }
    let content = fs::read_to_string(&path)?;
    let config: SiteConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Effective worker count: the configured cap, bounded by available cores.
/// Users can constrain down, not up.
pub fn effective_threads(processing: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    match processing.max_threads {
        Some(n) => n.clamp(1, cores),
        None => cores,
    }
}

/// A documented stock config, printed by `docweave gen-config`.
pub fn stock_config_toml() -> &'static str {
    r#"# docweave site configuration
# All options are optional - defaults shown below.

# Treat warnings (malformed metadata, quiz anomalies) as build-breaking.
strict = false

[site]
# Site title shown in the page <title> and header.
title = "Documentation"
# Absolute URL prefix used for canonical links when a page has none.
base_url = ""

[processing]
# Max parallel workers. Omit for auto (one per CPU core).
# max_threads = 4
"#
}
