use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::errors::{PrefixerError, Result};

/// Configuration file names looked up under the project root, in order
pub const CONFIG_FILE_NAMES: &[&str] = &[
    "tailwind.config.js",
    "tailwind.config.cjs",
    "tailwind.config.mjs",
    "tailwind.config.ts",
];

/// Permissive match for `prefix: 'tw-'`, `"prefix": "tw-"` or `prefix: tw`
static PREFIX_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"['"]?prefix['"]?\s*:\s*['"]?([^'"}\s]+)"#)
        .expect("prefix declaration pattern is valid")
});

/// Tailwind settings this tool cares about
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TailwindConfig {
    /// Prefix every utility class must carry; empty when none is configured
    pub prefix: String,

    /// File the settings were read from
    pub source: Option<PathBuf>,
}

impl TailwindConfig {
    /// Extract the prefix declaration from configuration text
    pub fn from_source(content: &str) -> Self {
        let prefix = PREFIX_DECLARATION
            .captures(content)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        Self {
            prefix,
            source: None,
        }
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PrefixerError::ConfigError {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        Ok(Self {
            source: Some(path.to_path_buf()),
            ..Self::from_source(&content)
        })
    }

    /// Find the Tailwind configuration under `root`.
    ///
    /// Never fails: a missing or unreadable file falls back to the empty
    /// prefix, which leaves every file unchanged.
    pub fn discover(root: &Path) -> Self {
        let Some(path) = CONFIG_FILE_NAMES
            .iter()
            .map(|name| root.join(name))
            .find(|path| path.is_file())
        else {
            tracing::warn!(
                root = %root.display(),
                "no Tailwind configuration found, continuing with an empty prefix"
            );
            return Self::default();
        };

        match Self::from_file(&path) {
            Ok(config) => {
                if config.prefix.is_empty() {
                    tracing::warn!(path = %path.display(), "no prefix declared in Tailwind configuration");
                } else {
                    tracing::info!(path = %path.display(), prefix = %config.prefix, "discovered Tailwind prefix");
                }
                config
            }
            Err(e) => {
                tracing::warn!(error = %e, "continuing with an empty prefix");
                Self::default()
            }
        }
    }
}
