//! Configuration management for cstidy.
//!
//! This module provides the [`Config`] struct which controls all formatting
//! behavior. Configuration can be loaded from:
//! - TOML files (`cstidy.toml`)
//! - CLI arguments (which override file settings)
//! - In-file directives (`// cstidy: --order "System Microsoft"`)
//!
//! Config files are auto-discovered by searching parent directories from the
//! file being formatted up to the filesystem root, plus the user's home
//! directory.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Config file names to search for (in order of priority, later overrides earlier)
const CONFIG_FILE_NAMES: &[&str] = &["cstidy.toml"];

/// A plausible namespace-prefix token: identifier segments joined by dots
static ORDER_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$")
        .unwrap_or_else(|_| panic!("Invalid order token pattern"))
});

/// Get the user's home directory
fn dirs_home() -> Option<PathBuf> {
    // Try HOME environment variable first (works on Unix and some Windows setups)
    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home));
    }
    // Fallback for Windows
    if let Ok(userprofile) = std::env::var("USERPROFILE") {
        return Some(PathBuf::from(userprofile));
    }
    None
}

// Serde default functions
fn default_true() -> bool {
    true
}
fn default_order() -> String {
    "System".to_string()
}

/// Main configuration struct for cstidy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Sort, deduplicate and group using directives (default: true)
    #[serde(default = "default_true")]
    pub sort_usings: bool,

    /// Space-separated namespace priority list, highest priority first
    /// (default: "System")
    #[serde(default = "default_order")]
    pub usings_order: String,

    /// Insert blank-line separators between using groups that share a
    /// top-level namespace segment (default: true)
    #[serde(default = "default_true")]
    pub split_groups: bool,
}

/// Partial configuration for TOML parsing
///
/// All fields are `Option<T>` so we can distinguish between
/// "explicitly set" and "not specified" when merging configs.
#[derive(Debug, Clone, Default, Deserialize)]
struct PartialConfig {
    pub sort_usings: Option<bool>,
    pub usings_order: Option<String>,
    pub split_groups: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            sort_usings: true,
            usings_order: "System".to_string(),
            split_groups: true,
        }
    }
}

impl Config {
    /// Maximum reasonable length of the order list
    const MAX_ORDER_LEN: usize = 4096;

    /// Validate configuration values are within reasonable bounds
    ///
    /// Returns an error message if validation fails, None if valid.
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        if self.usings_order.len() > Self::MAX_ORDER_LEN {
            return Some(format!(
                "usings_order length {} exceeds maximum of {}",
                self.usings_order.len(),
                Self::MAX_ORDER_LEN
            ));
        }
        for token in self.usings_order.split_whitespace() {
            if !ORDER_TOKEN_RE.is_match(token) {
                return Some(format!("invalid namespace prefix in usings_order: {token}"));
            }
        }
        None
    }

    /// Resolve the effective namespace priority list
    ///
    /// An empty order falls back to `System`. This is computed up front so
    /// the pipeline never mutates caller-owned configuration.
    #[must_use]
    pub fn effective_order(&self) -> Vec<String> {
        let order: Vec<String> = self
            .usings_order
            .split_whitespace()
            .map(ToString::to_string)
            .collect();
        if order.is_empty() {
            vec!["System".to_string()]
        } else {
            order
        }
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let partial: PartialConfig = toml::from_str(&contents)?;
        let mut config = Self::default();
        config.apply_partial(&partial);
        Ok(config)
    }

    /// Apply a partial config, only overriding fields that are explicitly set
    fn apply_partial(&mut self, partial: &PartialConfig) {
        if let Some(v) = partial.sort_usings {
            self.sort_usings = v;
        }
        if let Some(v) = &partial.usings_order {
            self.usings_order.clone_from(v);
        }
        if let Some(v) = partial.split_groups {
            self.split_groups = v;
        }
    }

    /// Discover config files from parent directories of a given path
    ///
    /// Searches from the file's directory up to the root, then adds home
    /// directory config. Returns list of config file paths in order of
    /// priority (least specific first).
    #[must_use]
    pub fn discover_config_files(start_path: &Path) -> Vec<PathBuf> {
        let mut config_files = Vec::new();

        // Add home directory config first (lowest priority)
        if let Some(home) = dirs_home() {
            for config_name in CONFIG_FILE_NAMES {
                let home_config = home.join(config_name);
                if home_config.is_file() {
                    config_files.push(home_config);
                }
            }
        }

        // Start from the file's parent directory (or the path itself if it's a directory)
        let start_dir = if start_path.is_file() {
            start_path.parent().map(Path::to_path_buf)
        } else if start_path.is_dir() {
            Some(start_path.to_path_buf())
        } else {
            // Path doesn't exist, use current directory
            std::env::current_dir().ok()
        };

        // Collect config files from parent directories (from root to current)
        if let Some(dir) = start_dir {
            let mut ancestors: Vec<PathBuf> = dir.ancestors().map(Path::to_path_buf).collect();
            // Reverse so we go from root to current (less specific to more specific)
            ancestors.reverse();

            for ancestor in ancestors {
                for config_name in CONFIG_FILE_NAMES {
                    let config_path = ancestor.join(config_name);
                    if config_path.is_file() && !config_files.contains(&config_path) {
                        config_files.push(config_path);
                    }
                }
            }
        }

        config_files
    }

    /// Load and merge configuration from discovered config files
    ///
    /// Later files override earlier ones (only explicitly set values).
    /// Returns default config if no files found.
    #[must_use]
    pub fn from_discovered_files(start_path: &Path) -> Self {
        let config_files = Self::discover_config_files(start_path);

        if config_files.is_empty() {
            return Self::default();
        }

        let mut config = Self::default();
        for path in &config_files {
            match std::fs::read_to_string(path) {
                Ok(contents) => match toml::from_str::<PartialConfig>(&contents) {
                    Ok(partial) => config.apply_partial(&partial),
                    Err(e) => eprintln!("Warning: failed to parse {}: {e}", path.display()),
                },
                Err(e) => eprintln!("Warning: failed to read {}: {e}", path.display()),
            }
        }
        config
    }
}
