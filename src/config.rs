//! Configuration for a discovery workspace.
//!
//! A [`DiscoveryConfig`] describes where component and sample files live,
//! where the version registry is, how long the in-memory caches stay fresh,
//! and which analyzer strategy to use. It can be loaded from a TOML file
//! (`docscope.toml`) or built directly for a project root.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::analysis::AnalyzerStrategy;

/// Default cache expiry window in seconds (5 minutes).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the config file from disk.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    /// A value was parsed but is not usable.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result type alias for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings for one discovery workspace.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryConfig {
    /// Project root containing the component sources and the registry.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Component source directory, relative to `root`.
    #[serde(default = "default_components_dir")]
    pub components_dir: PathBuf,

    /// Sample directory. Relative paths resolve against `root`; when unset
    /// the sibling `playground/src/samples` directory is used.
    #[serde(default)]
    pub samples_dir: Option<PathBuf>,

    /// Version registry JSON file, relative to `root`.
    #[serde(default = "default_registry_path")]
    pub registry_path: PathBuf,

    /// Cache expiry window in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Which analyzer implementation to run over source files.
    #[serde(default)]
    pub analyzer: AnalyzerStrategy,

    /// Module specifiers (or prefixes) that belong to the design system.
    #[serde(default = "default_ui_kit_modules")]
    pub ui_kit_modules: Vec<String>,

    /// Optional JSON catalog replacing the built-in description/tag table.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_components_dir() -> PathBuf {
    PathBuf::from("src/components")
}

fn default_registry_path() -> PathBuf {
    PathBuf::from("component-versions.json")
}

fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

fn default_ui_kit_modules() -> Vec<String> {
    vec!["@/components/ui".to_string(), "@ui-kit/react".to_string()]
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            components_dir: default_components_dir(),
            samples_dir: None,
            registry_path: default_registry_path(),
            cache_ttl_secs: default_cache_ttl_secs(),
            analyzer: AnalyzerStrategy::default(),
            ui_kit_modules: default_ui_kit_modules(),
            catalog_path: None,
        }
    }
}

impl DiscoveryConfig {
    /// Creates a default configuration rooted at `root`.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Loads and validates a TOML config file.
    ///
    /// A relative `root` inside the file is resolved against the file's
    /// directory.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let mut config = Self::from_toml_str(&content)?;
        if config.root.is_relative() {
            if let Some(parent) = path.parent() {
                config.root = parent.join(&config.root);
            }
        }
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: DiscoveryConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that deserialize fine but cannot be used.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.cache_ttl_secs == 0 {
            return Err(ConfigError::Invalid(
                "cache_ttl_secs must be > 0".to_string(),
            ));
        }
        if self.ui_kit_modules.iter().any(|m| m.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "ui_kit_modules must not contain empty entries".to_string(),
            ));
        }
        Ok(())
    }

    /// Sets the cache expiry window.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl_secs = ttl.as_secs().max(1);
        self
    }

    /// Sets the sample directory.
    pub fn with_samples_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.samples_dir = Some(dir.into());
        self
    }

    /// Selects the analyzer strategy.
    pub fn with_analyzer(mut self, strategy: AnalyzerStrategy) -> Self {
        self.analyzer = strategy;
        self
    }

    /// Cache expiry window as a [`Duration`].
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Absolute component source directory.
    pub fn components_path(&self) -> PathBuf {
        self.root.join(&self.components_dir)
    }

    /// Absolute sample directory.
    pub fn samples_path(&self) -> PathBuf {
        match &self.samples_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => self.root.join(dir),
            None => self.root.join("..").join("playground/src/samples"),
        }
    }

    /// Absolute path of the version registry file.
    pub fn registry_file(&self) -> PathBuf {
        if self.registry_path.is_absolute() {
            self.registry_path.clone()
        } else {
            self.root.join(&self.registry_path)
        }
    }

    /// Absolute path of the custom catalog, if one is configured.
    pub fn catalog_file(&self) -> Option<PathBuf> {
        self.catalog_path.as_ref().map(|p| {
            if p.is_absolute() {
                p.clone()
            } else {
                self.root.join(p)
            }
        })
    }
}
