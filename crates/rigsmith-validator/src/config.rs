//! # Validator Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     RIGSMITH_HEADROOM_PERCENT=25                                       │
//! │     RIGSMITH_REPOSITORY_TIMEOUT_MS=500                                 │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/rigsmith/validator.toml (Linux)                          │
//! │     ~/Library/Application Support/com.rigsmith.rigsmith/... (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     20% headroom, 2 s repository timeout, auto-detect on               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [engine]
//! headroom_percent = 20
//! auto_detect = true
//! min_detection_confidence = 0.5
//! profiles_path = "/etc/rigsmith/profiles.toml"
//!
//! [repository]
//! timeout_ms = 2000
//! database_path = "/var/lib/rigsmith/catalog.db"
//! ```

use rigsmith_core::power::DEFAULT_HEADROOM_PERCENT;
use rigsmith_core::tags::{ComponentProfile, TagRegistry};
use rigsmith_core::PowerPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{ValidatorError, ValidatorResult};

/// Upper bound accepted for `headroom_percent`.
pub const MAX_HEADROOM_PERCENT: u32 = 200;

// =============================================================================
// Engine Settings
// =============================================================================

/// How the engine evaluates a configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Safety margin added to the estimated draw.
    #[serde(default = "default_headroom")]
    pub headroom_percent: u32,

    /// Fall back to name/title detection when a category has no stored tags.
    #[serde(default = "default_true")]
    pub auto_detect: bool,

    /// Minimum detection confidence for `auto_detect` to adopt a profile.
    #[serde(default = "default_min_confidence")]
    pub min_detection_confidence: f64,

    /// TOML file replacing the built-in profiles.
    #[serde(default)]
    pub profiles_path: Option<PathBuf>,
}

fn default_headroom() -> u32 {
    DEFAULT_HEADROOM_PERCENT
}

fn default_true() -> bool {
    true
}

fn default_min_confidence() -> f64 {
    0.5
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            headroom_percent: default_headroom(),
            auto_detect: true,
            min_detection_confidence: default_min_confidence(),
            profiles_path: None,
        }
    }
}

// =============================================================================
// Repository Settings
// =============================================================================

/// Catalog access settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositorySettings {
    /// Budget for each individual repository read.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// SQLite catalog. Without one the validator runs on an in-memory catalog.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

fn default_timeout_ms() -> u64 {
    2_000
}

impl Default for RepositorySettings {
    fn default() -> Self {
        RepositorySettings {
            timeout_ms: default_timeout_ms(),
            database_path: None,
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete validator configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    #[serde(default)]
    pub engine: EngineSettings,

    #[serde(default)]
    pub repository: RepositorySettings,
}

/// On-disk layout of a profiles file: a list of `[[profiles]]` tables.
#[derive(Debug, Deserialize)]
struct ProfileFile {
    profiles: Vec<ComponentProfile>,
}

impl ValidatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (validator.toml)
    /// 3. Environment variables
    ///
    /// ## Errors
    /// `ConfigLoadFailed` for an unreadable or malformed file,
    /// `InvalidConfig` when the merged values don't pass [`Self::validate`].
    pub fn load(config_path: Option<PathBuf>) -> ValidatorResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading validator config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load validator config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ValidatorResult<()> {
        if self.engine.headroom_percent > MAX_HEADROOM_PERCENT {
            return Err(ValidatorError::InvalidConfig(format!(
                "headroom_percent must be at most {}, got {}",
                MAX_HEADROOM_PERCENT, self.engine.headroom_percent
            )));
        }

        let confidence = self.engine.min_detection_confidence;
        if !(0.0..=1.0).contains(&confidence) {
            return Err(ValidatorError::InvalidConfig(format!(
                "min_detection_confidence must be between 0 and 1, got {}",
                confidence
            )));
        }

        if self.repository.timeout_ms == 0 {
            return Err(ValidatorError::InvalidConfig(
                "timeout_ms must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `RIGSMITH_*` overrides read through `lookup`.
    ///
    /// Unparseable values are ignored with a warning.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup("RIGSMITH_HEADROOM_PERCENT") {
            match raw.trim().parse::<u32>() {
                Ok(percent) => {
                    debug!(percent, "Overriding headroom from environment");
                    self.engine.headroom_percent = percent;
                }
                Err(_) => warn!(value = %raw, "Ignoring invalid RIGSMITH_HEADROOM_PERCENT"),
            }
        }

        if let Some(raw) = lookup("RIGSMITH_REPOSITORY_TIMEOUT_MS") {
            match raw.trim().parse::<u64>() {
                Ok(ms) => {
                    debug!(timeout_ms = ms, "Overriding repository timeout from environment");
                    self.repository.timeout_ms = ms;
                }
                Err(_) => warn!(value = %raw, "Ignoring invalid RIGSMITH_REPOSITORY_TIMEOUT_MS"),
            }
        }

        if let Some(raw) = lookup("RIGSMITH_AUTO_DETECT") {
            match raw.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.engine.auto_detect = true,
                "0" | "false" | "no" | "off" => self.engine.auto_detect = false,
                _ => warn!(value = %raw, "Ignoring invalid RIGSMITH_AUTO_DETECT"),
            }
        }

        if let Some(raw) = lookup("RIGSMITH_MIN_DETECTION_CONFIDENCE") {
            match raw.trim().parse::<f64>() {
                Ok(confidence) => self.engine.min_detection_confidence = confidence,
                Err(_) => warn!(value = %raw, "Ignoring invalid RIGSMITH_MIN_DETECTION_CONFIDENCE"),
            }
        }

        if let Some(path) = lookup("RIGSMITH_PROFILES_PATH") {
            debug!(path = %path, "Overriding profiles path from environment");
            self.engine.profiles_path = Some(PathBuf::from(path));
        }

        if let Some(path) = lookup("RIGSMITH_DATABASE_PATH") {
            self.repository.database_path = Some(PathBuf::from(path));
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "rigsmith", "rigsmith")
            .map(|dirs| dirs.config_dir().join("validator.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn power_policy(&self) -> PowerPolicy {
        PowerPolicy {
            headroom_percent: self.engine.headroom_percent,
        }
    }

    pub fn repository_timeout(&self) -> Duration {
        Duration::from_millis(self.repository.timeout_ms)
    }

    /// Builds the tag registry: the profiles file when configured, the
    /// built-in profiles otherwise.
    ///
    /// ## Errors
    /// `ProfileLoadFailed` for an unreadable or malformed file, `Core` when
    /// the profiles don't form a valid registry.
    pub fn load_registry(&self) -> ValidatorResult<TagRegistry> {
        match &self.engine.profiles_path {
            Some(path) => {
                let profiles = read_profiles(path)?;
                info!(?path, count = profiles.len(), "Loaded custom profiles");
                Ok(TagRegistry::from_profiles(profiles)?)
            }
            None => Ok(TagRegistry::builtin()?),
        }
    }
}

fn read_profiles(path: &Path) -> ValidatorResult<Vec<ComponentProfile>> {
    let failed = |reason: String| ValidatorError::ProfileLoadFailed {
        path: path.display().to_string(),
        reason,
    };
    let contents = std::fs::read_to_string(path).map_err(|e| failed(e.to_string()))?;
    let file: ProfileFile = toml::from_str(&contents).map_err(|e| failed(e.to_string()))?;
    Ok(file.profiles)
}
