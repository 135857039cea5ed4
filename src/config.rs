//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/ktab/ktab.toml`
//! 3. Explicit config file passed with `--config`
//! 4. Environment variables: `KTAB_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{EngineLimits, Notation};

/// Unified configuration for ktab.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Rule applications allowed along one branch before the loop guard trips
    pub max_iterations: usize,
    /// Worlds allowed on one branch before the loop guard trips
    pub max_worlds: usize,
    /// Reuse existing worlds for modal-∃ rules
    pub blocking: bool,
    /// Run validity and satisfiability checks (and batch lines) on the rayon pool
    pub parallel: bool,
    /// Output notation for formulas
    pub notation: Notation,
}

impl Default for Settings {
    fn default() -> Self {
        let limits = EngineLimits::default();
        Self {
            max_iterations: limits.max_iterations,
            max_worlds: limits.max_worlds,
            blocking: limits.blocking,
            parallel: true,
            notation: Notation::Ascii,
        }
    }
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct RawSettings {
    pub max_iterations: Option<usize>,
    pub max_worlds: Option<usize>,
    pub blocking: Option<bool>,
    pub parallel: Option<bool>,
    pub notation: Option<Notation>,
}

/// Get the XDG config directory for ktab.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "ktab").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("ktab.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn parse_notation(value: &str) -> Result<Notation, ApplicationError> {
    match value.to_ascii_lowercase().as_str() {
        "ascii" => Ok(Notation::Ascii),
        "unicode" => Ok(Notation::Unicode),
        other => Err(ApplicationError::Config {
            message: format!("notation must be 'ascii' or 'unicode', got '{}'", other),
        }),
    }
}

impl Settings {
    /// Engine bounds handed to the domain layer.
    pub fn limits(&self) -> EngineLimits {
        EngineLimits {
            max_iterations: self.max_iterations,
            max_worlds: self.max_worlds,
            blocking: self.blocking,
        }
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            max_iterations: overlay.max_iterations.unwrap_or(self.max_iterations),
            max_worlds: overlay.max_worlds.unwrap_or(self.max_worlds),
            blocking: overlay.blocking.unwrap_or(self.blocking),
            parallel: overlay.parallel.unwrap_or(self.parallel),
            notation: overlay.notation.unwrap_or(self.notation),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - config file given on the command line; must exist
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/ktab/ktab.toml` (skipped if absent)
    /// 3. Explicit config file
    /// 4. Environment variables: `KTAB_*` prefix
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config: {}", global_path.display());
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Explicit file
        if let Some(path) = explicit {
            debug!("loading config file: {}", path.display());
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        // 4. Environment
        current = Self::apply_env_overrides(current)?;

        current.validate()?;
        Ok(current)
    }

    /// Apply KTAB_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("KTAB")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = lookup::<usize>(&config, "max_iterations")? {
            settings.max_iterations = val;
        }
        if let Some(val) = lookup::<usize>(&config, "max_worlds")? {
            settings.max_worlds = val;
        }
        if let Some(val) = lookup::<bool>(&config, "blocking")? {
            settings.blocking = val;
        }
        if let Some(val) = lookup::<bool>(&config, "parallel")? {
            settings.parallel = val;
        }
        if let Some(val) = lookup::<String>(&config, "notation")? {
            settings.notation = parse_notation(&val)?;
        }

        Ok(settings)
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        if self.max_iterations == 0 {
            return Err(ApplicationError::Config {
                message: "max_iterations must be greater than 0".to_string(),
            });
        }
        if self.max_worlds == 0 {
            return Err(ApplicationError::Config {
                message: "max_worlds must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# ktab configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/ktab/ktab.toml
#   Explicit: ktab --config <file>
#   Env:      KTAB_* environment variables (e.g. KTAB_MAX_WORLDS=64)

# Rule applications allowed along one tableau branch
# max_iterations = 10000

# Worlds allowed on one tableau branch
# max_worlds = 512

# Reuse an existing world for a modal-exists rule when it already holds
# everything a fresh successor would receive
# blocking = true

# Run the validity and satisfiability checks in parallel
# parallel = true

# "ascii" (~ & | -> [] <>) or "unicode"
# notation = "ascii"
"#
        .to_string()
    }
}

/// `Ok(None)` when the key is absent, an error when present but malformed.
fn lookup<'de, T: Deserialize<'de>>(config: &Config, key: &str) -> Result<Option<T>, ApplicationError> {
    match config.get::<T>(key) {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_converted_then_match_engine_limits() {
        let settings = Settings::default();
        assert_eq!(settings.limits(), EngineLimits::default());
        assert!(settings.parallel);
        assert_eq!(settings.notation, Notation::Ascii);
    }

    #[test]
    fn given_partial_overlay_when_merging_then_only_specified_fields_change() {
        let base = Settings::default();
        let overlay = RawSettings {
            max_worlds: Some(8),
            notation: Some(Notation::Unicode),
            ..RawSettings::default()
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.max_worlds, 8);
        assert_eq!(merged.notation, Notation::Unicode);
        assert_eq!(merged.max_iterations, base.max_iterations);
        assert_eq!(merged.blocking, base.blocking);
    }

    #[test]
    fn given_zero_ceiling_when_validating_then_config_error() {
        let settings = Settings {
            max_iterations: 0,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ApplicationError::Config { .. })
        ));
    }

    #[test]
    fn given_unknown_notation_when_parsing_then_config_error() {
        assert_eq!(parse_notation("Unicode").ok(), Some(Notation::Unicode));
        assert!(parse_notation("latex").is_err());
    }

    #[test]
    fn given_settings_when_to_toml_then_round_trips_through_raw() {
        let settings = Settings {
            max_worlds: 32,
            blocking: false,
            ..Settings::default()
        };
        let text = settings.to_toml().expect("serialize");
        let raw: RawSettings = toml::from_str(&text).expect("parse");
        assert_eq!(Settings::default().merge_with(&raw), settings);
    }
}
