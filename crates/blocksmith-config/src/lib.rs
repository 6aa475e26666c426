use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Viewport width thresholds in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Breakpoints {
    pub mobile: u32,
    pub tablet: u32,
    pub desktop: u32,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            mobile: 768,
            tablet: 1024,
            desktop: 1200,
        }
    }
}

/// Advisory text-length ceilings per card variant, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterCeilings {
    pub h4: usize,
    pub h5_short: usize,
    pub h5_long: usize,
}

impl Default for CharacterCeilings {
    fn default() -> Self {
        Self {
            h4: 45,
            h5_short: 80,
            h5_long: 200,
        }
    }
}

/// Immutable configuration handed to a block decorator.
///
/// One instance per block kind; decorators never reach for globals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockConfig {
    pub class_name_prefix: String,
    #[serde(default)]
    pub breakpoints: Breakpoints,
    #[serde(default)]
    pub character_ceilings: CharacterCeilings,
    #[serde(default = "default_animation_duration_ms")]
    pub animation_duration_ms: u64,
}

fn default_animation_duration_ms() -> u64 {
    600
}

impl BlockConfig {
    fn with_prefix(prefix: &str) -> Self {
        Self {
            class_name_prefix: prefix.to_string(),
            breakpoints: Breakpoints::default(),
            character_ceilings: CharacterCeilings::default(),
            animation_duration_ms: default_animation_duration_ms(),
        }
    }

    /// Defaults for the Facts and Figures card grid.
    pub fn facts_figures_cards() -> Self {
        Self::with_prefix("facts-figures-cards")
    }

    /// Defaults for the Hero Teaser banner.
    pub fn hero_teaser() -> Self {
        Self::with_prefix("hero-teaser")
    }

    /// CSS class derived from the prefix, e.g. `hero-teaser-content`.
    pub fn class(&self, suffix: &str) -> String {
        format!("{}-{}", self.class_name_prefix, suffix)
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: BlockConfig =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from_path(Self::config_path())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/blocksmith");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }
}
