use livemark_engine::editing::DEFAULT_MIN_COVERAGE;
use livemark_engine::parsing::DEFAULT_MAX_INCREMENTAL_WINDOW_CHARS;
use livemark_engine::{ParserOptions, SessionOptions};
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

    #[error("Invalid min_coverage {0}: must be between 0 and 1")]
    InvalidCoverage(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Reparse windows longer than this fall back to a full parse.
    pub max_incremental_window_chars: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_incremental_window_chars: DEFAULT_MAX_INCREMENTAL_WINDOW_CHARS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub min_coverage: f64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            min_coverage: DEFAULT_MIN_COVERAGE,
        }
    }
}

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `env_logger` filter used when `RUST_LOG` is not set.
    pub log_level: String,
    pub parser: ParserConfig,
    pub identity: IdentityConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            parser: ParserConfig::default(),
            identity: IdentityConfig::default(),
        }
    }
}

impl Config {
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

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;
        config.validate()?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/livemark");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Resolves a path given on the command line or in the environment,
    /// expanding `~` and `$VARS`.
    pub fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let coverage = self.identity.min_coverage;
        if !(0.0..=1.0).contains(&coverage) {
            return Err(ConfigError::InvalidCoverage(coverage));
        }
        Ok(())
    }

    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions {
            max_incremental_window_chars: self.parser.max_incremental_window_chars,
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            min_coverage: self.identity.min_coverage,
        }
    }
}
