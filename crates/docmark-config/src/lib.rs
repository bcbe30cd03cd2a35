use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Character that introduces commands when nothing else is configured.
pub const DEFAULT_COMMAND_CHARACTER: char = '\\';

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

    #[error("Failed to parse config: {0}")]
    InlineParseError(#[from] toml::de::Error),
}

/// Comment markup settings for one deployment.
///
/// ```toml
/// command_character = "@"
///
/// [commands]
/// returns = "return"
///
/// [patterns]
/// see = '^@seealso(?:\s+|$)'
/// ```
///
/// `commands` renames a command, section or inline kind while keeping its
/// default argument syntax. `patterns` replaces the whole pattern of a kind;
/// it wins over a rename of the same kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentConfig {
    pub command_character: char,
    pub commands: BTreeMap<String, String>,
    pub patterns: BTreeMap<String, String>,
}

impl Default for CommentConfig {
    fn default() -> Self {
        Self {
            command_character: DEFAULT_COMMAND_CHARACTER,
            commands: BTreeMap::new(),
            patterns: BTreeMap::new(),
        }
    }
}

impl CommentConfig {
    pub fn with_command_character(mut self, c: char) -> Self {
        self.command_character = c;
        self
    }

    pub fn rename(mut self, kind: impl Into<String>, name: impl Into<String>) -> Self {
        self.commands.insert(kind.into(), name.into());
        self
    }

    pub fn with_pattern(mut self, kind: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.patterns.insert(kind.into(), pattern.into());
        self
    }

    /// The name a kind is spelled with in comments.
    pub fn command_name<'a>(&'a self, kind: &'a str) -> &'a str {
        self.commands.get(kind).map(String::as_str).unwrap_or(kind)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
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

        let config: CommentConfig =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

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
        let config_dir = shellexpand::tilde("~/.config/docmark");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }
}
