use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::builders::patterns::{IgnoreSet, MarkerBlock, MarkerSettings};
use crate::builders::validator::{ConfigValidator, StandardValidator};

/// File name looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "copyright-strip.toml";

/// Roots scanned when neither the command line nor the config names any.
pub const DEFAULT_ROOTS: &[&str] = &["cmd", "internal", "deploy"];

/// What the engine does when a single file cannot be read or written.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop the whole run at the first failure.
    Abort,
    /// Record the failure, give up on the current root and move to the next one.
    #[default]
    SkipRoot,
    /// Record the failure and carry on with the next file.
    SkipFile,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Abort => write!(f, "abort"),
            FailurePolicy::SkipRoot => write!(f, "skip-root"),
            FailurePolicy::SkipFile => write!(f, "skip-file"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GlobalSettings {
    pub failure_policy: FailurePolicy,
    pub dry_run: bool,
    pub verbose: bool,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::SkipRoot,
            dry_run: false,
            verbose: false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StripperConfig {
    pub version: String,
    /// Directories scanned, in order.
    pub roots: Vec<PathBuf>,
    /// Base names left alone. Empty means the built-in list.
    #[serde(default)]
    pub ignored: Vec<String>,
    #[serde(default)]
    pub markers: MarkerSettings,
    #[serde(default)]
    pub global_settings: GlobalSettings,
}

impl Default for StripperConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            roots: DEFAULT_ROOTS.iter().map(PathBuf::from).collect(),
            ignored: Vec::new(),
            markers: MarkerSettings::default(),
            global_settings: GlobalSettings::default(),
        }
    }
}

impl StripperConfig {
    pub fn ignore_set(&self) -> IgnoreSet {
        IgnoreSet::new(self.ignored.iter().cloned())
    }

    pub fn marker_block(&self) -> Result<MarkerBlock> {
        MarkerBlock::from_settings(&self.markers).context("Invalid marker configuration")
    }
}

/// Serialization format of a configuration file, chosen from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ConfigFormat {
    #[default]
    Toml,
    Json,
    Yaml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => ConfigFormat::Json,
            Some("yaml") | Some("yml") => ConfigFormat::Yaml,
            _ => ConfigFormat::Toml,
        }
    }

    pub fn render(self, config: &StripperConfig) -> Result<String> {
        match self {
            ConfigFormat::Json => {
                serde_json::to_string_pretty(config).context("Failed to serialize to JSON")
            }
            ConfigFormat::Yaml => {
                serde_yaml::to_string(config).context("Failed to serialize to YAML")
            }
            ConfigFormat::Toml => {
                toml::to_string_pretty(config).context("Failed to serialize to TOML")
            }
        }
    }

    pub fn parse(self, content: &str) -> Result<StripperConfig> {
        match self {
            ConfigFormat::Json => serde_json::from_str(content).context("Failed to parse JSON config"),
            ConfigFormat::Yaml => serde_yaml::from_str(content).context("Failed to parse YAML config"),
            ConfigFormat::Toml => toml::from_str(content).context("Failed to parse TOML config"),
        }
    }
}

pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Uses `copyright-strip.toml` in the current working directory.
    pub fn new() -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to resolve current directory")?;
        Ok(Self::new_at(current_dir))
    }

    /// Uses `copyright-strip.toml` inside `dir`.
    pub fn new_at(dir: impl AsRef<Path>) -> Self {
        Self {
            config_path: dir.as_ref().join(CONFIG_FILE_NAME),
        }
    }

    /// Uses an explicit config file. Its extension selects the format.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
        }
    }

    /// Writes the default configuration unless a file is already present.
    /// Returns `true` when a new file was written.
    pub fn initialize(&self) -> Result<bool> {
        if self.config_path.exists() {
            return Ok(false);
        }

        self.save_config(&StripperConfig::default())?;
        Ok(true)
    }

    pub fn validate_config(&self) -> Result<Vec<String>> {
        let config = self.load_config()?;
        StandardValidator::new().validate_config(&config)
    }

    pub fn export_config(&self, format: ConfigFormat) -> Result<String> {
        let config = self.load_config()?;
        format.render(&config)
    }

    fn format(&self) -> ConfigFormat {
        ConfigFormat::from_path(&self.config_path)
    }
}

pub trait ConfigProvider {
    fn load_config(&self) -> Result<StripperConfig>;
    fn save_config(&self, config: &StripperConfig) -> Result<()>;
    fn get_config_path(&self) -> &Path;
}

impl ConfigProvider for ConfigManager {
    fn load_config(&self) -> Result<StripperConfig> {
        if !self.config_path.exists() {
            return Ok(StripperConfig::default());
        }

        let content = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file {}", self.config_path.display())
        })?;

        self.format().parse(&content)
    }

    fn save_config(&self, config: &StripperConfig) -> Result<()> {
        let content = self.format().render(config)?;

        fs::write(&self.config_path, content).with_context(|| {
            format!("Failed to write config file {}", self.config_path.display())
        })?;

        Ok(())
    }

    fn get_config_path(&self) -> &Path {
        &self.config_path
    }
}
