use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub colors: ColorsConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Style strings per label, e.g. `"bold magenta"` or `"#ff8800 on black"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorsConfig {
    #[serde(default = "default_ascii_art_style")]
    pub ascii_art: String,
    #[serde(default = "default_title_style")]
    pub title: String,
    #[serde(default = "default_metric_style")]
    pub memory: String,
    #[serde(default = "default_metric_style")]
    pub disk: String,
    #[serde(default = "default_metric_style")]
    pub temp: String,
    #[serde(default = "default_network_style")]
    pub ip: String,
    #[serde(default = "default_network_style")]
    pub tcp: String,
    #[serde(default = "default_value_style")]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_true")]
    pub show_uptime: bool,
    #[serde(default = "default_true")]
    pub show_load: bool,
    #[serde(default = "default_true")]
    pub show_memory: bool,
    #[serde(default = "default_true")]
    pub show_disk: bool,
    #[serde(default = "default_true")]
    pub show_temp: bool,
    #[serde(default = "default_true")]
    pub show_ip: bool,
    #[serde(default = "default_true")]
    pub show_tcp: bool,
    #[serde(default)]
    pub expand_ascii: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_ascii_art_path")]
    pub ascii_art: String,
}

pub const DEFAULT_DATE_FORMAT: &str = "%a %d %b %Y | %H:%M:%S";

fn default_ascii_art_style() -> String {
    "bold magenta".to_string()
}

fn default_title_style() -> String {
    "bold blue".to_string()
}

fn default_metric_style() -> String {
    "bold cyan".to_string()
}

fn default_network_style() -> String {
    "bold green".to_string()
}

fn default_value_style() -> String {
    "white".to_string()
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_true() -> bool {
    true
}

fn default_ascii_art_path() -> String {
    Config::config_dir().join("ascii.txt").display().to_string()
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            ascii_art: default_ascii_art_style(),
            title: default_title_style(),
            memory: default_metric_style(),
            disk: default_metric_style(),
            temp: default_metric_style(),
            ip: default_network_style(),
            tcp: default_network_style(),
            value: default_value_style(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            show_uptime: true,
            show_load: true,
            show_memory: true,
            show_disk: true,
            show_temp: true,
            show_ip: true,
            show_tcp: true,
            expand_ascii: false,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            ascii_art: default_ascii_art_path(),
        }
    }
}

impl PathsConfig {
    /// The art path with a leading `~` resolved against the home directory.
    pub fn ascii_art_path(&self) -> PathBuf {
        expand_tilde(&self.ascii_art)
    }
}

impl Config {
    /// Loads the config from the canonical path, writing the defaults there
    /// first if no file exists yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            let config = Self::default();
            config.save_to(path)?;
            tracing::debug!("Wrote default config to {}", path.display());
            Ok(config)
        }
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("riceshine")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Makes sure a config file exists at `path` without parsing it.
    /// Returns `true` when a fresh default file was written.
    pub fn ensure_file(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        Self::default().save_to(path)?;
        Ok(true)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }
}

fn expand_tilde(raw: &str) -> PathBuf {
    let rest = match raw.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') => rest,
        _ => return PathBuf::from(raw),
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest.trim_start_matches(['/', '\\'])),
        None => PathBuf::from(raw),
    }
}
