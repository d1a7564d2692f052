//! Server configuration.
//!
//! Loaded once at startup from a YAML file and shared read-only for the
//! lifetime of the process. Every key is optional:
//!
//! ```yaml
//! port: 8080
//! root: ~/www/lab/html/
//! default_page: index.html
//! max_workers: 10
//! host: 0.0.0.0
//! ```

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "LANTERN_CONFIG";

/// Config file used when `LANTERN_CONFIG` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "lantern.yaml";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Absolute directory all served files must live under.
    pub root_directory: PathBuf,
    /// Served when the request path is empty.
    pub default_page: String,
    /// Number of connections handled concurrently.
    pub max_workers: usize,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_root")]
    root: String,
    #[serde(default = "default_page")]
    default_page: String,
    #[serde(default = "default_max_workers")]
    max_workers: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_root() -> String {
    "~/www/lab/html/".to_string()
}

fn default_page() -> String {
    "index.html".to_string()
}

fn default_max_workers() -> usize {
    10
}

impl ServerConfig {
    /// Loads the file named by `LANTERN_CONFIG`, or `lantern.yaml`.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::from_file(path)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&text)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Parses YAML text. An empty document yields the defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let raw: RawConfig = if text.trim().is_empty() {
            serde_yaml::from_str("{}")?
        } else {
            serde_yaml::from_str(text)?
        };

        let root_directory = expand_home(&raw.root)?;
        if !root_directory.is_absolute() {
            bail!("root must be an absolute path, got {:?}", raw.root);
        }
        if raw.max_workers == 0 {
            bail!("max_workers must be at least 1");
        }
        if raw.default_page.is_empty() {
            bail!("default_page must not be empty");
        }

        Ok(Self {
            host: raw.host,
            port: raw.port,
            root_directory,
            default_page: raw.default_page,
            max_workers: raw.max_workers,
        })
    }

    /// The `host:port` pair the listener binds to.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn expand_home(root: &str) -> Result<PathBuf> {
    match root.strip_prefix('~') {
        Some(rest) => {
            let home = std::env::var("HOME").context("root uses `~` but HOME is not set")?;
            Ok(PathBuf::from(home).join(rest.trim_start_matches('/')))
        }
        None => Ok(PathBuf::from(root)),
    }
}
