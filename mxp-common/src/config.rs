//! Bootstrap configuration loading
//!
//! Settings resolve in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Steps 1 and 2 are handled by each service's CLI parser; this module owns
//! the TOML layer and the compiled defaults.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::{Error, Result};

/// Config file name looked up under the platform config directory
pub const CONFIG_FILE_NAME: &str = "mxp-ex.toml";

/// TOML configuration file contents
///
/// Every field is optional; absent values fall through to compiled defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub analyzer: AnalyzerConfig,
    pub logging: LoggingConfig,
    /// Prompt template overrides keyed by `"<media>.<prompt>"`
    pub prompts: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: Option<u16>,
    pub bind: Option<String>,
    pub media_dir: Option<PathBuf>,
    pub cors_origins: Option<Vec<String>>,
    /// Upload size limit in MiB
    pub max_upload_mb: Option<u64>,
}

/// Text-generation backend settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub timeout_secs: Option<u64>,
    /// Upper bound on concurrent generation calls per request
    pub max_concurrent: Option<usize>,
}

/// External analyzer and scanner endpoints
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub url: Option<String>,
    pub scanner_url: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    pub level: Option<String>,
}

/// Compiled defaults used when nothing else provides a value
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub port: u16,
    pub bind: String,
    pub media_dir: PathBuf,
    pub cors_origins: Vec<String>,
    pub max_upload_mb: u64,
    pub backend_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub max_concurrent: usize,
    pub analyzer_url: String,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            port: 5730,
            bind: "127.0.0.1".to_string(),
            media_dir: default_data_dir().join("media"),
            cors_origins: vec!["http://localhost:8080".to_string()],
            max_upload_mb: 512,
            backend_url: "http://localhost:11434/v1".to_string(),
            model: "llama3.1:8b".to_string(),
            temperature: 0.7,
            timeout_secs: 60,
            max_concurrent: 8,
            analyzer_url: "http://127.0.0.1:5731/analyze".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// OS-dependent data directory for MXP
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("mxp"))
        .unwrap_or_else(|| PathBuf::from("./mxp_data"))
}

/// Default config file location (`<config dir>/mxp/mxp-ex.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("mxp").join(CONFIG_FILE_NAME))
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config = toml::from_str(&content)?;
    Ok(config)
}

/// Where the bootstrap TOML layer came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this file
    File(PathBuf),
    /// No file at the default location; compiled defaults apply
    MissingFile(PathBuf),
    /// Platform config directory unknown; compiled defaults apply
    NoConfigDir,
}

impl ConfigSource {
    /// Report the outcome through `tracing`
    ///
    /// Loading happens before the subscriber exists, so callers log the
    /// outcome once logging is initialized.
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => info!("Loaded config from {}", path.display()),
            ConfigSource::MissingFile(path) => warn!(
                "Config file not found at {}, using defaults",
                path.display()
            ),
            ConfigSource::NoConfigDir => {
                warn!("Could not determine config directory, using defaults")
            }
        }
    }
}

/// TOML layer together with its origin
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: TomlConfig,
    pub source: ConfigSource,
}

/// Load the config file, degrading to defaults when it is missing
///
/// An explicitly requested file that is missing or unreadable is an error;
/// a missing file at the default location degrades to defaults.
pub fn load_or_default(explicit: Option<&Path>) -> Result<LoadedConfig> {
    load_with_fallback(explicit, default_config_path())
}

/// [`load_or_default`] with the default location supplied by the caller
pub fn load_with_fallback(
    explicit: Option<&Path>,
    default_path: Option<PathBuf>,
) -> Result<LoadedConfig> {
    let path = match (explicit, default_path) {
        (Some(path), _) => path.to_path_buf(),
        (None, Some(path)) if path.exists() => path,
        (None, Some(path)) => {
            return Ok(LoadedConfig {
                config: TomlConfig::default(),
                source: ConfigSource::MissingFile(path),
            })
        }
        (None, None) => {
            return Ok(LoadedConfig {
                config: TomlConfig::default(),
                source: ConfigSource::NoConfigDir,
            })
        }
    };

    Ok(LoadedConfig {
        config: load_toml_config(&path)?,
        source: ConfigSource::File(path),
    })
}
