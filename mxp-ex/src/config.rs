//! Service configuration resolution for mxp-ex
//!
//! **Priority:** CLI flag → environment variable → TOML file → compiled default.
//! Flag and environment handling come from clap; the TOML layer and defaults
//! come from `mxp_common::config`.

use clap::Parser;
use mxp_common::config::{CompiledDefaults, TomlConfig};
use mxp_common::{Error, PromptTemplates, Result};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::services::GeneratorConfig;

/// Command-line arguments for mxp-ex
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "mxp-ex")]
#[command(about = "Media explainability microservice")]
#[command(version)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "MXP_PORT")]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "MXP_BIND")]
    pub bind: Option<String>,

    /// TOML config file
    #[arg(short, long, env = "MXP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Folder uploads are stored in and served from
    #[arg(long, env = "MXP_MEDIA_DIR")]
    pub media_dir: Option<PathBuf>,

    /// Text-generation backend base URL (OpenAI-compatible)
    #[arg(long, env = "MXP_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Model identifier sent to the backend
    #[arg(long, env = "MXP_MODEL")]
    pub model: Option<String>,

    /// Media analyzer endpoint
    #[arg(long, env = "MXP_ANALYZER_URL")]
    pub analyzer_url: Option<String>,

    /// Authenticity scanner endpoint (omit to use the catalog vote)
    #[arg(long, env = "MXP_SCANNER_URL")]
    pub scanner_url: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub listen_addr: SocketAddr,
    pub media_dir: PathBuf,
    pub cors_origins: Vec<String>,
    pub max_upload_bytes: usize,
    pub generator: GeneratorConfig,
    pub max_concurrent: usize,
    pub analyzer_url: String,
    pub scanner_url: Option<String>,
    pub log_level: String,
    pub templates: PromptTemplates,
}

impl ServiceConfig {
    pub fn resolve(args: &Args, toml: &TomlConfig) -> Result<Self> {
        let defaults = CompiledDefaults::for_current_platform();

        let port = args.port.or(toml.server.port).unwrap_or(defaults.port);
        let bind = args
            .bind
            .clone()
            .or_else(|| toml.server.bind.clone())
            .unwrap_or(defaults.bind);
        let ip: IpAddr = bind
            .parse()
            .map_err(|e| Error::Config(format!("Invalid bind address '{}': {}", bind, e)))?;

        let temperature = toml.backend.temperature.unwrap_or(defaults.temperature);
        if !(0.0..=2.0).contains(&temperature) {
            return Err(Error::Config(format!(
                "backend.temperature must be within 0.0-2.0, got {}",
                temperature
            )));
        }

        let timeout_secs = toml.backend.timeout_secs.unwrap_or(defaults.timeout_secs);
        if timeout_secs == 0 {
            return Err(Error::Config("backend.timeout_secs must be positive".to_string()));
        }

        let max_upload_mb = toml.server.max_upload_mb.unwrap_or(defaults.max_upload_mb);

        Ok(Self {
            listen_addr: SocketAddr::new(ip, port),
            media_dir: args
                .media_dir
                .clone()
                .or_else(|| toml.server.media_dir.clone())
                .unwrap_or(defaults.media_dir),
            cors_origins: toml
                .server
                .cors_origins
                .clone()
                .unwrap_or(defaults.cors_origins),
            max_upload_bytes: (max_upload_mb as usize).saturating_mul(1024 * 1024),
            generator: GeneratorConfig {
                base_url: args
                    .backend_url
                    .clone()
                    .or_else(|| toml.backend.base_url.clone())
                    .unwrap_or(defaults.backend_url),
                model: args
                    .model
                    .clone()
                    .or_else(|| toml.backend.model.clone())
                    .unwrap_or(defaults.model),
                temperature,
                timeout: Duration::from_secs(timeout_secs),
            },
            max_concurrent: toml
                .backend
                .max_concurrent
                .unwrap_or(defaults.max_concurrent)
                .max(1),
            analyzer_url: args
                .analyzer_url
                .clone()
                .or_else(|| toml.analyzer.url.clone())
                .unwrap_or(defaults.analyzer_url),
            scanner_url: args
                .scanner_url
                .clone()
                .or_else(|| toml.analyzer.scanner_url.clone()),
            log_level: toml.logging.level.clone().unwrap_or(defaults.log_level),
            templates: PromptTemplates::with_overrides(&toml.prompts)?,
        })
    }
}
