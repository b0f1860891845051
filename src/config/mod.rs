mod file_config;

pub use file_config::FileConfig;

use crate::server::{RequestsLoggingLevel, ServerConfig};
use anyhow::{anyhow, bail, Result};
use clap::ValueEnum;
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

/// Deployment environment; selects the default log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    #[default]
    Dev,
    Prod,
}

impl Environment {
    pub fn default_log_level(&self) -> LevelFilter {
        match self {
            Environment::Dev => LevelFilter::DEBUG,
            Environment::Prod => LevelFilter::INFO,
        }
    }
}

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub host: String,
    pub port: u16,
    pub external_api_url: Option<String>,
    pub external_api_timeout_sec: u64,
    pub logging_level: RequestsLoggingLevel,
    pub env: Environment,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub external_api_url: String,
    pub external_api_timeout_sec: u64,
    pub logging_level: RequestsLoggingLevel,
    pub env: Environment,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .ok_or_else(|| anyhow!("db_path must be specified via --db-path or in config file"))?;
        validate_db_path(&db_path)?;

        let host = file.host.unwrap_or_else(|| cli.host.clone());
        if host.trim().is_empty() {
            bail!("host must not be empty");
        }
        let port = file.port.unwrap_or(cli.port);

        let external_api_url = file
            .external_api_url
            .or_else(|| cli.external_api_url.clone())
            .ok_or_else(|| {
                anyhow!("external_api_url must be specified via --external-api-url or in config file")
            })?;
        validate_api_url(&external_api_url)?;

        let external_api_timeout_sec = file
            .external_api_timeout_sec
            .unwrap_or(cli.external_api_timeout_sec);
        if external_api_timeout_sec == 0 {
            bail!("external_api_timeout_sec must be greater than zero");
        }

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let env = file
            .env
            .and_then(|s| parse_environment(&s))
            .unwrap_or(cli.env);

        Ok(Self {
            db_path,
            host,
            port,
            external_api_url,
            external_api_timeout_sec,
            logging_level,
            env,
        })
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            requests_logging_level: self.logging_level.clone(),
            host: self.host.clone(),
            port: self.port,
        }
    }
}

fn validate_db_path(db_path: &Path) -> Result<()> {
    if db_path.is_dir() {
        bail!("db_path points to a directory: {:?}", db_path);
    }
    match db_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
            bail!("Database directory does not exist: {:?}", parent)
        }
        _ => Ok(()),
    }
}

fn validate_api_url(url: &str) -> Result<()> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|err| anyhow!("Invalid external_api_url {:?}: {}", url, err))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => bail!("external_api_url must use http or https, got {:?}", scheme),
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}

fn parse_environment(s: &str) -> Option<Environment> {
    Environment::from_str(s, true).ok()
}
