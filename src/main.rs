use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use song_library_server::config::{AppConfig, CliConfig, Environment, FileConfig};
use song_library_server::enrichment::LyricsApiClient;
use song_library_server::server::{run_server, RequestsLoggingLevel};
use song_library_server::song_store::{SongStore, SqliteSongStore};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    if path_buf.is_absolute() {
        return Ok(path_buf);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(path_buf))
}

#[derive(Parser, Debug)]
#[command(version, about = "Song library REST server")]
struct CliArgs {
    /// Path to a TOML config file. Values in the file override CLI arguments.
    #[clap(long, env = "CONFIG", value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Path to the SQLite songs database file.
    #[clap(long, value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    /// The address to bind to.
    #[clap(long, default_value = "127.0.0.1")]
    pub host: String,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 8080)]
    pub port: u16,

    /// URL of the external song info endpoint.
    #[clap(long)]
    pub external_api_url: Option<String>,

    /// Timeout in seconds for external API requests.
    #[clap(long, default_value_t = 10)]
    pub external_api_timeout_sec: u64,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Deployment environment, selects the default log level.
    #[clap(long, default_value = "dev")]
    pub env: Environment,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            db_path: self.db_path.clone(),
            host: self.host.clone(),
            port: self.port,
            external_api_url: self.external_api_url.clone(),
            external_api_timeout_sec: self.external_api_timeout_sec,
            logging_level: self.logging_level.clone(),
            env: self.env,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(config.env.default_log_level().into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    if let Some(path) = &cli_args.config {
        info!("Loaded config file {:?}", path);
    }
    info!("Running in {:?} environment", config.env);

    info!("Opening songs database at {:?}...", config.db_path);
    let store = Arc::new(SqliteSongStore::new(&config.db_path)?);
    info!("Songs database ready with {} songs", store.count_songs()?);

    let enricher = Arc::new(LyricsApiClient::new(
        config.external_api_url.clone(),
        config.external_api_timeout_sec,
    )?);
    info!(
        "External API configured at {} (timeout {}s)",
        enricher.base_url(),
        config.external_api_timeout_sec
    );

    info!("Ready to serve at port {}!", config.port);
    run_server(config.server_config(), store, enricher).await
}
