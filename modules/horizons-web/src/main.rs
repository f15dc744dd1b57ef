use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use horizons_common::{file_config::load_config, Config};
use horizons_web::{routes, snapshot::SnapshotStore, AppState};

#[derive(Parser)]
#[command(name = "horizons-web", about = "Horizons fundraising dashboard API")]
struct Cli {
    /// Path to config TOML file (overrides HORIZONS_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the per-host JSON dumps (overrides HORIZONS_DUMP_DIR)
    #[arg(long)]
    dump_dir: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("horizons=info,tower_http=info"));
    if cli.json_logs {
        tracing_subscriber::fmt().with_env_filter(env_filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let mut config = Config::from_env()?;
    if let Some(path) = cli.config {
        config.config_path = path;
    }
    if let Some(dir) = cli.dump_dir {
        config.dump_dir = dir;
    }

    let file_config = load_config(&config.config_path).with_context(|| {
        format!(
            "Config file not found or invalid: {}. Create one or specify --config <path>",
            config.config_path.display()
        )
    })?;
    info!(
        hosts = file_config.hosts.len(),
        dump_dir = %config.dump_dir.display(),
        "Host config loaded"
    );

    let state = Arc::new(AppState::new(
        file_config,
        SnapshotStore::new(config.dump_dir.clone()),
    ));
    let app = routes::build_router(state);

    let addr = format!("{}:{}", config.web_host, config.web_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Horizons API at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
