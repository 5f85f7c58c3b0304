use anyhow::{Context, Result};
use clap::Parser;
use rustyroster::{api, config, logging, server, store::RecordStore};
use std::path::PathBuf;
use std::sync::Arc;

/// Rusty Roster HTTP server.
#[derive(Debug, Parser)]
#[command(name = "rusty-roster", version, about)]
struct Cli {
    /// Listen on this port instead of scanning for a free one (overrides `SERVER_PORT`).
    #[arg(long)]
    port: Option<u16>,
    /// Serve static assets from this directory (overrides `STATIC_DIR`).
    #[arg(long)]
    static_dir: Option<PathBuf>,
    /// Seed the store with the sample roster (same as `SEED_SAMPLE_STUDENTS=true`).
    #[arg(long)]
    seed_sample: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::init_config(|config| {
        if cli.port.is_some() {
            config.server_port = cli.port;
        }
        if let Some(dir) = cli.static_dir {
            config.static_dir = Some(dir);
        }
        config.seed_sample_students |= cli.seed_sample;
    })
    .context("failed to load configuration")?;
    logging::init_tracing(config);
    tracing::debug!(
        server_port = ?config.server_port,
        static_dir = ?config.static_dir,
        seed_sample_students = config.seed_sample_students,
        log_file = %config.log_file.display(),
        "Loaded configuration"
    );

    let store = if config.seed_sample_students {
        RecordStore::with_sample_data().context("failed to seed sample students")?
    } else {
        RecordStore::new()
    };

    let mut app = api::create_router(Arc::new(store));
    if let Some(dir) = &config.static_dir {
        if !dir.is_dir() {
            tracing::warn!(dir = %dir.display(), "Static directory does not exist");
        }
        tracing::info!(dir = %dir.display(), "Serving static assets");
        app = api::with_static_assets(app, dir);
    }

    let (listener, port) = server::bind_listener()
        .await
        .context("failed to bind listener")?;
    tracing::info!("Listening on http://0.0.0.0:{}", port);
    tracing::info!("API documentation at http://localhost:{}{}", port, api::DOCS_PATH);
    axum::serve(listener, app)
        .await
        .context("HTTP server terminated unexpectedly")?;
    Ok(())
}
