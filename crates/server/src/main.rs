use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use chargematch_server::config::ServerConfig;
use chargematch_server::{create_router, AppState};

/// Filenames tried in the data directory at startup, most specific first.
const WELL_KNOWN_CSVS: &[&str] = &[
    "amazon_order_history.csv",
    "order_history.csv",
    "orders.csv",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("chargematch_server=info,tower_http=info")),
        )
        .init();

    let config_path = std::env::var("CHARGEMATCH_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("chargematch.toml"));
    let config = ServerConfig::load(&config_path)?;

    let state = AppState::new(config.data_dir.clone(), config.combination_config());

    // Preload any order history already sitting in the data directory so
    // the service is searchable without an explicit import call.
    for filename in WELL_KNOWN_CSVS {
        let path = config.data_dir.join(filename);
        if !path.is_file() {
            continue;
        }
        match chargematch_import::import_file(&path) {
            Ok((ledger, report)) => {
                tracing::info!(
                    path = %path.display(),
                    purchases = report.purchases,
                    orders = report.orders,
                    "loaded order history"
                );
                state.store.replace(ledger);
                break;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not load CSV");
            }
        }
    }
    if state.store.snapshot().is_empty() {
        tracing::info!(
            data_dir = %config.data_dir.display(),
            "no order history found; waiting for an upload"
        );
    }

    let app = create_router(state, config.max_upload_bytes);
    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
