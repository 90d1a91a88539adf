//! HTTP surface over the matching engine: thin handlers that validate
//! parameters, take a ledger snapshot, and serialize core results.

pub mod config;
pub mod error;
pub mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use chargematch_core::{CombinationConfig, LedgerStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers. The ledger store is the only
/// mutable piece; everything else is startup configuration.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<LedgerStore>,
    /// Directory searched by import-by-filename requests.
    pub data_dir: PathBuf,
    pub combo: CombinationConfig,
}

impl AppState {
    pub fn new(data_dir: PathBuf, combo: CombinationConfig) -> Self {
        AppState {
            store: Arc::new(LedgerStore::new()),
            data_dir,
            combo,
        }
    }
}

/// Creates the application router with request tracing and permissive CORS
/// so browser UIs can call the API from any origin.
pub fn create_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .nest("/api", routes::api_routes(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
