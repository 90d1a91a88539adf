use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use chargematch_core::DatasetStats;

use crate::error::ApiError;
use crate::AppState;

async fn get_stats(State(state): State<AppState>) -> Result<Json<DatasetStats>, ApiError> {
    let ledger = state.store.snapshot();
    Ok(Json(ledger.stats()?))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/stats", get(get_stats))
}
