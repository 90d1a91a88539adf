use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub data_loaded: bool,
    pub total_items: usize,
    pub total_orders: usize,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let ledger = state.store.snapshot();
    Json(HealthResponse {
        status: "healthy",
        data_loaded: !ledger.is_empty(),
        total_items: ledger.purchases().len(),
        total_orders: ledger.orders().len(),
    })
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
