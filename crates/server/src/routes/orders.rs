use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use chargematch_core::Order;

use crate::error::ApiError;
use crate::AppState;

async fn list_orders(State(state): State<AppState>) -> Json<Value> {
    let ledger = state.store.snapshot();
    Json(json!({
        "total_count": ledger.orders().len(),
        "orders": ledger.orders(),
    }))
}

async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let ledger = state.store.snapshot();
    let order = ledger.get_order(&order_id)?;
    Ok(Json(order.clone()))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders))
        .route("/orders/{order_id}", get(get_order))
}
