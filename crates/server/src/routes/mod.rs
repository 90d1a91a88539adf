use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

use crate::AppState;

pub mod health;
pub mod orders;
pub mod purchases;
pub mod stats;

/// Assembles the API router. The body limit guards the CSV upload path;
/// axum's default limit is disabled so tower-http's layer is the one cap.
pub fn api_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(orders::routes())
        .merge(purchases::routes())
        .merge(stats::routes())
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
}
