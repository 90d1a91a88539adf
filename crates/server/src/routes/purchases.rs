use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::PathBuf;

use chargematch_core::search::{DEFAULT_MAX_COMBO_ITEMS, DEFAULT_WINDOW_DAYS};
use chargematch_core::{run_search, DateSpan, QueryError, SearchQuery, SearchResults};
use chargematch_import::ImportReport;

use crate::error::ApiError;
use crate::AppState;

/// Filename tried when an import request does not name one.
const DEFAULT_CSV_FILENAME: &str = "amazon_order_history.csv";

#[derive(Debug, Serialize)]
pub struct ImportSummary {
    pub message: &'static str,
    pub total_items: usize,
    pub total_orders: usize,
    pub rows_filtered: usize,
    pub rows_skipped: usize,
    pub date_range: Option<DateSpan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

fn summarize(report: &ImportReport, file_path: Option<String>) -> ImportSummary {
    for row in &report.skipped {
        tracing::warn!(line = row.line, reason = %row.reason, "skipped malformed row");
    }
    tracing::info!(
        purchases = report.purchases,
        orders = report.orders,
        filtered = report.rows_filtered,
        skipped = report.skipped.len(),
        "import complete"
    );
    ImportSummary {
        message: "order history imported successfully",
        total_items: report.purchases,
        total_orders: report.orders,
        rows_filtered: report.rows_filtered,
        rows_skipped: report.skipped.len(),
        date_range: report.date_range,
        file_path,
    }
}

/// `POST /api/upload` — the request body is the CSV itself.
async fn upload(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ImportSummary>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::BadRequest("CSV file is empty".to_string()));
    }

    let (ledger, report) = chargematch_import::import_csv(body.as_ref())?;
    state.store.replace(ledger);
    Ok(Json(summarize(&report, None)))
}

#[derive(Debug, Default, Deserialize)]
struct ImportRequest {
    filename: Option<String>,
}

/// `POST /api/purchases/import` — reads a CSV already on disk, looked up
/// in the configured data directory first, then as given.
async fn import_from_disk(
    State(state): State<AppState>,
    payload: Option<Json<ImportRequest>>,
) -> Result<Json<ImportSummary>, ApiError> {
    let filename = payload
        .and_then(|Json(req)| req.filename)
        .unwrap_or_else(|| DEFAULT_CSV_FILENAME.to_string());

    let candidates = [state.data_dir.join(&filename), PathBuf::from(&filename)];
    let path = candidates
        .iter()
        .find(|p| p.is_file())
        .ok_or_else(|| ApiError::NotFound(format!("CSV file not found: {filename}")))?;

    let (ledger, report) = chargematch_import::import_file(path)?;
    state.store.replace(ledger);
    Ok(Json(summarize(&report, Some(path.display().to_string()))))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    date: Option<String>,
    amount: Option<String>,
    days_range: Option<u32>,
    search_type: Option<String>,
    max_combo_items: Option<usize>,
}

/// `GET /api/purchases/search` — parameter validation happens before the
/// store is touched; failures name the parameter.
async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults>, ApiError> {
    let date = params.date.ok_or_else(|| {
        ApiError::BadRequest("missing required parameter: date (format: YYYY-MM-DD)".to_string())
    })?;
    let amount = params
        .amount
        .ok_or_else(|| ApiError::BadRequest("missing required parameter: amount".to_string()))?;

    let query = SearchQuery::parse(
        &date,
        &amount,
        params.days_range.unwrap_or(DEFAULT_WINDOW_DAYS),
        params.search_type.as_deref().unwrap_or("all"),
        params.max_combo_items.unwrap_or(DEFAULT_MAX_COMBO_ITEMS),
    )?;

    let ledger = state.store.snapshot();
    let results = run_search(&ledger, &query, &state.combo);
    tracing::debug!(
        date = %query.target_date,
        amount = %query.target_amount,
        mode = %query.search_type,
        matches = results.total_matches,
        "search complete"
    );
    Ok(Json(results))
}

#[derive(Debug, Deserialize)]
struct ListParams {
    start_date: Option<String>,
    end_date: Option<String>,
}

fn parse_bound(value: Option<String>) -> Result<Option<NaiveDate>, ApiError> {
    value
        .map(|s| {
            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map_err(|_| ApiError::Query(QueryError::InvalidDate(s.trim().to_string())))
        })
        .transpose()
}

/// `GET /api/purchases` — the full generation, optionally date-bounded.
async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, ApiError> {
    let start = parse_bound(params.start_date)?;
    let end = parse_bound(params.end_date)?;

    let ledger = state.store.snapshot();
    let purchases = ledger.purchases_between(start, end);
    Ok(Json(json!({
        "total_count": purchases.len(),
        "purchases": purchases,
    })))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload))
        .route("/purchases", get(list))
        .route("/purchases/import", post(import_from_disk))
        .route("/purchases/search", get(search))
}
