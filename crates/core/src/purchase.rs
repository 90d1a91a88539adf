use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::Money;

/// Maximum stored description length, in characters.
pub const DESCRIPTION_MAX: usize = 100;

/// One row of an order-history export, fields still in their string form.
/// The ingestion collaborator produces these after discarding subtotal and
/// footer rows; [`PurchaseRecord::from_raw`] normalizes them.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    pub order_id: String,
    pub date: String,
    pub price: String,
    pub description: String,
    pub item_url: String,
    pub order_url: String,
    pub asin: String,
    pub quantity: String,
}

/// A row that could not be normalized into a purchase record.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RowError {
    #[error("missing order id")]
    MissingOrderId,
    #[error("missing order date")]
    MissingDate,
    #[error("invalid order date: '{0}'")]
    InvalidDate(String),
    #[error("invalid price: '{0}'")]
    InvalidAmount(String),
    #[error("invalid quantity: '{0}'")]
    InvalidQuantity(String),
}

/// A single purchased line item. Immutable once ingested; ids are sequence
/// numbers assigned in ingestion order, restarting from 1 on every import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub id: u64,
    pub order_id: String,
    pub date: NaiveDate,
    pub amount: Money,
    pub description: String,
    pub item_url: String,
    pub order_url: String,
    pub asin: String,
    /// Informational only; matching always operates on `amount`, never
    /// `amount × quantity`.
    pub quantity: u32,
}

impl PurchaseRecord {
    pub fn from_raw(id: u64, raw: &RawRow) -> Result<Self, RowError> {
        if raw.order_id.trim().is_empty() {
            return Err(RowError::MissingOrderId);
        }
        let date_str = raw.date.trim();
        if date_str.is_empty() {
            return Err(RowError::MissingDate);
        }
        let date = parse_order_date(date_str)?;

        let amount = Money::parse_price(&raw.price)
            .map_err(|e| RowError::InvalidAmount(e.0))?;

        let quantity = match raw.quantity.trim() {
            "" => 1,
            q => q
                .parse::<u32>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| RowError::InvalidQuantity(q.to_string()))?,
        };

        Ok(PurchaseRecord {
            id,
            order_id: raw.order_id.trim().to_string(),
            date,
            amount,
            description: truncate_chars(&raw.description, DESCRIPTION_MAX),
            item_url: raw.item_url.clone(),
            order_url: raw.order_url.clone(),
            asin: raw.asin.clone(),
            quantity,
        })
    }
}

fn parse_order_date(s: &str) -> Result<NaiveDate, RowError> {
    for fmt in &["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }
    Err(RowError::InvalidDate(s.to_string()))
}

/// Truncation on char boundaries; exports occasionally carry multi-byte
/// product names.
fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
