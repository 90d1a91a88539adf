use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::money::Money;
use crate::order::{group_orders, Order};
use crate::purchase::PurchaseRecord;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LedgerError {
    #[error("no purchase data loaded")]
    EmptyDataset,
    #[error("order not found: {0}")]
    OrderNotFound(String),
}

/// Earliest and latest purchase dates in a generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmountStats {
    pub min_item: Money,
    pub max_item: Money,
    pub avg_item: Money,
    pub min_order: Money,
    pub max_order: Money,
    pub avg_order: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub total_items: usize,
    pub total_orders: usize,
    pub date_range: DateSpan,
    pub amount_stats: AmountStats,
}

/// One generation of the purchase ledger: the normalized records plus the
/// derived per-order aggregates. Built in a single pass and read-only
/// afterwards; a new import replaces the whole generation.
#[derive(Debug, Default)]
pub struct Ledger {
    purchases: Vec<PurchaseRecord>,
    orders: Vec<Order>,
    order_index: HashMap<String, usize>,
}

impl Ledger {
    pub fn empty() -> Self {
        Ledger::default()
    }

    pub fn from_records(purchases: Vec<PurchaseRecord>) -> Self {
        let (orders, order_index) = group_orders(&purchases);
        Ledger {
            purchases,
            orders,
            order_index,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.purchases.is_empty()
    }

    /// All records in ingestion order.
    pub fn purchases(&self) -> &[PurchaseRecord] {
        &self.purchases
    }

    /// All orders in first-seen order.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn get_order(&self, order_id: &str) -> Result<&Order, LedgerError> {
        self.order_index
            .get(order_id)
            .map(|&pos| &self.orders[pos])
            .ok_or_else(|| LedgerError::OrderNotFound(order_id.to_string()))
    }

    /// Records with dates in `[start, end]`; either bound may be open.
    pub fn purchases_between(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Vec<&PurchaseRecord> {
        self.purchases
            .iter()
            .filter(|p| start.map_or(true, |s| p.date >= s))
            .filter(|p| end.map_or(true, |e| p.date <= e))
            .collect()
    }

    pub fn date_range(&self) -> Option<DateSpan> {
        let earliest = self.purchases.iter().map(|p| p.date).min()?;
        let latest = self.purchases.iter().map(|p| p.date).max()?;
        Some(DateSpan { earliest, latest })
    }

    pub fn stats(&self) -> Result<DatasetStats, LedgerError> {
        let date_range = self.date_range().ok_or(LedgerError::EmptyDataset)?;

        let amounts: Vec<Money> = self.purchases.iter().map(|p| p.amount).collect();
        let totals: Vec<Money> = self.orders.iter().map(|o| o.total).collect();

        Ok(DatasetStats {
            total_items: self.purchases.len(),
            total_orders: self.orders.len(),
            date_range,
            amount_stats: AmountStats {
                min_item: min_of(&amounts),
                max_item: max_of(&amounts),
                avg_item: avg_of(&amounts),
                min_order: min_of(&totals),
                max_order: max_of(&totals),
                avg_order: avg_of(&totals),
            },
        })
    }
}

fn min_of(values: &[Money]) -> Money {
    values.iter().copied().min().unwrap_or_else(Money::zero)
}

fn max_of(values: &[Money]) -> Money {
    values.iter().copied().max().unwrap_or_else(Money::zero)
}

fn avg_of(values: &[Money]) -> Money {
    if values.is_empty() {
        return Money::zero();
    }
    let sum: Money = values.iter().copied().sum();
    Money::from_decimal(sum.as_decimal() / Decimal::from(values.len() as i64))
}
