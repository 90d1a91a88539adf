use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::money::Money;
use crate::purchase::PurchaseRecord;

/// A derived grouping of purchase records sharing one `order_id`. Never
/// authored independently; `total` is always recomputed from the members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    /// Date of the first constituent record in ingestion order. Orders are
    /// assumed single-date; multi-date orders keep the first date.
    pub date: NaiveDate,
    pub total: Money,
    pub item_count: usize,
    pub items: Vec<PurchaseRecord>,
    pub order_url: String,
}

/// Groups records into orders, preserving the first-seen order of order ids.
/// Returns the orders plus an index from order id to position.
pub fn group_orders(purchases: &[PurchaseRecord]) -> (Vec<Order>, HashMap<String, usize>) {
    let mut orders: Vec<Order> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in purchases {
        match index.get(&record.order_id) {
            Some(&pos) => {
                let order = &mut orders[pos];
                order.total = order.total + record.amount;
                order.item_count += 1;
                order.items.push(record.clone());
            }
            None => {
                index.insert(record.order_id.clone(), orders.len());
                orders.push(Order {
                    order_id: record.order_id.clone(),
                    date: record.date,
                    total: record.amount,
                    item_count: 1,
                    items: vec![record.clone()],
                    order_url: record.order_url.clone(),
                });
            }
        }
    }

    (orders, index)
}
