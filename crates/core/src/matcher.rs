use chrono::NaiveDate;
use serde::Serialize;

use crate::ledger::Ledger;
use crate::money::Money;
use crate::order::Order;
use crate::purchase::PurchaseRecord;
use crate::window::{days_from_target, DateWindow};

/// A line item whose amount equals the target exactly, within the window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemMatch {
    #[serde(flatten)]
    pub record: PurchaseRecord,
    pub days_from_target: i64,
}

/// An order whose total equals the target exactly, within the window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderMatch {
    #[serde(flatten)]
    pub order: Order,
    pub days_from_target: i64,
}

/// Every record in `[target − window, target + window]` whose amount equals
/// the target. Equality is exact post-rounding — a reconciliation tool must
/// not show near-miss prices. Results stay in ledger insertion order.
pub fn find_matching_items(
    ledger: &Ledger,
    target_date: NaiveDate,
    target_amount: Money,
    window_days: u32,
) -> Vec<ItemMatch> {
    let window = DateWindow::around(target_date, window_days);

    ledger
        .purchases()
        .iter()
        .filter(|p| window.contains(p.date) && p.amount == target_amount)
        .map(|p| ItemMatch {
            record: p.clone(),
            days_from_target: days_from_target(p.date, target_date),
        })
        .collect()
}

/// Same windowing and equality rule applied to order totals.
pub fn find_matching_orders(
    ledger: &Ledger,
    target_date: NaiveDate,
    target_amount: Money,
    window_days: u32,
) -> Vec<OrderMatch> {
    let window = DateWindow::around(target_date, window_days);

    ledger
        .orders()
        .iter()
        .filter(|o| window.contains(o.date) && o.total == target_amount)
        .map(|o| OrderMatch {
            order: o.clone(),
            days_from_target: days_from_target(o.date, target_date),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, order_id: &str, date: (i32, u32, u32), cents: i64) -> PurchaseRecord {
        PurchaseRecord {
            id,
            order_id: order_id.to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            amount: Money::from_cents(cents),
            description: format!("item {id}"),
            item_url: String::new(),
            order_url: String::new(),
            asin: String::new(),
            quantity: 1,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn two_same_order_items_match_but_not_their_order() {
        // Two $14.20 sweatpants in one order: an item search for $14.20
        // finds both lines; the order totals $28.40 and stays out.
        let ledger = Ledger::from_records(vec![
            record(1, "111-5300082", (2025, 10, 30), 1420),
            record(2, "111-5300082", (2025, 10, 30), 1420),
        ]);

        let items = find_matching_items(&ledger, date(2025, 10, 30), Money::from_cents(1420), 7);
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|m| m.days_from_target == 0));

        let orders = find_matching_orders(&ledger, date(2025, 10, 30), Money::from_cents(1420), 7);
        assert!(orders.is_empty());
    }

    #[test]
    fn order_total_matches_with_item_count() {
        let ledger = Ledger::from_records(vec![
            record(1, "111-5300082", (2025, 10, 30), 1420),
            record(2, "111-5300082", (2025, 10, 30), 3000),
        ]);

        let orders = find_matching_orders(&ledger, date(2025, 10, 30), Money::from_cents(4420), 7);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].order.item_count, 2);
        assert_eq!(orders[0].days_from_target, 0);
    }

    #[test]
    fn no_false_positives_on_amount() {
        let ledger = Ledger::from_records(vec![record(1, "A", (2025, 11, 26), 3665)]);
        let items = find_matching_items(&ledger, date(2025, 11, 26), Money::from_cents(9999), 7);
        assert!(items.is_empty());
    }

    #[test]
    fn near_miss_amount_is_not_a_match() {
        let ledger = Ledger::from_records(vec![record(1, "A", (2025, 11, 26), 3665)]);
        // One cent off must not match: equality, not a tolerance band.
        let items = find_matching_items(&ledger, date(2025, 11, 26), Money::from_cents(3666), 7);
        assert!(items.is_empty());
    }

    #[test]
    fn outside_window_is_not_a_match() {
        let ledger = Ledger::from_records(vec![record(1, "A", (2025, 11, 26), 3665)]);
        let items = find_matching_items(&ledger, date(2025, 12, 15), Money::from_cents(3665), 7);
        assert!(items.is_empty());
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let ledger = Ledger::from_records(vec![record(1, "A", (2025, 11, 19), 3665)]);
        let items = find_matching_items(&ledger, date(2025, 11, 26), Money::from_cents(3665), 7);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].days_from_target, -7);
    }

    #[test]
    fn days_from_target_is_signed() {
        let ledger = Ledger::from_records(vec![
            record(1, "A", (2025, 11, 24), 1000),
            record(2, "B", (2025, 11, 28), 1000),
        ]);
        let items = find_matching_items(&ledger, date(2025, 11, 26), Money::from_cents(1000), 7);
        assert_eq!(items[0].days_from_target, -2);
        assert_eq!(items[1].days_from_target, 2);
    }

    #[test]
    fn zero_amount_items_match_a_zero_target() {
        let ledger = Ledger::from_records(vec![record(1, "A", (2025, 11, 26), 0)]);
        let items = find_matching_items(&ledger, date(2025, 11, 26), Money::zero(), 7);
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn results_keep_ledger_insertion_order() {
        let ledger = Ledger::from_records(vec![
            record(1, "A", (2025, 11, 28), 1000),
            record(2, "B", (2025, 11, 24), 1000),
        ]);
        let items = find_matching_items(&ledger, date(2025, 11, 26), Money::from_cents(1000), 7);
        // Not sorted by date: insertion order is the contract.
        assert_eq!(items[0].record.id, 1);
        assert_eq!(items[1].record.id, 2);
    }
}
