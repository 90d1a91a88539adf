use chrono::NaiveDate;

use crate::purchase::PurchaseRecord;
use crate::window::days_from_target;

/// Day distance at which the proximity component decays to zero.
const DECAY_DAYS: f64 = 14.0;

/// Confidence score in `[0, 100]` for a combination of items, used only to
/// rank exact-sum results against each other.
///
/// Two equally weighted components:
/// - date proximity (50): `max(0, 1 − avg_days/14) × 50`;
/// - same order (50): all members share one order id, or nothing.
///
/// Amount deviation carries no weight — members are constrained to sum to
/// the target exactly before they ever reach the scorer.
pub fn probability_score(items: &[&PurchaseRecord], target_date: NaiveDate) -> f64 {
    if items.is_empty() {
        return 0.0;
    }

    let avg_days = average_abs_days(items, target_date);
    let date_score = (1.0 - avg_days / DECAY_DAYS).max(0.0) * 50.0;

    let first = &items[0].order_id;
    let same_order = items.iter().all(|i| i.order_id == *first);
    let order_score = if same_order { 50.0 } else { 0.0 };

    round2(date_score + order_score)
}

/// Mean absolute day distance of the members to the target date.
pub fn average_abs_days(items: &[&PurchaseRecord], target_date: NaiveDate) -> f64 {
    let total: i64 = items
        .iter()
        .map(|i| days_from_target(i.date, target_date).abs())
        .sum();
    total as f64 / items.len() as f64
}

pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn record(id: u64, order_id: &str, date: (i32, u32, u32)) -> PurchaseRecord {
        PurchaseRecord {
            id,
            order_id: order_id.to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            amount: Money::from_cents(1000),
            description: String::new(),
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
    fn same_order_same_day_is_a_perfect_score() {
        let a = record(1, "A", (2025, 11, 26));
        let b = record(2, "A", (2025, 11, 26));
        assert_eq!(probability_score(&[&a, &b], date(2025, 11, 26)), 100.0);
    }

    #[test]
    fn cross_order_same_day_scores_fifty() {
        let a = record(1, "A", (2025, 11, 26));
        let b = record(2, "B", (2025, 11, 26));
        assert_eq!(probability_score(&[&a, &b], date(2025, 11, 26)), 50.0);
    }

    #[test]
    fn proximity_decays_linearly_to_fourteen_days() {
        let a = record(1, "A", (2025, 11, 19));
        // 7 days out, same order: 50·(1 − 7/14) + 50 = 75.
        assert_eq!(probability_score(&[&a], date(2025, 11, 26)), 75.0);
    }

    #[test]
    fn proximity_component_floors_at_zero() {
        let a = record(1, "A", (2025, 11, 1));
        // 25 days out: date component clamps to 0, same-order bonus remains.
        assert_eq!(probability_score(&[&a], date(2025, 11, 26)), 50.0);
    }

    #[test]
    fn mixed_distances_use_the_average() {
        let a = record(1, "A", (2025, 11, 26));
        let b = record(2, "B", (2025, 11, 19));
        // avg 3.5 days, different orders: 50·(1 − 3.5/14) = 37.5.
        assert_eq!(probability_score(&[&a, &b], date(2025, 11, 26)), 37.5);
    }

    #[test]
    fn empty_slice_scores_zero() {
        assert_eq!(probability_score(&[], date(2025, 11, 26)), 0.0);
    }

    #[test]
    fn score_is_rounded_to_two_decimals() {
        let a = record(1, "A", (2025, 11, 25));
        let b = record(2, "A", (2025, 11, 26));
        let c = record(3, "A", (2025, 11, 26));
        // avg 1/3 day: 50·(1 − (1/3)/14) + 50 = 98.8095… → 98.81.
        assert_eq!(probability_score(&[&a, &b, &c], date(2025, 11, 26)), 98.81);
    }
}
