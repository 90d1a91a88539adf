//! Bounded subset-sum search over window candidates.
//!
//! Worst case is combinatorial: with the default caps the enumeration tops
//! out around C(50,5) ≈ 2.1M subsets before the size-5 ceiling. The
//! candidate pool cap, subset-size ceiling, result cap and early-stop
//! threshold are all exposed through [`CombinationConfig`].

use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use crate::ledger::Ledger;
use crate::money::Money;
use crate::purchase::PurchaseRecord;
use crate::score::{average_abs_days, probability_score, round1};
use crate::window::{days_from_target, DateWindow};

#[derive(Debug, Clone, Copy)]
pub struct CombinationConfig {
    /// Candidates kept after sorting by day distance to the target.
    pub candidate_cap: usize,
    /// Qualifying combinations returned after ranking.
    pub max_results: usize,
    /// Once any result beats this score, larger subset sizes are skipped:
    /// a confidently scored small combination outranks any larger
    /// exact-sum coincidence.
    pub early_stop_score: f64,
    /// Optional wall-clock bound; on expiry the search stops and whatever
    /// already qualified is ranked and returned.
    pub time_budget: Option<Duration>,
}

impl Default for CombinationConfig {
    fn default() -> Self {
        Self {
            candidate_cap: 50,
            max_results: 10,
            early_stop_score: 70.0,
            time_budget: None,
        }
    }
}

/// A member of a qualifying combination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComboItem {
    pub id: u64,
    pub order_id: String,
    pub date: NaiveDate,
    pub amount: Money,
    pub description: String,
    pub days_from_target: i64,
}

/// A subset of candidate items summing exactly to the target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinationMatch {
    pub items: Vec<ComboItem>,
    pub total_amount: Money,
    pub item_count: usize,
    pub avg_days_from_target: f64,
    pub probability_score: f64,
    pub same_order: bool,
    pub order_ids: Vec<String>,
}

/// Finds subsets of 1..=`max_items` in-window items whose amounts sum to
/// the target within one cent, ranked by probability score.
///
/// Zero-amount records never participate: they cannot move a sum and would
/// only inflate the search space. Candidates beyond the pool cap — the
/// ones farthest from the target date — are dropped by design, so a true
/// match far from the charge date can be missed.
pub fn find_item_combinations(
    ledger: &Ledger,
    target_date: NaiveDate,
    target_amount: Money,
    window_days: u32,
    max_items: usize,
    config: &CombinationConfig,
) -> Vec<CombinationMatch> {
    let window = DateWindow::around(target_date, window_days);

    let mut candidates: Vec<&PurchaseRecord> = ledger
        .purchases()
        .iter()
        .filter(|p| window.contains(p.date) && p.amount.is_positive())
        .collect();

    if candidates.is_empty() {
        return Vec::new();
    }

    candidates.sort_by_key(|p| days_from_target(p.date, target_date).abs());
    candidates.truncate(config.candidate_cap);

    let deadline = config.time_budget.map(|budget| Instant::now() + budget);
    let mut matches: Vec<CombinationMatch> = Vec::new();

    for size in 1..=max_items.min(candidates.len()) {
        let mut chosen: Vec<&PurchaseRecord> = Vec::with_capacity(size);
        let completed = extend(
            &candidates,
            size,
            0,
            Money::zero(),
            &mut chosen,
            target_date,
            target_amount,
            deadline,
            &mut matches,
        );
        if !completed {
            break;
        }
        if matches
            .iter()
            .any(|m| m.probability_score > config.early_stop_score)
        {
            break;
        }
    }

    matches.sort_by(|a, b| {
        b.probability_score
            .partial_cmp(&a.probability_score)
            .unwrap_or(Ordering::Equal)
    });
    matches.truncate(config.max_results);
    matches
}

/// Backtracking enumeration of exactly-`size` subsets starting at `start`.
/// Candidate amounts are strictly positive, so a partial sum that already
/// reached `target + 1¢` is pruned: no extension can come back down.
/// Returns false when the deadline expired mid-walk.
#[allow(clippy::too_many_arguments)]
fn extend<'a>(
    candidates: &[&'a PurchaseRecord],
    size: usize,
    start: usize,
    sum: Money,
    chosen: &mut Vec<&'a PurchaseRecord>,
    target_date: NaiveDate,
    target_amount: Money,
    deadline: Option<Instant>,
    out: &mut Vec<CombinationMatch>,
) -> bool {
    if let Some(d) = deadline {
        if Instant::now() >= d {
            return false;
        }
    }

    if chosen.len() == size {
        if (sum - target_amount).abs() < Money::cent() {
            out.push(build_match(chosen, target_date, sum));
        }
        return true;
    }

    let needed = size - chosen.len();
    let mut i = start;
    // Leave enough tail to fill the remaining slots.
    while i + needed <= candidates.len() {
        let next = sum + candidates[i].amount;
        if next - target_amount < Money::cent() {
            chosen.push(candidates[i]);
            let completed = extend(
                candidates,
                size,
                i + 1,
                next,
                chosen,
                target_date,
                target_amount,
                deadline,
                out,
            );
            chosen.pop();
            if !completed {
                return false;
            }
        }
        i += 1;
    }
    true
}

fn build_match(
    chosen: &[&PurchaseRecord],
    target_date: NaiveDate,
    total: Money,
) -> CombinationMatch {
    let items: Vec<ComboItem> = chosen
        .iter()
        .map(|p| ComboItem {
            id: p.id,
            order_id: p.order_id.clone(),
            date: p.date,
            amount: p.amount,
            description: p.description.clone(),
            days_from_target: days_from_target(p.date, target_date),
        })
        .collect();

    let distinct: BTreeSet<&str> = chosen.iter().map(|p| p.order_id.as_str()).collect();
    let same_order = distinct.len() == 1;

    CombinationMatch {
        item_count: items.len(),
        avg_days_from_target: round1(average_abs_days(chosen, target_date)),
        probability_score: probability_score(chosen, target_date),
        same_order,
        order_ids: distinct.into_iter().map(String::from).collect(),
        total_amount: total,
        items,
    }
}
