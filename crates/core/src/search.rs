use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::combo::{find_item_combinations, CombinationConfig, CombinationMatch};
use crate::ledger::Ledger;
use crate::matcher::{find_matching_items, find_matching_orders, ItemMatch, OrderMatch};
use crate::money::Money;

pub const DEFAULT_WINDOW_DAYS: u32 = 7;
pub const DEFAULT_MAX_COMBO_ITEMS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Item,
    Order,
    Combination,
    All,
}

impl SearchMode {
    fn runs_items(self) -> bool {
        matches!(self, SearchMode::Item | SearchMode::All)
    }

    fn runs_orders(self) -> bool {
        matches!(self, SearchMode::Order | SearchMode::All)
    }

    fn runs_combinations(self) -> bool {
        matches!(self, SearchMode::Combination | SearchMode::All)
    }
}

impl FromStr for SearchMode {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "item" => Ok(SearchMode::Item),
            "order" => Ok(SearchMode::Order),
            "combination" => Ok(SearchMode::Combination),
            "all" => Ok(SearchMode::All),
            other => Err(QueryError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Item => write!(f, "item"),
            SearchMode::Order => write!(f, "order"),
            SearchMode::Combination => write!(f, "combination"),
            SearchMode::All => write!(f, "all"),
        }
    }
}

/// A query parameter that failed validation. Raised before the ledger is
/// touched, naming the offending parameter.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum QueryError {
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("invalid amount '{0}': expected a decimal number")]
    InvalidAmount(String),
    #[error("invalid search type '{0}': expected item, order, combination or all")]
    InvalidMode(String),
    #[error("max_combo_items must be at least 1")]
    InvalidComboSize,
}

/// A validated search: target date and amount, window, mode, combination
/// size ceiling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchQuery {
    pub target_date: NaiveDate,
    pub target_amount: Money,
    pub search_range_days: u32,
    pub search_type: SearchMode,
    pub max_combo_items: usize,
}

impl SearchQuery {
    /// Validates raw string parameters into a query. All failures name the
    /// parameter so the boundary can answer "which input was wrong".
    pub fn parse(
        date: &str,
        amount: &str,
        window_days: u32,
        mode: &str,
        max_combo_items: usize,
    ) -> Result<Self, QueryError> {
        let target_date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|_| QueryError::InvalidDate(date.trim().to_string()))?;
        let target_amount: Money = amount
            .parse()
            .map_err(|_| QueryError::InvalidAmount(amount.trim().to_string()))?;
        let search_type: SearchMode = mode.parse()?;
        if max_combo_items == 0 {
            return Err(QueryError::InvalidComboSize);
        }

        Ok(SearchQuery {
            target_date,
            target_amount,
            search_range_days: window_days,
            search_type,
            max_combo_items,
        })
    }
}

/// The unified search payload: the echoed query, one list per strategy
/// (empty when the mode did not run it), and the summed match count.
/// Categories are never ranked or merged against each other.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    pub query: SearchQuery,
    pub item_matches: Vec<ItemMatch>,
    pub order_matches: Vec<OrderMatch>,
    pub combination_matches: Vec<CombinationMatch>,
    pub total_matches: usize,
}

/// Runs the strategies implied by the query's mode against one ledger
/// generation and assembles the result payload.
pub fn run_search(
    ledger: &Ledger,
    query: &SearchQuery,
    config: &CombinationConfig,
) -> SearchResults {
    let item_matches = if query.search_type.runs_items() {
        find_matching_items(
            ledger,
            query.target_date,
            query.target_amount,
            query.search_range_days,
        )
    } else {
        Vec::new()
    };

    let order_matches = if query.search_type.runs_orders() {
        find_matching_orders(
            ledger,
            query.target_date,
            query.target_amount,
            query.search_range_days,
        )
    } else {
        Vec::new()
    };

    let combination_matches = if query.search_type.runs_combinations() {
        find_item_combinations(
            ledger,
            query.target_date,
            query.target_amount,
            query.search_range_days,
            query.max_combo_items,
            config,
        )
    } else {
        Vec::new()
    };

    let total_matches = item_matches.len() + order_matches.len() + combination_matches.len();

    SearchResults {
        query: query.clone(),
        item_matches,
        order_matches,
        combination_matches,
        total_matches,
    }
}
