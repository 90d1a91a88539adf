pub mod combo;
pub mod ledger;
pub mod matcher;
pub mod money;
pub mod order;
pub mod purchase;
pub mod score;
pub mod search;
pub mod store;
pub mod window;

pub use combo::{CombinationConfig, CombinationMatch, ComboItem};
pub use ledger::{AmountStats, DatasetStats, DateSpan, Ledger, LedgerError};
pub use matcher::{ItemMatch, OrderMatch};
pub use money::Money;
pub use order::Order;
pub use purchase::{PurchaseRecord, RawRow, RowError};
pub use search::{run_search, QueryError, SearchMode, SearchQuery, SearchResults};
pub use store::LedgerStore;
pub use window::DateWindow;
