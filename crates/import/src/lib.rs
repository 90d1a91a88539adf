pub mod csv;

pub use csv::{read_ledger, ImportError, ImportReport, SkippedRow, RESERVED_MARKER};

use chargematch_core::Ledger;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Imports an order-history CSV from an in-memory buffer or stream.
pub fn import_csv<R: std::io::Read>(data: R) -> Result<(Ledger, ImportReport), ImportError> {
    csv::read_ledger(data)
}

/// Imports an order-history CSV from disk.
pub fn import_file(path: &Path) -> Result<(Ledger, ImportReport), ImportError> {
    let file = File::open(path)?;
    csv::read_ledger(BufReader::new(file))
}
