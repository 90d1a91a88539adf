use std::io::Read;

use chargematch_core::{DateSpan, Ledger, PurchaseRecord, RawRow, RowError};
use thiserror::Error;

/// Order-history exports mark subtotal and footer rows with a leading `=`
/// in the order-id column (spreadsheet formula remnants). Such rows never
/// reach the core.
pub const RESERVED_MARKER: char = '=';

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column: {0}")]
    MissingColumn(String),
    #[error("no purchase rows in input")]
    EmptyDataset,
}

/// A data row that could not be normalized; the import skips it and keeps
/// going — one bad row must not invalidate hundreds of good ones.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub line: u64,
    pub reason: RowError,
}

/// Processed-vs-skipped accounting for one import, surfaced to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    pub purchases: usize,
    pub orders: usize,
    pub date_range: Option<DateSpan>,
    /// Subtotal/footer and empty-order-id rows discarded before parsing.
    pub rows_filtered: usize,
    pub skipped: Vec<SkippedRow>,
}

/// Positions of the recognized columns in the header row.
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    order_id: usize,
    date: usize,
    price: usize,
    description: Option<usize>,
    item_url: Option<usize>,
    order_url: Option<usize>,
    asin: Option<usize>,
    quantity: Option<usize>,
}

fn map_headers(headers: &csv::StringRecord) -> Result<ColumnMap, ImportError> {
    let mut order_id = None;
    let mut date = None;
    let mut price = None;
    let mut description = None;
    let mut item_url = None;
    let mut order_url = None;
    let mut asin = None;
    let mut quantity = None;

    for (idx, raw) in headers.iter().enumerate() {
        // Exports written by spreadsheet tools lead with a UTF-8 BOM.
        let name = raw.trim_start_matches('\u{feff}').trim().to_lowercase();
        match name.as_str() {
            "order id" | "order_id" => order_id = Some(idx),
            "order date" | "order_date" => date = Some(idx),
            "price" => price = Some(idx),
            "description" => description = Some(idx),
            "item url" | "item_url" => item_url = Some(idx),
            "order url" | "order_url" => order_url = Some(idx),
            "asin" => asin = Some(idx),
            "quantity" => quantity = Some(idx),
            _ => {}
        }
    }

    Ok(ColumnMap {
        order_id: order_id.ok_or_else(|| ImportError::MissingColumn("order id".into()))?,
        date: date.ok_or_else(|| ImportError::MissingColumn("order date".into()))?,
        price: price.ok_or_else(|| ImportError::MissingColumn("price".into()))?,
        description,
        item_url,
        order_url,
        asin,
        quantity,
    })
}

fn field(record: &csv::StringRecord, col: Option<usize>) -> String {
    col.and_then(|c| record.get(c)).unwrap_or("").to_string()
}

/// Reads an order-history CSV into a fresh ledger generation.
///
/// Filters marker/empty rows, normalizes the rest through the core, skips
/// (and records) rows the core rejects, and groups the survivors into
/// orders. Ids restart from 1 — importing identical input twice yields
/// identical content.
pub fn read_ledger<R: Read>(input: R) -> Result<(Ledger, ImportReport), ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let columns = map_headers(reader.headers()?)?;

    let mut records: Vec<PurchaseRecord> = Vec::new();
    let mut rows_filtered = 0usize;
    let mut skipped: Vec<SkippedRow> = Vec::new();
    let mut next_id: u64 = 1;

    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());

        let order_id = record.get(columns.order_id).unwrap_or("").trim();
        if order_id.is_empty() || order_id.starts_with(RESERVED_MARKER) {
            rows_filtered += 1;
            continue;
        }

        let raw = RawRow {
            order_id: order_id.to_string(),
            date: field(&record, Some(columns.date)),
            price: field(&record, Some(columns.price)),
            description: field(&record, columns.description),
            item_url: field(&record, columns.item_url),
            order_url: field(&record, columns.order_url),
            asin: field(&record, columns.asin),
            quantity: field(&record, columns.quantity),
        };

        match PurchaseRecord::from_raw(next_id, &raw) {
            Ok(purchase) => {
                records.push(purchase);
                next_id += 1;
            }
            Err(reason) => skipped.push(SkippedRow { line, reason }),
        }
    }

    if records.is_empty() {
        return Err(ImportError::EmptyDataset);
    }

    let ledger = Ledger::from_records(records);
    let report = ImportReport {
        purchases: ledger.purchases().len(),
        orders: ledger.orders().len(),
        date_range: ledger.date_range(),
        rows_filtered,
        skipped,
    };

    Ok((ledger, report))
}
