//! Cost and usage export rows
//!
//! Reads a billing CSV export into [`UsageRecord`]s, keeping only the five
//! columns the report works with.

use rust_decimal::Decimal;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use crate::error::AppError;

pub const USAGE_TYPE_COLUMN: &str = "usage_type";
pub const MONTH_COLUMN: &str = "month";
pub const ITEM_DESCRIPTION_COLUMN: &str = "item_description";
pub const COST_COLUMN: &str = "cost";
/// Accepted spellings of the account column, in order of preference
pub const ACCOUNT_COLUMNS: [&str; 2] = ["aws_account_id", "account_id"];

/// One line item of a cost export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageRecord {
    pub account_id: String,
    pub month: String,
    pub usage_type: String,
    pub item_description: String,
    /// `None` when the export's cost cell could not be parsed
    pub cost: Option<Decimal>,
}

/// Column positions resolved from a header row
struct ColumnIndex {
    account_id: usize,
    month: usize,
    usage_type: usize,
    item_description: usize,
    cost: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord, path: &Path) -> Result<Self, AppError> {
        let names: Vec<&str> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim())
            .collect();
        let locate = |column: &str| {
            names
                .iter()
                .position(|name| *name == column)
                .ok_or_else(|| AppError::MissingColumn {
                    path: path.to_path_buf(),
                    column: column.to_string(),
                })
        };

        // usage_type is reported first: without it the file cannot be filtered at all
        let usage_type = locate(USAGE_TYPE_COLUMN)?;
        let account_id = ACCOUNT_COLUMNS
            .iter()
            .find_map(|column| locate(*column).ok())
            .ok_or_else(|| AppError::MissingColumn {
                path: path.to_path_buf(),
                column: ACCOUNT_COLUMNS.join(" or "),
            })?;

        Ok(Self {
            account_id,
            month: locate(MONTH_COLUMN)?,
            usage_type,
            item_description: locate(ITEM_DESCRIPTION_COLUMN)?,
            cost: locate(COST_COLUMN)?,
        })
    }
}

/// Parse a cost cell. Billing exports sometimes use scientific notation.
pub fn parse_cost(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Read every record of a CSV export from any reader. `path` is only used
/// for error messages.
pub fn read_records<R: Read>(reader: R, path: &Path) -> Result<Vec<UsageRecord>, AppError> {
    let read_error = |e: csv::Error| AppError::ReadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = csv_reader.headers().map_err(read_error)?.clone();
    let index = ColumnIndex::from_headers(&headers, path)?;

    let mut records = Vec::new();
    for (line, result) in csv_reader.records().enumerate() {
        let row = result.map_err(read_error)?;
        let field = |i: usize| row.get(i).unwrap_or("").to_string();

        let raw_cost = row.get(index.cost).unwrap_or("");
        let cost = parse_cost(raw_cost);
        if cost.is_none() {
            tracing::warn!(
                path = %path.display(),
                row = line + 2,
                value = raw_cost,
                "Unparsable cost, counted as 0"
            );
        }

        records.push(UsageRecord {
            account_id: field(index.account_id),
            month: field(index.month),
            usage_type: field(index.usage_type),
            item_description: field(index.item_description),
            cost,
        });
    }

    Ok(records)
}

/// Read every record of a CSV export file
pub fn read_usage_file(path: &Path) -> Result<Vec<UsageRecord>, AppError> {
    let file = std::fs::File::open(path).map_err(|e| AppError::ReadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    read_records(std::io::BufReader::new(file), path)
}
