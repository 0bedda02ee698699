//! Usage extraction pipeline
//!
//! sources -> glob resolution -> per-file read -> merge -> usage type filter
//! -> negation filter -> optional grouping -> sort -> report.
//!
//! Rows from every file are merged before grouping, so a key that appears in
//! several exports is aggregated once.

use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::output::TableData;
use crate::usage::format::render_cost;
use crate::usage::query::{contains_ignore_case, is_negation, GroupKey, NegationFilter, UsageQuery};
use crate::usage::record::{read_usage_file, UsageRecord};

/// Report column, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    AccountId,
    Month,
    UsageType,
    ItemDescription,
    Cost,
}

impl Column {
    pub fn header(self) -> &'static str {
        match self {
            Column::AccountId => "account_id",
            Column::Month => "month",
            Column::UsageType => "usage_type",
            Column::ItemDescription => "item_description",
            Column::Cost => "cost",
        }
    }
}

/// A report row: either a single record or the sum over a group.
/// Dimensions that are not part of the grouping key are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageRow {
    pub account_id: String,
    pub month: Option<String>,
    pub usage_type: Option<String>,
    pub item_description: Option<String>,
    pub cost: Decimal,
    /// Number of contributing records whose cost could not be parsed
    pub unparsable: usize,
}

impl From<UsageRecord> for UsageRow {
    fn from(record: UsageRecord) -> Self {
        Self {
            account_id: record.account_id,
            month: Some(record.month),
            usage_type: Some(record.usage_type),
            item_description: Some(record.item_description),
            cost: record.cost.unwrap_or(Decimal::ZERO),
            unparsable: usize::from(record.cost.is_none()),
        }
    }
}

/// Result of one extraction
#[derive(Debug, Clone)]
pub struct UsageReport {
    pub columns: Vec<Column>,
    pub rows: Vec<UsageRow>,
    /// Files that contributed records
    pub sources: Vec<PathBuf>,
}

impl UsageReport {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of every row's cost, `None` if it does not fit in a `Decimal`
    pub fn total_cost(&self) -> Option<Decimal> {
        self.rows
            .iter()
            .try_fold(Decimal::ZERO, |total, row| total.checked_add(row.cost))
    }

    /// Render cells as text. Cost formatting happens here and nowhere earlier.
    pub fn to_table(&self) -> TableData {
        let headers = self.columns.iter().map(|c| c.header().to_string()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|column| match column {
                        Column::AccountId => row.account_id.clone(),
                        Column::Month => row.month.clone().unwrap_or_default(),
                        Column::UsageType => row.usage_type.clone().unwrap_or_default(),
                        Column::ItemDescription => {
                            row.item_description.clone().unwrap_or_default()
                        }
                        Column::Cost => render_cost(row.cost, row.unparsable),
                    })
                    .collect()
            })
            .collect();

        TableData { headers, rows }
    }
}

/// Runs a [`UsageQuery`] over one or more cost exports
#[derive(Debug, Clone)]
pub struct UsageExtractor {
    query: UsageQuery,
}

impl UsageExtractor {
    pub fn new(query: UsageQuery) -> Self {
        Self { query }
    }

    /// Resolve `sources` (paths or glob patterns), merge every readable
    /// export and build the report.
    ///
    /// # Errors
    /// - `NoInputFiles` if no pattern matched a file
    /// - `MissingColumn` if every matched file lacked a required column
    /// - `ReadError` if a matched file could not be read or parsed
    /// - `CostOverflow` if a grouped sum does not fit in a `Decimal`
    pub fn extract(&self, sources: &[String]) -> Result<UsageReport, AppError> {
        let loaded = LoadedUsage::load(sources)?;
        self.report_loaded(&loaded)
    }

    /// Build a report from exports that were already read, so several
    /// queries can share one pass over the files
    pub fn report_loaded(&self, loaded: &LoadedUsage) -> Result<UsageReport, AppError> {
        let mut report = self.report(loaded.records.clone())?;
        report.sources = loaded.sources.clone();
        Ok(report)
    }

    /// Build a report from records that are already in memory
    pub fn report(&self, records: Vec<UsageRecord>) -> Result<UsageReport, AppError> {
        let filtered = filter_records(records, &self.query);
        debug!(rows = filtered.len(), "Rows after filtering");

        let mut rows = if self.query.is_grouped() {
            aggregate(filtered, &self.query)?
        } else {
            filtered.into_iter().map(UsageRow::from).collect()
        };
        sort_rows(&mut rows);

        Ok(UsageReport {
            columns: report_columns(&self.query),
            rows,
            sources: Vec::new(),
        })
    }
}

/// Records of every readable export matched by a set of sources
#[derive(Debug, Clone, Default)]
pub struct LoadedUsage {
    pub records: Vec<UsageRecord>,
    /// Files that contributed records
    pub sources: Vec<PathBuf>,
}

impl LoadedUsage {
    /// Resolve and read every source once
    pub fn load(sources: &[String]) -> Result<Self, AppError> {
        let paths = resolve_sources(sources)?;
        let (records, sources) = load_sources(&paths)?;
        Ok(Self { records, sources })
    }
}

/// Expand each source as a glob pattern. A source naming an existing file is
/// taken literally, so names containing `[` or `]` still resolve. A pattern
/// that matches nothing is only a warning; matching nothing overall is an
/// error.
pub fn resolve_sources(patterns: &[String]) -> Result<Vec<PathBuf>, AppError> {
    let mut seen = HashSet::new();
    let mut paths = Vec::new();

    for pattern in patterns {
        let literal = Path::new(pattern);
        if literal.is_file() {
            if seen.insert(literal.to_path_buf()) {
                paths.push(literal.to_path_buf());
            }
            continue;
        }

        let entries = glob::glob(pattern).map_err(|e| AppError::InvalidPattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;

        let mut matched = 0usize;
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => {
                    matched += 1;
                    if seen.insert(path.clone()) {
                        paths.push(path);
                    }
                }
                Ok(_) => {}
                Err(e) => warn!(pattern = %pattern, error = %e, "Skipping unreadable path"),
            }
        }

        if matched == 0 {
            warn!(pattern = %pattern, "No files matched pattern");
        }
    }

    if paths.is_empty() {
        return Err(AppError::NoInputFiles {
            patterns: patterns.to_vec(),
        });
    }

    Ok(paths)
}

/// Read and concatenate every file. A file missing a required column is
/// skipped with a warning; if no file could be used, that error is returned.
pub fn load_sources(paths: &[PathBuf]) -> Result<(Vec<UsageRecord>, Vec<PathBuf>), AppError> {
    let mut records = Vec::new();
    let mut loaded = Vec::new();
    let mut last_skipped = None;

    for path in paths {
        info!(path = %path.display(), "Processing file");
        match read_usage_file(path) {
            Ok(mut file_records) => {
                debug!(path = %path.display(), rows = file_records.len(), "Read usage export");
                records.append(&mut file_records);
                loaded.push(path.clone());
            }
            Err(e @ AppError::MissingColumn { .. }) => {
                warn!(path = %path.display(), error = %e, "Skipping file");
                last_skipped = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    match last_skipped {
        Some(e) if loaded.is_empty() => Err(e),
        _ => Ok((records, loaded)),
    }
}

/// Usage type substring match followed by the negation filter
pub fn filter_records(records: Vec<UsageRecord>, query: &UsageQuery) -> Vec<UsageRecord> {
    let negation = query.negation_filter();

    records
        .into_iter()
        .filter(|record| contains_ignore_case(&record.usage_type, &query.usage_type_substring))
        .filter(|record| match negation {
            NegationFilter::Include => true,
            NegationFilter::Exclude => !is_negation(&record.item_description),
            NegationFilter::Only => is_negation(&record.item_description),
        })
        .collect()
}

type GroupingKey = (String, Option<String>, Option<String>, Option<String>);

/// Sum costs per `{account_id} ∪ group_by` key
///
/// # Errors
/// `CostOverflow` if a group's sum does not fit in a `Decimal`
pub fn aggregate(
    records: Vec<UsageRecord>,
    query: &UsageQuery,
) -> Result<Vec<UsageRow>, AppError> {
    let keep = |key: GroupKey, value: String| query.groups(key).then_some(value);
    let mut groups: BTreeMap<GroupingKey, (Decimal, usize)> = BTreeMap::new();

    for record in records {
        let key = (
            record.account_id,
            keep(GroupKey::Month, record.month),
            keep(GroupKey::UsageType, record.usage_type),
            keep(GroupKey::ItemDescription, record.item_description),
        );
        match record.cost {
            Some(cost) => {
                let sum = groups.get(&key).map_or(Decimal::ZERO, |entry| entry.0);
                let sum = sum
                    .checked_add(cost)
                    .ok_or_else(|| AppError::CostOverflow(describe_key(&key)))?;
                groups.entry(key).or_insert((Decimal::ZERO, 0)).0 = sum;
            }
            None => groups.entry(key).or_insert((Decimal::ZERO, 0)).1 += 1,
        }
    }

    let rows = groups
        .into_iter()
        .map(|((account_id, month, usage_type, item_description), (cost, unparsable))| {
            UsageRow {
                account_id,
                month,
                usage_type,
                item_description,
                cost,
                unparsable,
            }
        })
        .collect();

    Ok(rows)
}

fn describe_key(key: &GroupingKey) -> String {
    let (account_id, month, usage_type, item_description) = key;
    std::iter::once(account_id.as_str())
        .chain(month.as_deref())
        .chain(usage_type.as_deref())
        .chain(item_description.as_deref())
        .collect::<Vec<_>>()
        .join(" / ")
}

/// Stable sort by month, usage type, then item description; dimensions that
/// were grouped away are `None` on every row and so never reorder anything.
pub fn sort_rows(rows: &mut [UsageRow]) {
    rows.sort_by(|a, b| {
        let left = (&a.month, &a.usage_type, &a.item_description);
        let right = (&b.month, &b.usage_type, &b.item_description);
        left.cmp(&right)
    });
}

fn report_columns(query: &UsageQuery) -> Vec<Column> {
    let shown = |key: GroupKey| !query.is_grouped() || query.groups(key);

    let mut columns = vec![Column::AccountId];
    if shown(GroupKey::Month) {
        columns.push(Column::Month);
    }
    if shown(GroupKey::UsageType) {
        columns.push(Column::UsageType);
    }
    if shown(GroupKey::ItemDescription) {
        columns.push(Column::ItemDescription);
    }
    columns.push(Column::Cost);
    columns
}
