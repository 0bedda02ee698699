//! Usage extraction from cost and usage exports

pub mod extractor;
pub mod format;
pub mod query;
pub mod record;

pub use extractor::{Column, LoadedUsage, UsageExtractor, UsageReport, UsageRow};
pub use format::format_cost;
pub use query::{GroupKey, NegationFilter, UsageQuery};
pub use record::UsageRecord;
