use clap::ValueEnum;
use std::collections::BTreeSet;

/// Substring marking Savings Plan negation line items in `item_description`
pub const NEGATION_MARKER: &str = "SavingsPlanNegation";

/// Dimension a report can be grouped by. The account is always part of the
/// grouping key; selecting it alone aggregates per account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum GroupKey {
    AccountId,
    Month,
    UsageType,
    ItemDescription,
}

/// How negation line items are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegationFilter {
    /// Keep every row
    Include,
    /// Drop negation rows
    Exclude,
    /// Keep only negation rows
    Only,
}

/// One filter + aggregate operation over usage records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageQuery {
    pub usage_type_substring: String,
    pub include_negation: bool,
    pub negation_only: bool,
    /// Empty means no aggregation
    pub group_by: BTreeSet<GroupKey>,
}

impl UsageQuery {
    pub fn new(usage_type_substring: impl Into<String>) -> Self {
        Self {
            usage_type_substring: usage_type_substring.into(),
            include_negation: true,
            negation_only: false,
            group_by: BTreeSet::new(),
        }
    }

    pub fn include_negation(mut self, include: bool) -> Self {
        self.include_negation = include;
        self
    }

    pub fn negation_only(mut self, only: bool) -> Self {
        self.negation_only = only;
        self
    }

    pub fn group_by(mut self, keys: impl IntoIterator<Item = GroupKey>) -> Self {
        self.group_by = keys.into_iter().collect();
        self
    }

    /// `negation_only` wins over `include_negation = false`
    pub fn negation_filter(&self) -> NegationFilter {
        if self.negation_only {
            NegationFilter::Only
        } else if !self.include_negation {
            NegationFilter::Exclude
        } else {
            NegationFilter::Include
        }
    }

    pub fn is_grouped(&self) -> bool {
        !self.group_by.is_empty()
    }

    pub fn groups(&self, key: GroupKey) -> bool {
        key == GroupKey::AccountId || self.group_by.contains(&key)
    }
}

/// Case-insensitive, unanchored substring test
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

pub fn is_negation(item_description: &str) -> bool {
    contains_ignore_case(item_description, NEGATION_MARKER)
}
