//! Record and table types for the savings ledger.

use chrono::{Datelike, NaiveDate};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LedgerError;

/// A single categorized transaction as handed over by ingestion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Date of the transaction (YYYY-MM-DD)
    pub date: NaiveDate,
    /// Human-readable description; not consulted by the engine
    pub description: String,
    /// Category label, e.g. "Vacation", "General"
    pub category: String,
    /// Raw category-type tag as it appeared in the sheet
    pub category_type: String,
    /// Positive = money added/allocated, negative = withdrawn/spent
    pub value: f64,
}

impl Transaction {
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        category: impl Into<String>,
        category_type: impl Into<String>,
        value: f64,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            category: category.into(),
            category_type: category_type.into(),
            value,
        }
    }

    /// The month bucket this transaction falls into
    pub fn month(&self) -> MonthKey {
        MonthKey::from_date(self.date)
    }

    /// Returns true if money came in (positive value)
    pub fn is_inflow(&self) -> bool {
        self.value > 0.0
    }

    /// Returns true if money went out (negative value)
    pub fn is_outflow(&self) -> bool {
        self.value < 0.0
    }
}

/// Year-month bucket used for all monthly aggregation.
///
/// Ordering derives from the `(year, month)` pair, so sorting by `MonthKey`
/// always matches calendar order regardless of how the key was formatted in
/// the source data. Serializes as `"YYYY-MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self, LedgerError> {
        if !(1..=12).contains(&month) {
            return Err(LedgerError::MalformedMonthKey(format!("{year}-{month}")));
        }
        Ok(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parse a `"YYYY-MM"` key. Anything that is not a real year-month is
    /// rejected here, before it can corrupt a sorted walk downstream.
    pub fn parse(s: &str) -> Result<Self, LedgerError> {
        let malformed = || LedgerError::MalformedMonthKey(s.to_string());
        let (year, month) = s.split_once('-').ok_or_else(malformed)?;
        let year: i32 = year.parse().map_err(|_| malformed())?;
        let month: u32 = month.parse().map_err(|_| malformed())?;
        Self::new(year, month)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(de::Error::custom)
    }
}

/// How a transaction's category-type tag counts toward the global metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CategoryKind {
    /// Money set aside and directly usable
    #[serde(rename = "savings")]
    Savings,
    /// Money earmarked/reserved, tracked separately until spent or released
    #[serde(rename = "allocation")]
    Allocation,
    /// Any unrecognized tag; outflows here still count as spending
    #[serde(rename = "other")]
    Other,
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CategoryKind::Savings => "savings",
            CategoryKind::Allocation => "allocation",
            CategoryKind::Other => "other",
        };
        f.write_str(s)
    }
}

/// One row of the denormalized ledger table: the monthly delta and running
/// balance for a `(month, category, kind)` group, with the global metrics
/// of that month attached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerRow {
    pub month: MonthKey,
    pub category: String,
    pub kind: CategoryKind,
    /// Net sum of transaction values in this month for this group
    pub monthly_delta: f64,
    /// Prefix sum of `monthly_delta` over all months up to this one,
    /// independent per (category, kind) key
    pub running_balance: f64,
    pub total_saved: f64,
    pub total_allocated: f64,
    pub total_spent: f64,
}

/// Global metrics as of the end of one month. A single shared value across
/// all categories of that month, not a per-category quantity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MonthlyMetrics {
    pub month: MonthKey,
    /// Cumulative positive Savings-type inflow
    pub total_saved: f64,
    /// Cumulative net of Allocation-type activity; may rise or fall
    pub total_allocated: f64,
    /// Cumulative outflow from non-Allocation categories
    pub total_spent: f64,
}

/// A record the pipeline refused, with enough context to fix the source row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkippedRecord {
    /// Where the record came from (sheet name, or "ledger" for engine checks)
    pub source: String,
    /// 1-based row number in the source
    pub row: usize,
    /// Display rendering of the offending record
    pub record: String,
    pub reason: String,
}

/// Output of one full aggregation run
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LedgerReport {
    /// Denormalized table, sorted by month then category
    pub rows: Vec<LedgerRow>,
    /// Companion global-trend table, one row per active month
    pub metrics: Vec<MonthlyMetrics>,
    /// Records the engine refused to classify or sum
    pub skipped: Vec<SkippedRecord>,
}

impl LedgerReport {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.metrics.is_empty()
    }
}
