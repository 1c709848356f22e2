//! Shared ingestion types: sheet kinds, column mapping, per-run options.

use std::collections::BTreeMap;

use saldo_core::{SkippedRecord, Transaction};
use serde::{Deserialize, Serialize};

/// The three sheet flavors the pipeline understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SheetKind {
    Expenses,
    Income,
    Savings,
}

impl SheetKind {
    pub fn name(&self) -> &'static str {
        match self {
            SheetKind::Expenses => "expenses",
            SheetKind::Income => "income",
            SheetKind::Savings => "savings",
        }
    }

    /// Only the savings sheet carries a category-type column
    pub fn has_category_type(&self) -> bool {
        matches!(self, SheetKind::Savings)
    }
}

/// Maps localized sheet headers onto canonical record fields
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnMap {
    pub date: String,
    pub description: String,
    pub category: String,
    pub value: String,
    /// Category-type column; consulted for the savings sheet only
    pub category_type: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        // Header names as exported by the source spreadsheets
        Self {
            date: "Data".to_string(),
            description: "Descrizione".to_string(),
            category: "Categoria".to_string(),
            value: "Importo".to_string(),
            category_type: "Tipo".to_string(),
        }
    }
}

/// Per-sheet ingestion options
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngestOptions {
    pub columns: ColumnMap,
    /// Accepted categories for the sheet; empty accepts anything non-empty
    pub valid_categories: Vec<String>,
    /// Substitute for missing or unknown categories
    pub default_category: String,
    /// Rewrites localized savings-type tags to canonical labels
    pub type_aliases: BTreeMap<String, String>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        let mut type_aliases = BTreeMap::new();
        type_aliases.insert("Accantonamento".to_string(), "Allocation".to_string());
        type_aliases.insert("Risparmio".to_string(), "Savings".to_string());

        Self {
            columns: ColumnMap::default(),
            valid_categories: Vec::new(),
            default_category: "Miscellaneous".to_string(),
            type_aliases,
        }
    }
}

/// Everything a sheet read produced: the usable records plus the rows that
/// had to be set aside, so partial results stay usable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetData {
    pub transactions: Vec<Transaction>,
    pub skipped: Vec<SkippedRecord>,
}
