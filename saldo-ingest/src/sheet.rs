//! CSV sheet reader: header mapping, cleanup, and per-row validation.
//!
//! Rows that cannot be parsed are collected as `SkippedRecord`s with their
//! row number and reason rather than aborting the file; only a missing file
//! or a missing mapped column is fatal.

use std::path::Path;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use saldo_core::{SkippedRecord, Transaction};
use tracing::warn;

use crate::error::IngestError;
use crate::types::{IngestOptions, SheetData, SheetKind};

/// Resolved header positions for one sheet
struct ColumnIndexes {
    date: usize,
    description: usize,
    category: usize,
    value: usize,
    category_type: Option<usize>,
}

/// Read one sheet CSV into canonical transactions.
pub fn read_sheet(
    path: impl AsRef<Path>,
    kind: SheetKind,
    opts: &IngestOptions,
) -> Result<SheetData, IngestError> {
    let path = path.as_ref();
    let read_err = |source| IngestError::Read {
        sheet: kind.name(),
        path: path.display().to_string(),
        source,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(read_err)?;

    let headers = rdr.headers().map_err(read_err)?.clone();
    let cols = resolve_columns(&headers, kind, opts)?;

    let mut data = SheetData::default();

    for (i, result) in rdr.records().enumerate() {
        // Header is row 1, so data rows start at 2
        let row = i + 2;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                data.skipped.push(skip(kind, row, "", format!("unreadable row: {e}")));
                continue;
            }
        };
        let field = |idx: usize| record.get(idx).unwrap_or("").trim();

        // Rows with no date are blank spreadsheet tails; drop them silently
        let raw_date = field(cols.date);
        if raw_date.is_empty() {
            continue;
        }

        let Some(date) = parse_date(raw_date) else {
            data.skipped
                .push(skip(kind, row, raw_date, format!("unparseable date {raw_date:?}")));
            continue;
        };

        let raw_value = field(cols.value);
        let Some(value) = clean_value(raw_value) else {
            data.skipped
                .push(skip(kind, row, raw_value, format!("unparseable value {raw_value:?}")));
            continue;
        };

        let category = normalize_category(field(cols.category), kind, opts);
        let category_type = match cols.category_type {
            Some(idx) => translate_type(field(idx), opts),
            None => String::new(),
        };

        data.transactions.push(Transaction::new(
            date,
            field(cols.description),
            category,
            category_type,
            value,
        ));
    }

    Ok(data)
}

fn resolve_columns(
    headers: &csv::StringRecord,
    kind: SheetKind,
    opts: &IngestOptions,
) -> Result<ColumnIndexes, IngestError> {
    let find = |name: &str| -> Result<usize, IngestError> {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| IngestError::MissingColumn {
                sheet: kind.name(),
                column: name.to_string(),
            })
    };

    let category_type = if kind.has_category_type() {
        Some(find(&opts.columns.category_type)?)
    } else {
        None
    };

    Ok(ColumnIndexes {
        date: find(&opts.columns.date)?,
        description: find(&opts.columns.description)?,
        category: find(&opts.columns.category)?,
        value: find(&opts.columns.value)?,
        category_type,
    })
}

/// Parse the date formats seen in the source sheets: DD/MM/YY, DD/MM/YYYY,
/// and ISO YYYY-MM-DD.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    const FORMATS: [&str; 3] = ["%d/%m/%y", "%d/%m/%Y", "%Y-%m-%d"];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Clean a monetary string into a 2-decimal f64: strip currency symbols and
/// spaces, accept comma as the decimal separator.
fn clean_value(raw: &str) -> Option<f64> {
    static CLEAN_RE: OnceLock<Regex> = OnceLock::new();
    let re = CLEAN_RE.get_or_init(|| Regex::new(r"[^\d,.\-]").unwrap());

    let cleaned = re.replace_all(raw, "").replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    let value: f64 = cleaned.parse().ok()?;
    Some((value * 100.0).round() / 100.0)
}

/// Validate a category against the configured list, substituting the
/// default for missing or unknown labels.
fn normalize_category(raw: &str, kind: SheetKind, opts: &IngestOptions) -> String {
    if raw.is_empty() {
        warn!(
            sheet = kind.name(),
            default = %opts.default_category,
            "record with no category, using default"
        );
        return opts.default_category.clone();
    }

    if !opts.valid_categories.is_empty() && !opts.valid_categories.iter().any(|c| c == raw) {
        warn!(
            sheet = kind.name(),
            category = raw,
            default = %opts.default_category,
            "unknown category, using default"
        );
        return opts.default_category.clone();
    }

    raw.to_string()
}

/// Rewrite a localized savings-type tag to its canonical label
fn translate_type(raw: &str, opts: &IngestOptions) -> String {
    opts.type_aliases
        .get(raw)
        .cloned()
        .unwrap_or_else(|| raw.to_string())
}

fn skip(kind: SheetKind, row: usize, record: &str, reason: String) -> SkippedRecord {
    SkippedRecord {
        source: kind.name().to_string(),
        row,
        record: record.to_string(),
        reason,
    }
}
