//! CSV export of every reporting dataset, with monetary columns rendered
//! to two decimal places.

use std::fs;
use std::path::Path;

use saldo_core::{LedgerRow, MonthlyMetrics};
use thiserror::Error;
use tracing::info;

use crate::datasets::ReportSet;
use crate::summary::{BreakdownRow, MonthlySummaryRow};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("cannot create output directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

fn money(value: f64) -> String {
    format!("{value:.2}")
}

fn writer(path: &Path) -> Result<csv::Writer<fs::File>, ExportError> {
    csv::Writer::from_path(path).map_err(|source| ExportError::Csv {
        path: path.display().to_string(),
        source,
    })
}

fn finish(mut wtr: csv::Writer<fs::File>, path: &Path) -> Result<(), ExportError> {
    wtr.flush().map_err(|source| ExportError::Csv {
        path: path.display().to_string(),
        source: csv::Error::from(source),
    })
}

/// Write the denormalized savings ledger table
pub fn write_ledger_csv(path: impl AsRef<Path>, rows: &[LedgerRow]) -> Result<(), ExportError> {
    let path = path.as_ref();
    let mut wtr = writer(path)?;
    let write_err = |source| ExportError::Csv {
        path: path.display().to_string(),
        source,
    };

    wtr.write_record([
        "month",
        "category",
        "category_type",
        "monthly_delta",
        "running_balance",
        "total_saved",
        "total_allocated",
        "total_spent",
    ])
    .map_err(write_err)?;

    for row in rows {
        wtr.write_record([
            row.month.to_string(),
            row.category.clone(),
            row.kind.to_string(),
            money(row.monthly_delta),
            money(row.running_balance),
            money(row.total_saved),
            money(row.total_allocated),
            money(row.total_spent),
        ])
        .map_err(write_err)?;
    }
    finish(wtr, path)
}

/// Write the companion global-trend table
pub fn write_metrics_csv(
    path: impl AsRef<Path>,
    metrics: &[MonthlyMetrics],
) -> Result<(), ExportError> {
    let path = path.as_ref();
    let mut wtr = writer(path)?;
    let write_err = |source| ExportError::Csv {
        path: path.display().to_string(),
        source,
    };

    wtr.write_record(["month", "total_saved", "total_allocated", "total_spent"])
        .map_err(write_err)?;
    for m in metrics {
        wtr.write_record([
            m.month.to_string(),
            money(m.total_saved),
            money(m.total_allocated),
            money(m.total_spent),
        ])
        .map_err(write_err)?;
    }
    finish(wtr, path)
}

pub fn write_summary_csv(
    path: impl AsRef<Path>,
    rows: &[MonthlySummaryRow],
) -> Result<(), ExportError> {
    let path = path.as_ref();
    let mut wtr = writer(path)?;
    let write_err = |source| ExportError::Csv {
        path: path.display().to_string(),
        source,
    };

    wtr.write_record(["month", "income", "expenses", "balance"])
        .map_err(write_err)?;
    for row in rows {
        wtr.write_record([
            row.month.to_string(),
            money(row.income),
            money(row.expenses),
            money(row.balance),
        ])
        .map_err(write_err)?;
    }
    finish(wtr, path)
}

pub fn write_breakdown_csv(
    path: impl AsRef<Path>,
    rows: &[BreakdownRow],
) -> Result<(), ExportError> {
    let path = path.as_ref();
    let mut wtr = writer(path)?;
    let write_err = |source| ExportError::Csv {
        path: path.display().to_string(),
        source,
    };

    wtr.write_record(["month", "category", "total"])
        .map_err(write_err)?;
    for row in rows {
        wtr.write_record([row.month.to_string(), row.category.clone(), money(row.total)])
            .map_err(write_err)?;
    }
    finish(wtr, path)
}

/// Write every dataset of a report set under one output directory
pub fn export_all(dir: impl AsRef<Path>, set: &ReportSet) -> Result<(), ExportError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|source| ExportError::CreateDir {
        path: dir.display().to_string(),
        source,
    })?;

    write_ledger_csv(dir.join("savings_ledger.csv"), &set.ledger.rows)?;
    write_metrics_csv(dir.join("savings_metrics.csv"), &set.ledger.metrics)?;
    write_summary_csv(dir.join("monthly_summary.csv"), &set.summary)?;
    write_breakdown_csv(dir.join("expense_breakdown.csv"), &set.expense_breakdown)?;
    write_breakdown_csv(dir.join("income_breakdown.csv"), &set.income_breakdown)?;

    info!(dir = %dir.display(), "exported reporting datasets");
    Ok(())
}
