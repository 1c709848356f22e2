//! JSON report of rows that were set aside during ingestion, grouped by
//! source sheet so the offending spreadsheet rows are easy to find.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use saldo_core::SkippedRecord;
use serde::Serialize;
use tracing::info;

use crate::error::IngestError;

#[derive(Debug, Serialize)]
struct ReportSummary {
    total_skipped_rows: usize,
    sources_with_issues: usize,
}

#[derive(Debug, Serialize)]
struct SkippedReport<'a> {
    summary: ReportSummary,
    skipped_by_source: BTreeMap<&'a str, Vec<&'a SkippedRecord>>,
}

/// Write the skipped-rows report. A no-op when nothing was skipped.
pub fn write_skipped_report(
    path: impl AsRef<Path>,
    skipped: &[SkippedRecord],
) -> Result<(), IngestError> {
    if skipped.is_empty() {
        return Ok(());
    }

    let mut by_source: BTreeMap<&str, Vec<&SkippedRecord>> = BTreeMap::new();
    for record in skipped {
        by_source.entry(&record.source).or_default().push(record);
    }

    let report = SkippedReport {
        summary: ReportSummary {
            total_skipped_rows: skipped.len(),
            sources_with_issues: by_source.len(),
        },
        skipped_by_source: by_source,
    };

    let json = serde_json::to_string_pretty(&report)?;
    let path = path.as_ref();
    fs::write(path, json).map_err(|source| IngestError::Write {
        path: path.display().to_string(),
        source,
    })?;

    info!(path = %path.display(), rows = skipped.len(), "wrote skipped-rows report");
    Ok(())
}
