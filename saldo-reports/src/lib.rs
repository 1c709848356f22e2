//! saldo-reports: derived reporting datasets and CSV export

pub mod datasets;
pub mod export;
pub mod summary;

pub use datasets::{ReportSet, build_reports};
pub use export::{
    ExportError, export_all, write_breakdown_csv, write_ledger_csv, write_metrics_csv,
    write_summary_csv,
};
pub use summary::{BreakdownRow, MonthlySummaryRow, category_breakdown, monthly_summary};
