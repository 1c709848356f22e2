//! One-call generation of every reporting dataset from the three
//! transaction streams.

use saldo_core::{LedgerReport, Transaction, TypeLabels, compute_ledger};

use crate::summary::{BreakdownRow, MonthlySummaryRow, category_breakdown, monthly_summary};

/// Every dataset the reporting layer produces in one run
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSet {
    /// The savings ledger: denormalized rows plus the global-trend table
    pub ledger: LedgerReport,
    pub summary: Vec<MonthlySummaryRow>,
    pub expense_breakdown: Vec<BreakdownRow>,
    pub income_breakdown: Vec<BreakdownRow>,
}

/// Build all datasets. Streams may be empty; the corresponding tables come
/// back empty with the same shape.
pub fn build_reports(
    expenses: &[Transaction],
    income: &[Transaction],
    savings: &[Transaction],
    labels: &TypeLabels,
) -> ReportSet {
    ReportSet {
        ledger: compute_ledger(savings, labels),
        summary: monthly_summary(expenses, income),
        expense_breakdown: category_breakdown(expenses),
        income_breakdown: category_breakdown(income),
    }
}
