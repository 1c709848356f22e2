//! Derived reporting datasets beyond the savings ledger: the monthly
//! income/expense/balance summary and per-category breakdowns.

use std::collections::BTreeMap;

use saldo_core::{MonthKey, Transaction};
use serde::{Deserialize, Serialize};

/// Income, expenses, and their balance for one month
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MonthlySummaryRow {
    pub month: MonthKey,
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
}

/// Net sum for one (month, category) group of a single stream
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BreakdownRow {
    pub month: MonthKey,
    pub category: String,
    pub total: f64,
}

/// Build the per-month summary over both streams. Months present in either
/// stream appear once, with the absent side filled as zero; rows come back
/// in month order.
pub fn monthly_summary(
    expenses: &[Transaction],
    income: &[Transaction],
) -> Vec<MonthlySummaryRow> {
    let mut months: BTreeMap<MonthKey, (f64, f64)> = BTreeMap::new();

    for txn in expenses {
        months.entry(txn.month()).or_default().0 += txn.value;
    }
    for txn in income {
        months.entry(txn.month()).or_default().1 += txn.value;
    }

    months
        .into_iter()
        .map(|(month, (expenses, income))| MonthlySummaryRow {
            month,
            income,
            expenses,
            balance: income - expenses,
        })
        .collect()
}

/// Sum one stream by (month, category), sorted by month then category
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<BreakdownRow> {
    let mut groups: BTreeMap<(MonthKey, String), f64> = BTreeMap::new();

    for txn in transactions {
        *groups
            .entry((txn.month(), txn.category.clone()))
            .or_default() += txn.value;
    }

    groups
        .into_iter()
        .map(|((month, category), total)| BreakdownRow {
            month,
            category,
            total,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn txn(date: (i32, u32, u32), category: &str, value: f64) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            "test",
            category,
            "",
            value,
        )
    }

    #[test]
    fn test_monthly_summary_balances() {
        let expenses = vec![
            txn((2025, 1, 5), "Groceries", 100.0),
            txn((2025, 1, 20), "Rent", 800.0),
        ];
        let income = vec![txn((2025, 1, 1), "Salary", 1500.0)];

        let summary = monthly_summary(&expenses, &income);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].expenses, 900.0);
        assert_eq!(summary[0].income, 1500.0);
        assert_eq!(summary[0].balance, 600.0);
    }

    #[test]
    fn test_monthly_summary_unions_months() {
        // Expenses only in Jan, income only in Feb: both months appear,
        // missing side zero-filled
        let expenses = vec![txn((2025, 1, 5), "Groceries", 50.0)];
        let income = vec![txn((2025, 2, 1), "Salary", 1500.0)];

        let summary = monthly_summary(&expenses, &income);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].income, 0.0);
        assert_eq!(summary[0].balance, -50.0);
        assert_eq!(summary[1].expenses, 0.0);
        assert_eq!(summary[1].balance, 1500.0);
    }

    #[test]
    fn test_breakdown_groups_and_sorts() {
        let txns = vec![
            txn((2025, 2, 1), "Rent", 800.0),
            txn((2025, 1, 5), "Groceries", 60.0),
            txn((2025, 1, 18), "Groceries", 40.0),
        ];

        let breakdown = category_breakdown(&txns);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].category, "Groceries");
        assert_eq!(breakdown[0].total, 100.0);
        assert_eq!(breakdown[1].category, "Rent");
        assert_eq!(breakdown[1].month, MonthKey::new(2025, 2).unwrap());
    }

    #[test]
    fn test_empty_streams_yield_empty_tables() {
        assert!(monthly_summary(&[], &[]).is_empty());
        assert!(category_breakdown(&[]).is_empty());
    }
}
