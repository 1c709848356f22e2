//! The savings ledger aggregation engine.
//!
//! Turns a classified transaction log into per-category monthly deltas with
//! running balances, plus three global monthly metrics (saved, allocated,
//! spent) attached uniformly to every row of a month.
//!
//! Running balances are independent prefix sums per `(category, kind)` key.
//! Only the global metrics walk is sequential: each month's totals build on
//! the previous month's.

use std::collections::{BTreeMap, HashMap};

use tracing::warn;

use crate::classify::TypeLabels;
use crate::model::{
    CategoryKind, LedgerReport, LedgerRow, MonthKey, MonthlyMetrics, SkippedRecord, Transaction,
};

/// A transaction that survived validation, with its derived month and kind
#[derive(Debug, Clone, Copy)]
struct Classified<'a> {
    txn: &'a Transaction,
    month: MonthKey,
    kind: CategoryKind,
}

/// One `(month, category, kind)` group before balances are attached
#[derive(Debug, Clone, PartialEq)]
struct MonthlyDelta {
    month: MonthKey,
    category: String,
    kind: CategoryKind,
    delta: f64,
}

/// Run the full engine over a transaction log.
///
/// Single pass to classify and group, one sorted walk for the metrics, then
/// the merge. Recomputes from scratch on every call; no state survives
/// between runs. Empty input yields empty tables, not an error.
pub fn compute_ledger(transactions: &[Transaction], labels: &TypeLabels) -> LedgerReport {
    let (classified, skipped) = validate(transactions, labels);

    let deltas = aggregate_monthly(&classified);
    let balances = running_balances(deltas);
    let metrics = global_metrics(&classified);
    let rows = merge(balances, &metrics);

    LedgerReport {
        rows,
        metrics,
        skipped,
    }
}

/// Per-record validation. Ingestion is expected to have filtered malformed
/// records already; anything the engine cannot classify or sum is collected
/// here instead of poisoning the aggregates.
fn validate<'a>(
    transactions: &'a [Transaction],
    labels: &TypeLabels,
) -> (Vec<Classified<'a>>, Vec<SkippedRecord>) {
    let mut classified = Vec::with_capacity(transactions.len());
    let mut skipped = Vec::new();

    for (i, txn) in transactions.iter().enumerate() {
        let reason = if !txn.value.is_finite() {
            Some("non-finite value")
        } else if txn.category.trim().is_empty() {
            Some("empty category")
        } else {
            None
        };

        if let Some(reason) = reason {
            warn!(row = i + 1, reason, "skipping transaction");
            skipped.push(SkippedRecord {
                source: "ledger".to_string(),
                row: i + 1,
                record: format!(
                    "{} | {} | {} | {}",
                    txn.date, txn.description, txn.category, txn.value
                ),
                reason: reason.to_string(),
            });
            continue;
        }

        classified.push(Classified {
            txn,
            month: txn.month(),
            kind: labels.classify(&txn.category_type),
        });
    }

    (classified, skipped)
}

/// Group by `(month, category, kind)` and sum values into monthly deltas.
/// Group order is irrelevant here; the merge step imposes the final order.
fn aggregate_monthly(classified: &[Classified<'_>]) -> Vec<MonthlyDelta> {
    let mut groups: HashMap<(MonthKey, String, CategoryKind), f64> = HashMap::new();

    for c in classified {
        *groups
            .entry((c.month, c.txn.category.clone(), c.kind))
            .or_default() += c.txn.value;
    }

    groups
        .into_iter()
        .map(|((month, category, kind), delta)| MonthlyDelta {
            month,
            category,
            kind,
            delta,
        })
        .collect()
}

/// Prefix-sum each `(category, kind)` key's deltas in month order.
///
/// Each key is an independent computation: a month with no activity for a
/// key produces no row for that key and does not reset its balance.
fn running_balances(deltas: Vec<MonthlyDelta>) -> Vec<(MonthlyDelta, f64)> {
    let mut partitions: HashMap<(String, CategoryKind), Vec<MonthlyDelta>> = HashMap::new();

    for delta in deltas {
        partitions
            .entry((delta.category.clone(), delta.kind))
            .or_default()
            .push(delta);
    }

    let mut out = Vec::new();
    for (_, mut rows) in partitions {
        rows.sort_by_key(|r| r.month);
        let mut balance = 0.0;
        for row in rows {
            balance += row.delta;
            out.push((row, balance));
        }
    }
    out
}

/// Advance the three global scalars across all active months in order.
///
/// Accrual rules per month:
/// - saved: positive Savings-type values only (negative Savings-type values
///   are invisible to this metric)
/// - allocated: positive Allocation values minus the absolute value of
///   negative Allocation values
/// - spent: absolute sum of negative values outside Allocation (an outflow
///   from an earmarked pot reduces `allocated`, it is not spending)
fn global_metrics(classified: &[Classified<'_>]) -> Vec<MonthlyMetrics> {
    let mut by_month: BTreeMap<MonthKey, Vec<&Classified<'_>>> = BTreeMap::new();
    for c in classified {
        by_month.entry(c.month).or_default().push(c);
    }

    let mut total_saved = 0.0;
    let mut total_allocated = 0.0;
    let mut total_spent = 0.0;

    let mut metrics = Vec::with_capacity(by_month.len());
    for (month, txns) in by_month {
        let saved: f64 = txns
            .iter()
            .filter(|c| c.kind == CategoryKind::Savings && c.txn.value > 0.0)
            .map(|c| c.txn.value)
            .sum();
        let added: f64 = txns
            .iter()
            .filter(|c| c.kind == CategoryKind::Allocation && c.txn.value > 0.0)
            .map(|c| c.txn.value)
            .sum();
        let withdrawn: f64 = txns
            .iter()
            .filter(|c| c.kind == CategoryKind::Allocation && c.txn.value < 0.0)
            .map(|c| c.txn.value)
            .sum::<f64>()
            .abs();
        let outflow: f64 = txns
            .iter()
            .filter(|c| c.kind != CategoryKind::Allocation && c.txn.value < 0.0)
            .map(|c| c.txn.value)
            .sum::<f64>()
            .abs();

        total_saved += saved;
        total_allocated += added - withdrawn;
        total_spent += outflow;

        metrics.push(MonthlyMetrics {
            month,
            total_saved,
            total_allocated,
            total_spent,
        });
    }
    metrics
}

/// Left-join balance rows to the metrics of their month and impose the
/// output order. A row whose month has no metrics row gets zeros rather
/// than a hole, so the table never carries missing metric columns.
fn merge(balances: Vec<(MonthlyDelta, f64)>, metrics: &[MonthlyMetrics]) -> Vec<LedgerRow> {
    let by_month: HashMap<MonthKey, &MonthlyMetrics> =
        metrics.iter().map(|m| (m.month, m)).collect();

    let mut rows: Vec<LedgerRow> = balances
        .into_iter()
        .map(|(delta, running_balance)| {
            let m = by_month.get(&delta.month);
            LedgerRow {
                month: delta.month,
                category: delta.category,
                kind: delta.kind,
                monthly_delta: delta.delta,
                running_balance,
                total_saved: m.map_or(0.0, |m| m.total_saved),
                total_allocated: m.map_or(0.0, |m| m.total_allocated),
                total_spent: m.map_or(0.0, |m| m.total_spent),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        (a.month, &a.category, a.kind).cmp(&(b.month, &b.category, b.kind))
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn txn(date: (i32, u32, u32), category: &str, kind: &str, value: f64) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            "test",
            category,
            kind,
            value,
        )
    }

    fn month(year: i32, month: u32) -> MonthKey {
        MonthKey::new(year, month).unwrap()
    }

    #[test]
    fn test_empty_input_yields_empty_tables() {
        let report = compute_ledger(&[], &TypeLabels::default());
        assert!(report.rows.is_empty());
        assert!(report.metrics.is_empty());
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_monthly_delta_sums_within_group() {
        let txns = vec![
            txn((2025, 1, 3), "Vacation", "Allocation", 100.0),
            txn((2025, 1, 20), "Vacation", "Allocation", 50.0),
            txn((2025, 1, 21), "Vacation", "Savings", 10.0),
        ];
        let report = compute_ledger(&txns, &TypeLabels::default());

        // Same category, same month, different kind: two separate rows
        assert_eq!(report.rows.len(), 2);
        let alloc = report
            .rows
            .iter()
            .find(|r| r.kind == CategoryKind::Allocation)
            .unwrap();
        assert_eq!(alloc.monthly_delta, 150.0);
        let savings = report
            .rows
            .iter()
            .find(|r| r.kind == CategoryKind::Savings)
            .unwrap();
        assert_eq!(savings.monthly_delta, 10.0);
    }

    #[test]
    fn test_running_balance_skips_inactive_months_without_reset() {
        // Activity in Jan and Mar only: Mar balance is Jan + Mar, no Feb row
        let txns = vec![
            txn((2025, 1, 5), "Emergency", "Savings", 200.0),
            txn((2025, 3, 5), "Emergency", "Savings", 50.0),
        ];
        let report = compute_ledger(&txns, &TypeLabels::default());

        assert_eq!(report.rows.len(), 2);
        assert!(report.rows.iter().all(|r| r.month != month(2025, 2)));
        let mar = report
            .rows
            .iter()
            .find(|r| r.month == month(2025, 3))
            .unwrap();
        assert_eq!(mar.running_balance, 250.0);
    }

    #[test]
    fn test_running_balances_independent_per_key() {
        let txns = vec![
            txn((2025, 1, 1), "Vacation", "Allocation", 100.0),
            txn((2025, 2, 1), "Vacation", "Allocation", -30.0),
            txn((2025, 1, 1), "Emergency", "Savings", 500.0),
            txn((2025, 2, 1), "Emergency", "Savings", 500.0),
        ];
        let report = compute_ledger(&txns, &TypeLabels::default());

        let feb_vacation = report
            .rows
            .iter()
            .find(|r| r.category == "Vacation" && r.month == month(2025, 2))
            .unwrap();
        assert_eq!(feb_vacation.running_balance, 70.0);

        let feb_emergency = report
            .rows
            .iter()
            .find(|r| r.category == "Emergency" && r.month == month(2025, 2))
            .unwrap();
        assert_eq!(feb_emergency.running_balance, 1000.0);
    }

    #[test]
    fn test_metrics_emitted_for_every_active_month() {
        // Feb has only an Other-type transaction; it must still get a
        // metrics row, carrying January's totals forward
        let txns = vec![
            txn((2025, 1, 1), "Emergency", "Savings", 100.0),
            txn((2025, 2, 1), "Groceries", "Expense", 25.0),
        ];
        let report = compute_ledger(&txns, &TypeLabels::default());

        assert_eq!(report.metrics.len(), 2);
        let feb = &report.metrics[1];
        assert_eq!(feb.month, month(2025, 2));
        assert_eq!(feb.total_saved, 100.0);
        assert_eq!(feb.total_spent, 0.0);
    }

    #[test]
    fn test_allocation_withdrawal_reduces_allocated_not_spent() {
        let txns = vec![
            txn((2025, 1, 1), "Vacation", "Allocation", 100.0),
            txn((2025, 2, 1), "Vacation", "Allocation", -40.0),
        ];
        let report = compute_ledger(&txns, &TypeLabels::default());

        let feb = &report.metrics[1];
        assert_eq!(feb.total_allocated, 60.0);
        assert_eq!(feb.total_spent, 0.0);
    }

    #[test]
    fn test_negative_savings_invisible_to_saved_total() {
        // Withdrawals from a pure-savings category do not reduce the saved
        // total, but they do count as spending and do move the balance
        let txns = vec![
            txn((2025, 1, 1), "Emergency", "Savings", 100.0),
            txn((2025, 2, 1), "Emergency", "Savings", -30.0),
        ];
        let report = compute_ledger(&txns, &TypeLabels::default());

        let feb = &report.metrics[1];
        assert_eq!(feb.total_saved, 100.0);
        assert_eq!(feb.total_spent, 30.0);

        let feb_row = report
            .rows
            .iter()
            .find(|r| r.month == month(2025, 2))
            .unwrap();
        assert_eq!(feb_row.running_balance, 70.0);
    }

    #[test]
    fn test_unrecognized_type_outflow_counts_as_spending() {
        let txns = vec![txn((2025, 1, 10), "Groceries", "Mystery", -40.0)];
        let report = compute_ledger(&txns, &TypeLabels::default());

        assert_eq!(report.metrics[0].total_spent, 40.0);
        assert_eq!(report.rows[0].kind, CategoryKind::Other);
    }

    #[test]
    fn test_metrics_attached_to_every_row_of_month() {
        let txns = vec![
            txn((2025, 1, 1), "Vacation", "Allocation", 100.0),
            txn((2025, 1, 2), "Emergency", "Savings", 50.0),
            txn((2025, 1, 3), "Groceries", "Expense", -10.0),
        ];
        let report = compute_ledger(&txns, &TypeLabels::default());

        assert_eq!(report.rows.len(), 3);
        for row in &report.rows {
            assert_eq!(row.total_saved, 50.0);
            assert_eq!(row.total_allocated, 100.0);
            assert_eq!(row.total_spent, 10.0);
        }
    }

    #[test]
    fn test_rows_sorted_by_month_then_category() {
        let txns = vec![
            txn((2025, 2, 1), "Beta", "Savings", 1.0),
            txn((2025, 1, 1), "Zulu", "Savings", 1.0),
            txn((2025, 1, 1), "Alpha", "Savings", 1.0),
        ];
        let report = compute_ledger(&txns, &TypeLabels::default());

        let keys: Vec<_> = report
            .rows
            .iter()
            .map(|r| (r.month, r.category.clone()))
            .collect();
        assert_eq!(
            keys,
            vec![
                (month(2025, 1), "Alpha".to_string()),
                (month(2025, 1), "Zulu".to_string()),
                (month(2025, 2), "Beta".to_string()),
            ]
        );
    }

    #[test]
    fn test_malformed_records_collected_not_fatal() {
        let txns = vec![
            txn((2025, 1, 1), "Emergency", "Savings", 100.0),
            txn((2025, 1, 2), "", "Savings", 50.0),
            txn((2025, 1, 3), "Emergency", "Savings", f64::NAN),
        ];
        let report = compute_ledger(&txns, &TypeLabels::default());

        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.skipped[0].reason, "empty category");
        assert_eq!(report.skipped[1].reason, "non-finite value");
        // The good record still aggregated
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].monthly_delta, 100.0);
    }

    #[test]
    fn test_zero_value_transaction_changes_nothing() {
        let base = vec![
            txn((2025, 1, 1), "Vacation", "Allocation", 100.0),
            txn((2025, 2, 1), "Vacation", "Savings", 20.0),
        ];
        let mut with_zero = base.clone();
        with_zero.push(txn((2025, 1, 15), "Vacation", "Allocation", 0.0));

        let a = compute_ledger(&base, &TypeLabels::default());
        let b = compute_ledger(&with_zero, &TypeLabels::default());

        assert_eq!(a.metrics, b.metrics);
        for (ra, rb) in a.rows.iter().zip(b.rows.iter()) {
            assert_eq!(ra.running_balance, rb.running_balance);
            assert_eq!(ra.monthly_delta, rb.monthly_delta);
        }
    }
}
