//! saldo-core: domain types and the savings ledger aggregation engine

pub mod classify;
pub mod error;
pub mod ledger;
pub mod model;

pub use classify::TypeLabels;
pub use error::LedgerError;
pub use ledger::compute_ledger;
pub use model::{
    CategoryKind, LedgerReport, LedgerRow, MonthKey, MonthlyMetrics, SkippedRecord, Transaction,
};
