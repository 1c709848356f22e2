//! saldo-ingest: CSV sheet ingestion into canonical transactions

pub mod error;
pub mod report;
pub mod sheet;
pub mod types;

pub use error::IngestError;
pub use report::write_skipped_report;
pub use sheet::read_sheet;
pub use types::{ColumnMap, IngestOptions, SheetData, SheetKind};
