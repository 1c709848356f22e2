use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    /// A month key that does not name a real year-month. Fatal: a key that
    /// cannot be ordered chronologically would corrupt every running total.
    #[error("malformed month key {0:?}: expected YYYY-MM")]
    MalformedMonthKey(String),
}
