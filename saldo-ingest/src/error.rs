use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("cannot read {sheet} sheet at {path}: {source}")]
    Read {
        sheet: &'static str,
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("{sheet} sheet is missing mapped column {column:?}")]
    MissingColumn {
        sheet: &'static str,
        column: String,
    },
    #[error("cannot serialize skipped-rows report: {0}")]
    ReportSerialize(#[from] serde_json::Error),
    #[error("cannot write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
