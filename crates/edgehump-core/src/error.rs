// crates/edgehump-core/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("required columns missing after alias search: {missing:?}; available columns: {available:?}")]
    Schema {
        missing: Vec<String>,
        available: Vec<String>,
    },

    #[error("neither aggregation path produced any hump results")]
    NoResults,

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Data processing error: {0}")]
    Processing(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
