use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a run.
#[derive(Error, Debug)]
pub enum MinorError {
    /// Inconsistent options, detected before any record is read
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failures reported by htslib (open, fetch, decode)
    #[error("Failed to process {}: {message}", path.display())]
    Hts { path: PathBuf, message: String },

    #[error("Failed to write TSV: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, MinorError>;

impl MinorError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    pub fn hts(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Hts { path: path.into(), message: message.to_string() }
    }
}

/// Errors that reject a single alignment record. The run goes on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("flat index {index} (reference position {position}) is outside of the count matrix with {size} rows")]
    OutOfRegion { position: u64, index: i64, size: usize },

    #[error("unsupported alignment operation {op}")]
    UnsupportedOperation { op: char },

    #[error("operations consume {required} read bases, but the sequence has {available}")]
    TruncatedSequence { required: usize, available: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = MinorError::config("Only one reference sequence expected");
        assert_eq!(err.to_string(), "Configuration error: Only one reference sequence expected");

        let err = MinorError::hts("sample.bam", "index is missing");
        assert_eq!(err.to_string(), "Failed to process sample.bam: index is missing");

        let err = RecordError::OutOfRegion { position: 2, index: 10, size: 5 };
        assert_eq!(err.to_string(), "flat index 10 (reference position 2) is outside of the count matrix with 5 rows");
    }
}
