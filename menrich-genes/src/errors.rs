use menrich_core::IntervalError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeneAnnotationError {
    #[error("Error parsing annotation line {line}: {msg}")]
    Parse { line: usize, msg: String },

    #[error("Unsupported annotation format: {0}. Expected .bed, .gtf (optionally .gz)")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Interval(#[from] IntervalError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
