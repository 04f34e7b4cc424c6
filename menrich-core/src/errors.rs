use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntervalError {
    #[error("Invalid interval {chrom}:{start}-{end}: start must be smaller than end")]
    InvalidInterval { chrom: String, start: u32, end: u32 },

    #[error("Invalid strand: {0}")]
    InvalidStrand(String),

    #[error("Error parsing line {line}: {msg}")]
    Parse { line: usize, msg: String },

    #[error("Interval set '{set}' is not sorted at index {index}")]
    Unsorted { set: String, index: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
