use menrich_core::IntervalError;
use menrich_genes::GeneAnnotationError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum EnrichmentError {
    #[error("'{set}' is not sorted at index {index} while counting motif batch {batch:?}")]
    Unsorted {
        set: String,
        index: usize,
        batch: Vec<String>,
    },

    #[error("Motif '{0}' was counted twice; motif names must be unique across batches")]
    DuplicateMotif(String),

    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Experimental matrix line {line}: {msg}")]
    Matrix { line: usize, msg: String },

    #[error(transparent)]
    Interval(#[from] IntervalError),

    #[error(transparent)]
    Genes(#[from] GeneAnnotationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

