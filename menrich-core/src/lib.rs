//! Core models for menrich.
//!
//! Provides the genomic interval types every other menrich crate works on:
//! [`GenomicInterval`](models::GenomicInterval), the chromosome-ordered
//! [`IntervalSet`](models::IntervalSet) and helpers for the colon-separated
//! multi-value `name` field used by the gene associator.
//!
//! ```
//! use menrich_core::models::{GenomicInterval, IntervalSet};
//!
//! let mut peaks = IntervalSet::new(
//!     "peaks",
//!     vec![
//!         GenomicInterval::new("chr2", 10, 20).unwrap(),
//!         GenomicInterval::new("chr1", 50, 80).unwrap(),
//!     ],
//! );
//! assert!(!peaks.is_sorted());
//! peaks.sort();
//! assert!(peaks.ensure_sorted().is_ok());
//! ```
pub mod errors;
pub mod models;
pub mod utils;

pub use errors::IntervalError;
