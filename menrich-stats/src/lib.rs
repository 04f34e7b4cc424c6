//! Statistics for motif enrichment: the one-sided Fisher exact test on a 2x2
//! contingency table ([`fisher::right_tail`]) and false discovery rate
//! correction of a p-value vector ([`correction::correct`]).
//!
//! ```
//! use menrich_stats::{correct, right_tail, CorrectionMethod};
//!
//! let p = right_tail(5, 95, 1, 199);
//! assert!(p > 0.0 && p < 1.0);
//!
//! let c = correct(&[p, 1.0], 0.05, CorrectionMethod::Independent);
//! assert_eq!(c.corrected.len(), 2);
//! ```
pub mod correction;
pub mod fisher;

pub use correction::{Correction, CorrectionMethod, correct};
pub use fisher::right_tail;
