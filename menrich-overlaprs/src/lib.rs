//! Overlap operations between sorted genomic interval streams.
//!
//! Both inputs of every operation here are sorted by chromosome
//! (lexicographic), then start, then end, the order produced by
//! [`IntervalSet::sort`](menrich_core::models::IntervalSet::sort). With that
//! precondition a single forward sweep answers "does this interval overlap
//! anything in the other stream?" for every interval in `O(Q + T)`.
//!
//! ## Quick Start
//!
//! ```rust
//! use menrich_core::models::GenomicInterval;
//! use menrich_overlaprs::flag_overlaps;
//!
//! let peaks = vec![
//!     GenomicInterval::new("chr1", 100, 200).unwrap(),
//!     GenomicInterval::new("chr1", 500, 600).unwrap(),
//! ];
//! let sites = vec![GenomicInterval::new("chr1", 150, 160).unwrap()];
//!
//! assert_eq!(flag_overlaps(&peaks, &sites), vec![true, false]);
//! ```
//!
//! Slices of references work too, which is how per-motif subsets of a
//! binding-site set are swept without cloning:
//!
//! ```rust
//! use menrich_core::models::GenomicInterval;
//! use menrich_overlaprs::flag_overlaps;
//!
//! let sites = vec![
//!     GenomicInterval::new("chr1", 10, 20).unwrap().with_name("M1"),
//!     GenomicInterval::new("chr1", 30, 40).unwrap().with_name("M2"),
//! ];
//! let m1: Vec<&GenomicInterval> = sites.iter().filter(|s| s.name == "M1").collect();
//! let peaks = vec![GenomicInterval::new("chr1", 0, 100).unwrap()];
//!
//! assert_eq!(flag_overlaps(&peaks, &m1), vec![true]);
//! ```

/// Forward sweep over two sorted streams.
///
/// See [`flag_overlaps`] for the main entry point.
pub mod sweep;

/// Core traits for overlap operations.
///
/// See [`GenomicRange`] for the main trait.
pub mod traits;

// re-exports
pub use self::sweep::flag_overlaps;
pub use self::traits::GenomicRange;
