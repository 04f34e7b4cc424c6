//! Region-to-gene association for region sets.
//!
//! This crate provides:
//!
//! - A gene annotation ([`GeneAnnotation`]) loaded from BED6 or GTF, able to
//!   report every gene whose promoter window lies near a region
//! - Gene lists of interest ([`GeneSet`])
//! - The gene associator ([`associate`]), which rewrites each region's name into
//!   colon-separated `GENE_distance` tokens, or `.` when no gene is in range
//!
//! # Example
//!
//! ```no_run
//! use menrich_core::models::IntervalSet;
//! use menrich_genes::{associate, GeneAnnotation, GeneSet};
//!
//! let annotation = GeneAnnotation::from_bed("genes.bed").unwrap();
//! let genes = GeneSet::from_file("interesting_genes.txt").unwrap();
//! let peaks = IntervalSet::try_from("peaks.bed").unwrap();
//!
//! let associated = associate(&peaks, &annotation, Some(&genes), 1000, 50000).unwrap();
//! for region in &associated {
//!     println!("{}\t{}", region.chrom, region.name);
//! }
//! ```

pub mod annotation;
pub mod association;
pub mod errors;
pub mod models;

// re-exports
pub use annotation::GeneAnnotation;
pub use association::{
    EXCLUSION_MARKER, GeneAssociation, GeneHit, associate, display_name, evidence_genes,
    is_evidence,
};
pub use errors::GeneAnnotationError;
pub use models::{Gene, GeneSet};
