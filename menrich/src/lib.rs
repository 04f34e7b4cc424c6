//! # menrich
//!
//! Motif enrichment analysis for genomic region sets: associate regions with
//! nearby genes, count motif-predicted binding sites per region partition,
//! test every motif with a one-sided Fisher exact test, correct for multiple
//! testing and keep the binding sites of significant motifs.
//!
//! Each part lives in its own crate and is re-exported here behind a feature
//! of the same name.

#[cfg(feature = "core")]
#[doc(inline)]
pub use menrich_core as core;

#[cfg(feature = "overlaprs")]
#[doc(inline)]
pub use menrich_overlaprs as overlaprs;

#[cfg(feature = "genes")]
#[doc(inline)]
pub use menrich_genes as genes;

#[cfg(feature = "stats")]
#[doc(inline)]
pub use menrich_stats as stats;

#[cfg(feature = "enrichment")]
#[doc(inline)]
pub use menrich_enrichment as enrichment;

#[cfg(feature = "io")]
#[doc(inline)]
pub use menrich_io as io;
