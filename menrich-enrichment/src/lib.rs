//! # Motif enrichment engine
//!
//! Given region sets, the motif-predicted binding sites (MPBS) found on them,
//! a background region set with its own binding sites and a gene annotation,
//! this crate decides which motifs are over-represented.
//!
//! Per region set it:
//! 1. associates regions with nearby genes and, with a gene set of interest,
//!    splits them into evidence and non-evidence regions
//! 2. counts, per motif, the regions with and without a binding site
//!    ([`contingency`]), fanning motif batches out over a worker pool
//! 3. runs the one-sided Fisher test and corrects for multiple testing
//!    ([`results::evaluate`])
//! 4. ranks the results and keeps the binding sites of significant motifs
//!    ([`filter`])
//!
//! [`analysis::EnrichmentAnalysis`] drives the whole pipeline for one region
//! set; [`matrix`] groups region sets with their gene sets.
pub mod analysis;
pub mod config;
pub mod contingency;
pub mod errors;
pub mod filter;
pub mod matrix;
pub mod results;

// re-exports
pub use analysis::{Background, EnrichmentAnalysis, RegionSetReport, motif_names};
pub use config::{ConfigError, EnrichmentConfig};
pub use contingency::{MotifCounter, MotifCounts, collect_hits, count, split_batches};
pub use errors::EnrichmentError;
pub use filter::{filter_mpbs, filter_mpbs_lines};
pub use matrix::{AnalysisGroup, ExperimentalMatrix, MatrixEntry};
pub use results::{ContingencyTable, EnrichmentResult, corrected_p_values, evaluate, rank};
