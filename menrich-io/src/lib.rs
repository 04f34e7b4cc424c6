//! # Output writers for menrich.
//!
//! Everything an enrichment run leaves on disk: plain and gzipped BED files,
//! the gene-association BED, colored BED9 files of significant binding sites,
//! the tab-separated statistics table and a JSON dump of the results.
//!
pub mod bed;
pub mod error;
pub mod report;

// re-expose core functions
pub use bed::*;
pub use error::*;
pub use report::*;
