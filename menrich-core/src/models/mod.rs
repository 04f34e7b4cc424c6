pub mod interval;
pub mod interval_set;
pub mod name;
pub mod strand;

// re-export for cleaner imports
pub use self::interval::GenomicInterval;
pub use self::interval_set::IntervalSet;
pub use self::strand::Strand;
