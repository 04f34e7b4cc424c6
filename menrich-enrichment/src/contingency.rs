//! Per-motif hit counting over a region partition.
//!
//! A region is "with hit" for motif `m` when at least one binding site named
//! `m` overlaps it, however many do. Counting runs on motif batches that share
//! nothing mutable; the per-batch maps are merged by disjoint key union.
use std::collections::BTreeSet;

use fxhash::{FxHashMap, FxHashSet};
use log::{debug, warn};
use menrich_core::IntervalError;
use menrich_core::models::{GenomicInterval, IntervalSet};
use menrich_genes::evidence_genes;
use menrich_overlaprs::flag_overlaps;
use rayon::prelude::*;

use crate::errors::EnrichmentError;

///
/// Hit counts for a set of motifs over one region partition.
///
/// For every counted motif `with_hit + without_hit` equals the partition size.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MotifCounts {
    pub with_hit: FxHashMap<String, u64>,
    pub without_hit: FxHashMap<String, u64>,
    /// Genes of interest on regions with a hit, per motif. `None` when genes
    /// were not requested.
    pub genes: Option<FxHashMap<String, BTreeSet<String>>>,
}

impl MotifCounts {
    pub fn len(&self) -> usize {
        self.with_hit.len()
    }

    pub fn is_empty(&self) -> bool {
        self.with_hit.is_empty()
    }

    ///
    /// `(with_hit, without_hit)` for a motif, `(0, 0)` when it was not counted.
    ///
    pub fn get(&self, motif: &str) -> (u64, u64) {
        (
            self.with_hit.get(motif).copied().unwrap_or(0),
            self.without_hit.get(motif).copied().unwrap_or(0),
        )
    }

    pub fn genes_for(&self, motif: &str) -> Option<&BTreeSet<String>> {
        self.genes.as_ref().and_then(|g| g.get(motif))
    }

    ///
    /// Union with the counts of another batch. Fails when both sides counted
    /// the same motif.
    ///
    pub fn merge(&mut self, other: MotifCounts) -> Result<(), EnrichmentError> {
        for motif in other.with_hit.keys() {
            if self.with_hit.contains_key(motif) {
                return Err(EnrichmentError::DuplicateMotif(motif.clone()));
            }
        }

        self.with_hit.extend(other.with_hit);
        self.without_hit.extend(other.without_hit);
        if let Some(theirs) = other.genes {
            self.genes
                .get_or_insert_with(FxHashMap::default)
                .extend(theirs);
        }
        Ok(())
    }
}

///
/// Split a motif list into contiguous batches of `batch_size` names (the last
/// one may be shorter), giving `ceil(n / batch_size)` batches. A batch size of
/// 0 is treated as 1.
///
pub fn split_batches(motifs: &[String], batch_size: usize) -> Vec<Vec<String>> {
    motifs
        .chunks(batch_size.max(1))
        .map(|chunk| chunk.to_vec())
        .collect()
}

fn unsorted_error(err: IntervalError, batch: &[String]) -> EnrichmentError {
    match err {
        IntervalError::Unsorted { set, index } => EnrichmentError::Unsorted {
            set,
            index,
            batch: batch.to_vec(),
        },
        other => EnrichmentError::Interval(other),
    }
}

fn check_sorted(
    regions: &IntervalSet,
    mpbs: &IntervalSet,
    batch: &[String],
) -> Result<(), EnrichmentError> {
    regions
        .ensure_sorted()
        .map_err(|e| unsorted_error(e, batch))?;
    mpbs.ensure_sorted().map_err(|e| unsorted_error(e, batch))?;
    Ok(())
}

///
/// Count, for each motif of a batch, the regions with and without a hit.
///
/// # Arguments
/// - batch: motif names to count
/// - regions: sorted region partition
/// - mpbs: sorted binding sites; sites of motifs outside the batch are ignored
/// - want_genes: also collect the genes of interest of regions with a hit
pub fn count(
    batch: &[String],
    regions: &IntervalSet,
    mpbs: &IntervalSet,
    want_genes: bool,
) -> Result<MotifCounts, EnrichmentError> {
    check_sorted(regions, mpbs, batch)?;
    if regions.is_empty() {
        warn!("Partition '{}' is empty; all its counts are 0", regions.name);
    }
    Ok(count_sorted(batch, regions, mpbs, want_genes))
}

fn count_sorted(
    batch: &[String],
    regions: &IntervalSet,
    mpbs: &IntervalSet,
    want_genes: bool,
) -> MotifCounts {
    // sites per motif, each group still sorted
    let mut sites: FxHashMap<&str, Vec<&GenomicInterval>> = batch
        .iter()
        .map(|m| (m.as_str(), Vec::new()))
        .collect();
    for site in mpbs {
        if let Some(group) = sites.get_mut(site.name.as_str()) {
            group.push(site);
        }
    }

    let total = regions.len() as u64;
    let mut counts = MotifCounts {
        genes: want_genes.then(FxHashMap::default),
        ..Default::default()
    };

    for motif in batch {
        let hits = sites.get(motif.as_str()).map(Vec::as_slice).unwrap_or(&[]);
        let flags = flag_overlaps(&regions.intervals, hits);
        let with_hit = flags.iter().filter(|f| **f).count() as u64;

        if let Some(genes) = counts.genes.as_mut() {
            let motif_genes: BTreeSet<String> = regions
                .iter()
                .zip(&flags)
                .filter(|(_, hit)| **hit)
                .flat_map(|(region, _)| evidence_genes(&region.name))
                .map(str::to_string)
                .collect();
            genes.insert(motif.clone(), motif_genes);
        }

        counts.with_hit.insert(motif.clone(), with_hit);
        counts.without_hit.insert(motif.clone(), total - with_hit);
    }

    counts
}

///
/// Counts every motif of a run, fanning motif batches out over one worker
/// pool that lives as long as the counter. With a single process there is no
/// pool and everything runs on the calling thread.
///
/// The result does not depend on the number of workers.
///
#[derive(Debug)]
pub struct MotifCounter {
    pool: Option<rayon::ThreadPool>,
    batch_size: usize,
}

impl MotifCounter {
    ///
    /// # Arguments
    /// - processes: worker count, also the batch size
    pub fn new(processes: usize) -> Result<Self, EnrichmentError> {
        let pool = if processes > 1 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(processes)
                    .build()?,
            )
        } else {
            None
        };
        Ok(MotifCounter {
            pool,
            batch_size: processes.max(1),
        })
    }

    pub fn workers(&self) -> usize {
        self.pool
            .as_ref()
            .map_or(1, |pool| pool.current_num_threads())
    }

    ///
    /// Count every motif over one partition.
    ///
    /// # Arguments
    /// - motifs: unique motif names
    /// - regions: sorted region partition
    /// - mpbs: sorted binding sites
    /// - want_genes: also collect the genes of interest of regions with a hit
    pub fn count_all(
        &self,
        motifs: &[String],
        regions: &IntervalSet,
        mpbs: &IntervalSet,
        want_genes: bool,
    ) -> Result<MotifCounts, EnrichmentError> {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        for motif in motifs {
            if !seen.insert(motif.as_str()) {
                return Err(EnrichmentError::DuplicateMotif(motif.clone()));
            }
        }

        check_sorted(regions, mpbs, motifs)?;
        if regions.is_empty() {
            warn!("Partition '{}' is empty; all its counts are 0", regions.name);
        }

        let batches = split_batches(motifs, self.batch_size);
        debug!(
            "Counting {} motifs over '{}' in {} batches",
            motifs.len(),
            regions.name,
            batches.len()
        );

        let per_batch: Vec<MotifCounts> = match &self.pool {
            None => batches
                .iter()
                .map(|batch| count_sorted(batch, regions, mpbs, want_genes))
                .collect(),
            Some(pool) => pool.install(|| {
                batches
                    .par_iter()
                    .map(|batch| count_sorted(batch, regions, mpbs, want_genes))
                    .collect()
            }),
        };

        let mut merged = MotifCounts {
            genes: want_genes.then(FxHashMap::default),
            ..Default::default()
        };
        for counts in per_batch {
            merged.merge(counts)?;
        }
        Ok(merged)
    }
}

///
/// Binding sites overlapping at least one region, each reported once and in
/// sorted order.
///
pub fn collect_hits(
    regions: &IntervalSet,
    mpbs: &IntervalSet,
) -> Result<IntervalSet, EnrichmentError> {
    regions.ensure_sorted()?;
    mpbs.ensure_sorted()?;

    let flags = flag_overlaps(&mpbs.intervals, &regions.intervals);
    let hits = mpbs
        .iter()
        .zip(flags)
        .filter(|(_, hit)| *hit)
        .map(|(site, _)| site.clone())
        .collect();

    Ok(IntervalSet::new(&format!("{}_mpbs", regions.name), hits))
}
