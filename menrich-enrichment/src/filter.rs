use std::io::{BufRead, Write};

use fxhash::FxHashMap;
use menrich_core::models::GenomicInterval;
use menrich_core::utils::is_bed_header;

use crate::errors::EnrichmentError;

#[inline]
fn passes(motif: &str, corrected: &FxHashMap<String, f64>, threshold: f64) -> bool {
    corrected.get(motif).is_some_and(|p| *p <= threshold)
}

///
/// Keep the binding sites whose motif has a corrected p-value at or below
/// `threshold`. Sites of motifs missing from `corrected` are dropped. The
/// input is consumed lazily, one record at a time.
///
/// # Arguments
/// - records: binding sites, named by motif
/// - corrected: corrected p-value per motif
/// - threshold: inclusive cutoff
pub fn filter_mpbs<'a, I>(
    records: I,
    corrected: &'a FxHashMap<String, f64>,
    threshold: f64,
) -> impl Iterator<Item = GenomicInterval> + 'a
where
    I: IntoIterator<Item = GenomicInterval>,
    I::IntoIter: 'a,
{
    records
        .into_iter()
        .filter(move |site| passes(&site.name, corrected, threshold))
}

///
/// [`filter_mpbs`] over BED text: copies every line whose name column passes
/// the cutoff from `reader` to `writer`, unchanged. Header and blank lines are
/// dropped. Returns the number of lines written.
///
pub fn filter_mpbs_lines<R, W>(
    reader: R,
    writer: &mut W,
    corrected: &FxHashMap<String, f64>,
    threshold: f64,
) -> Result<usize, EnrichmentError>
where
    R: BufRead,
    W: Write,
{
    let mut kept = 0usize;
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() || is_bed_header(&line) {
            continue;
        }
        let Some(motif) = line.split('\t').nth(3) else {
            continue;
        };
        if passes(motif, corrected, threshold) {
            writeln!(writer, "{line}")?;
            kept += 1;
        }
    }
    Ok(kept)
}
