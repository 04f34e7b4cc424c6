use std::cmp::Ordering;

use crate::traits::GenomicRange;

#[inline]
fn cmp_position<A: GenomicRange, B: GenomicRange>(a: &A, b: &B) -> Ordering {
    a.chrom()
        .cmp(b.chrom())
        .then_with(|| a.start().cmp(&b.start()))
        .then_with(|| a.end().cmp(&b.end()))
}

///
/// For every query, does it overlap at least one target?
///
/// Both slices must be sorted by chromosome, start and end. A query `q`
/// overlaps some target iff either
/// - a target starting at or before `q.start` ends after `q.start`, or
/// - the first target starting after `q.start` starts before `q.end`.
///
/// The first condition only needs the running maximum end of the targets
/// already passed on this chromosome, the second only the next target, so
/// one forward pass over both slices suffices.
///
/// # Arguments
/// - queries: sorted intervals to flag
/// - targets: sorted intervals to test against
pub fn flag_overlaps<Q, T>(queries: &[Q], targets: &[T]) -> Vec<bool>
where
    Q: GenomicRange,
    T: GenomicRange,
{
    debug_assert!(queries.is_sorted_by(|a, b| cmp_position(a, b).is_le()));
    debug_assert!(targets.is_sorted_by(|a, b| cmp_position(a, b).is_le()));

    let mut flags = vec![false; queries.len()];

    let mut next_target = 0usize;
    let mut max_end: Option<u32> = None;
    let mut current_chrom: Option<&str> = None;

    for (qi, query) in queries.iter().enumerate() {
        let chrom = query.chrom();

        if current_chrom != Some(chrom) {
            // targets on chromosomes sorting before this one can never match again
            while next_target < targets.len() && targets[next_target].chrom() < chrom {
                next_target += 1;
            }
            max_end = None;
            current_chrom = Some(chrom);
        }

        while next_target < targets.len()
            && targets[next_target].chrom() == chrom
            && targets[next_target].start() <= query.start()
        {
            let end = targets[next_target].end();
            max_end = Some(max_end.map_or(end, |m| m.max(end)));
            next_target += 1;
        }

        let covers_start = max_end.is_some_and(|m| m > query.start());
        let starts_inside = next_target < targets.len()
            && targets[next_target].chrom() == chrom
            && targets[next_target].start() < query.end();

        flags[qi] = covers_start || starts_inside;
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    use menrich_core::models::GenomicInterval;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rstest::*;

    fn iv(chrom: &str, start: u32, end: u32) -> GenomicInterval {
        GenomicInterval::new(chrom, start, end).unwrap()
    }

    fn naive_flags(queries: &[GenomicInterval], targets: &[GenomicInterval]) -> Vec<bool> {
        queries
            .iter()
            .map(|q| targets.iter().any(|t| q.overlaps(t)))
            .collect()
    }

    fn random_sorted(rng: &mut StdRng, n: usize, max_len: u32) -> Vec<GenomicInterval> {
        let chroms = ["chr1", "chr10", "chr2", "chrX"];
        let mut out: Vec<GenomicInterval> = (0..n)
            .map(|_| {
                let chrom = chroms[rng.gen_range(0..chroms.len())];
                let start = rng.gen_range(0..2_000);
                let len = rng.gen_range(1..=max_len);
                iv(chrom, start, start + len)
            })
            .collect();
        out.sort_by(|a, b| a.cmp_position(b));
        out
    }

    #[rstest]
    fn test_basic_flags() {
        let queries = vec![
            iv("chr1", 100, 200),
            iv("chr1", 300, 400),
            iv("chr1", 500, 600),
            iv("chr2", 100, 200),
        ];
        let targets = vec![iv("chr1", 150, 160), iv("chr1", 590, 700), iv("chr3", 100, 200)];

        assert_eq!(
            flag_overlaps(&queries, &targets),
            vec![true, false, true, false]
        );
    }

    #[rstest]
    fn test_long_target_spans_later_queries() {
        // the long target starts first but outlives a shorter one
        let targets = vec![iv("chr1", 0, 1_000), iv("chr1", 10, 20)];
        let queries = vec![iv("chr1", 5, 8), iv("chr1", 500, 510), iv("chr1", 1_000, 1_010)];

        assert_eq!(flag_overlaps(&queries, &targets), vec![true, true, false]);
    }

    #[rstest]
    fn test_touching_intervals_do_not_overlap() {
        let queries = vec![iv("chr1", 100, 200)];
        let targets = vec![iv("chr1", 50, 100), iv("chr1", 200, 250)];
        assert_eq!(flag_overlaps(&queries, &targets), vec![false]);
    }

    #[rstest]
    fn test_empty_inputs() {
        let none: Vec<GenomicInterval> = vec![];
        let some = vec![iv("chr1", 1, 2)];
        assert_eq!(flag_overlaps(&none, &some), Vec::<bool>::new());
        assert_eq!(flag_overlaps(&some, &none), vec![false]);
    }

    #[rstest]
    fn test_many_targets_flag_once() {
        let queries = vec![iv("chr1", 0, 100), iv("chr1", 200, 300)];
        let targets = vec![iv("chr1", 10, 20), iv("chr1", 30, 40), iv("chr1", 50, 60)];
        assert_eq!(flag_overlaps(&queries, &targets), vec![true, false]);
    }

    #[rstest]
    fn test_reference_slices() {
        let sites = vec![iv("chr1", 10, 20), iv("chr1", 150, 160)];
        let refs: Vec<&GenomicInterval> = sites.iter().collect();
        let queries = vec![iv("chr1", 0, 100), iv("chr1", 200, 300)];
        assert_eq!(flag_overlaps(&queries, &refs), vec![true, false]);
    }

    #[rstest]
    #[case(1)]
    #[case(7)]
    #[case(42)]
    fn test_matches_naive_overlap(#[case] seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let queries = random_sorted(&mut rng, 300, 150);
        let targets = random_sorted(&mut rng, 200, 400);

        assert_eq!(
            flag_overlaps(&queries, &targets),
            naive_flags(&queries, &targets)
        );
        assert_eq!(
            flag_overlaps(&targets, &queries),
            naive_flags(&targets, &queries)
        );
    }

    #[cfg(debug_assertions)]
    #[rstest]
    #[should_panic]
    fn test_unsorted_targets_are_caught() {
        let queries = vec![iv("chr1", 1, 2)];
        let targets = vec![iv("chr2", 1, 2), iv("chr1", 1, 3)];
        flag_overlaps(&queries, &targets);
    }
}
