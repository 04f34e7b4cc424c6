use log::debug;
use statrs::distribution::{DiscreteCDF, Hypergeometric};

///
/// One-sided (right-tail) Fisher exact test p-value for the table
///
/// ```text
///              hit   no hit
/// evidence      a      b
/// reference     c      d
/// ```
///
/// i.e. the probability, with all margins fixed, of seeing `a` or more hits
/// among the evidence rows. Degenerate tables (empty, or any numerical
/// failure) give 1.0.
///
/// # Arguments
/// - a: evidence regions with a hit
/// - b: evidence regions without a hit
/// - c: reference regions with a hit
/// - d: reference regions without a hit
pub fn right_tail(a: u64, b: u64, c: u64, d: u64) -> f64 {
    let total = a + b + c + d;
    if total == 0 || a == 0 {
        return 1.0;
    }

    // Hypergeometric(N, K, n): population, successes (hits), draws (evidence)
    let hits = a + c;
    let draws = a + b;
    let dist = match Hypergeometric::new(total, hits, draws) {
        Ok(dist) => dist,
        Err(e) => {
            debug!("Fisher test on [{a}, {b}, {c}, {d}] failed: {e}");
            return 1.0;
        }
    };

    // sf(x) is P(X > x), so shift by one to include the observed count
    let p = dist.sf(a - 1);
    if p.is_nan() {
        debug!("Fisher test on [{a}, {b}, {c}, {d}] gave NaN");
        return 1.0;
    }
    p.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::*;

    const EPS: f64 = 1e-12;

    #[rstest]
    fn test_enriched_table() {
        let p = right_tail(5, 95, 1, 199);
        assert!(p.is_finite());
        assert!(p > 0.0 && p < 1.0);
        assert!(p < 0.05);
    }

    #[rstest]
    fn test_known_value() {
        // P(X >= 3) for X ~ Hypergeometric(N=6, K=3, n=3) = 1 / C(6,3)
        let p = right_tail(3, 0, 0, 3);
        assert!((p - 0.05).abs() < EPS);
    }

    #[rstest]
    fn test_large_table() {
        // P(X >= 300) for X ~ Hypergeometric(N=4000, K=400, n=1000)
        let expected = 5.4795729039430366e-111;
        let p = right_tail(300, 700, 100, 2900);
        assert!(p > 0.0);
        assert!((p - expected).abs() / expected < 1e-6, "got {p}");
    }

    #[rstest]
    fn test_scaled_tables_keep_shrinking() {
        let mut previous = 1.0;
        for k in [1, 2, 3, 4, 5, 10, 50] {
            let p = right_tail(5 * k, 95 * k, k, 199 * k);
            assert!(p > 0.0, "underflow at k={k}");
            assert!(p < previous, "p rose at k={k}: {p} >= {previous}");
            previous = p;
        }
    }

    #[rstest]
    #[case(0, 0, 0, 0)]
    #[case(0, 10, 0, 10)]
    #[case(0, 0, 4, 4)]
    fn test_degenerate_tables(#[case] a: u64, #[case] b: u64, #[case] c: u64, #[case] d: u64) {
        assert_eq!(right_tail(a, b, c, d), 1.0);
    }

    #[rstest]
    fn test_no_hits_in_evidence_is_one() {
        assert!((right_tail(0, 50, 20, 30) - 1.0).abs() < 1e-9);
    }

    #[rstest]
    #[case(40, 10, 200)]
    #[case(3, 120, 17)]
    #[case(0, 0, 5)]
    fn test_monotone_in_a(#[case] b: u64, #[case] c: u64, #[case] d: u64) {
        let mut previous = f64::INFINITY;
        for a in 0..60 {
            let p = right_tail(a, b, c, d);
            assert!((0.0..=1.0).contains(&p));
            assert!(p <= previous + 1e-9, "p rose at a={a}: {p} > {previous}");
            previous = p;
        }
    }
}
