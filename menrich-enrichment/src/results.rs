use fxhash::FxHashMap;
use menrich_stats::{CorrectionMethod, correct, right_tail};
use serde::{Deserialize, Serialize};

use crate::contingency::MotifCounts;

///
/// 2x2 table of one motif: `a`/`b` evidence regions with/without a hit,
/// `c`/`d` reference regions with/without a hit.
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContingencyTable {
    pub a: u64,
    pub b: u64,
    pub c: u64,
    pub d: u64,
}

impl ContingencyTable {
    pub fn new(a: u64, b: u64, c: u64, d: u64) -> Self {
        ContingencyTable { a, b, c, d }
    }

    /// Fraction of evidence regions with a hit, 0 for an empty evidence set.
    pub fn percent(&self) -> f64 {
        ratio(self.a, self.a + self.b)
    }

    /// Fraction of reference regions with a hit, 0 for an empty reference set.
    pub fn back_percent(&self) -> f64 {
        ratio(self.c, self.c + self.d)
    }

    pub fn p_value(&self) -> f64 {
        right_tail(self.a, self.b, self.c, self.d)
    }
}

fn ratio(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

///
/// Outcome of testing one motif on one region set.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentResult {
    pub motif_name: String,
    pub table: ContingencyTable,
    pub p_value: f64,
    pub corrected_p_value: f64,
    /// Whether the corrected p-value passes the run's `alpha`.
    pub significant: bool,
    /// Distinct genes of interest on evidence regions hit by this motif, sorted.
    pub gene_list: Vec<String>,
}

impl EnrichmentResult {
    pub fn percent(&self) -> f64 {
        self.table.percent()
    }

    pub fn back_percent(&self) -> f64 {
        self.table.back_percent()
    }

    /// e.g. `5.0%`
    pub fn percent_string(&self) -> String {
        format_percent(self.percent())
    }

    pub fn back_percent_string(&self) -> String {
        format_percent(self.back_percent())
    }

    /// e.g. `4.5455e-02`
    pub fn p_value_string(&self) -> String {
        format_p_value(self.p_value)
    }

    pub fn corrected_p_value_string(&self) -> String {
        format_p_value(self.corrected_p_value)
    }
}

///
/// A ratio as a percentage with at most two decimals and at least one
/// (`0.05` -> `5.0%`, `0.33333` -> `33.33%`).
///
pub fn format_percent(ratio: f64) -> String {
    let percent = (ratio * 10_000.0).round() / 100.0;
    let mut s = format!("{percent:.2}");
    while s.ends_with('0') && !s.ends_with(".0") {
        s.pop();
    }
    s.push('%');
    s
}

///
/// Scientific notation with four decimals and a signed two-digit exponent
/// (`0.045454` -> `4.5454e-02`).
///
pub fn format_p_value(p: f64) -> String {
    let s = format!("{p:.4e}");
    match s.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exponent.abs())
        }
        None => s,
    }
}

///
/// Test every motif: build its table from the evidence and reference counts,
/// compute the Fisher p-value, correct the whole vector and rank.
///
/// # Arguments
/// - motifs: motif names, all present in both count maps
/// - evidence: counts over the evidence partition (gene lists are taken from here)
/// - reference: counts over the non-evidence or background partition
/// - alpha: false discovery rate
/// - method: correction procedure
pub fn evaluate(
    motifs: &[String],
    evidence: &MotifCounts,
    reference: &MotifCounts,
    alpha: f64,
    method: CorrectionMethod,
) -> Vec<EnrichmentResult> {
    let mut results: Vec<EnrichmentResult> = motifs
        .iter()
        .map(|motif| {
            let (a, b) = evidence.get(motif);
            let (c, d) = reference.get(motif);
            let table = ContingencyTable::new(a, b, c, d);
            EnrichmentResult {
                motif_name: motif.clone(),
                table,
                p_value: table.p_value(),
                corrected_p_value: 1.0,
                significant: false,
                gene_list: evidence
                    .genes_for(motif)
                    .map(|g| g.iter().cloned().collect())
                    .unwrap_or_default(),
            }
        })
        .collect();

    let p_values: Vec<f64> = results.iter().map(|r| r.p_value).collect();
    let correction = correct(&p_values, alpha, method);
    for ((result, corrected), rejected) in results
        .iter_mut()
        .zip(correction.corrected)
        .zip(correction.rejected)
    {
        result.corrected_p_value = corrected;
        result.significant = rejected;
    }

    rank(results)
}

///
/// Order results by significance.
///
/// Applies stable sorts by motif name, then percent (descending), then raw
/// p-value, then corrected p-value, so the final order is by corrected
/// p-value with ties broken by raw p-value, evidence frequency and name.
///
pub fn rank(mut results: Vec<EnrichmentResult>) -> Vec<EnrichmentResult> {
    results.sort_by(|x, y| x.motif_name.cmp(&y.motif_name));
    results.sort_by(|x, y| y.percent().total_cmp(&x.percent()));
    results.sort_by(|x, y| x.p_value.total_cmp(&y.p_value));
    results.sort_by(|x, y| x.corrected_p_value.total_cmp(&y.corrected_p_value));
    results
}

///
/// Corrected p-value per motif, the lookup used to filter binding sites.
///
pub fn corrected_p_values(results: &[EnrichmentResult]) -> FxHashMap<String, f64> {
    results
        .iter()
        .map(|r| (r.motif_name.clone(), r.corrected_p_value))
        .collect()
}
