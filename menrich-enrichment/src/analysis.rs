use std::collections::BTreeSet;

use fxhash::FxHashMap;
use log::{info, warn};
use menrich_core::models::IntervalSet;
use menrich_genes::{GeneAnnotation, GeneSet, associate, display_name, is_evidence};

use crate::config::EnrichmentConfig;
use crate::contingency::{MotifCounter, MotifCounts, collect_hits};
use crate::errors::EnrichmentError;
use crate::filter::filter_mpbs;
use crate::results::{EnrichmentResult, corrected_p_values, evaluate};

///
/// Motifs to test: the distinct binding-site names of the background, in
/// sorted order, optionally restricted to a selection. Selected motifs never
/// seen in the background are reported and skipped.
///
pub fn motif_names(
    background_mpbs: &IntervalSet,
    selected: Option<&BTreeSet<String>>,
) -> Vec<String> {
    let present = background_mpbs.distinct_names();
    match selected {
        None => present.into_iter().map(str::to_string).collect(),
        Some(selected) => {
            for missing in selected.iter().filter(|m| !present.contains(m.as_str())) {
                warn!("Selected motif '{missing}' has no background binding sites; skipping");
            }
            present
                .into_iter()
                .filter(|m| selected.contains(*m))
                .map(str::to_string)
                .collect()
        }
    }
}

///
/// Background regions with their binding sites, counted once per run and
/// shared by every site test.
///
#[derive(Debug, Clone)]
pub struct Background {
    pub regions: IntervalSet,
    pub counts: MotifCounts,
}

impl Background {
    pub fn new(
        regions: IntervalSet,
        mpbs: &IntervalSet,
        motifs: &[String],
        counter: &MotifCounter,
    ) -> Result<Self, EnrichmentError> {
        let counts = counter.count_all(motifs, &regions, mpbs, false)?;
        info!(
            "Counted {} motifs over {} background regions",
            counts.len(),
            regions.len()
        );
        Ok(Background { regions, counts })
    }
}

///
/// Everything produced for one region set.
///
#[derive(Debug, Clone)]
pub struct RegionSetReport {
    pub name: String,
    pub gene_set: Option<String>,
    /// Regions named by their associated genes, exclusion markers stripped.
    pub association: IntervalSet,
    /// Evidence against non-evidence regions; only with a gene set.
    pub gene_test: Option<Vec<EnrichmentResult>>,
    /// Evidence against background regions.
    pub site_test: Vec<EnrichmentResult>,
    pub evidence_regions: usize,
    pub non_evidence_regions: usize,
    /// Significant binding sites on evidence regions.
    pub mpbs_evidence: IntervalSet,
    /// Significant binding sites on non-evidence regions; only with a gene set.
    pub mpbs_non_evidence: Option<IntervalSet>,
}

impl RegionSetReport {
    ///
    /// Output label: the region set name, suffixed with `__<gene set>` when
    /// one was used.
    ///
    pub fn label(&self) -> String {
        match &self.gene_set {
            Some(genes) => format!("{}__{}", self.name, genes),
            None => self.name.clone(),
        }
    }
}

///
/// Runs the gene test and site test for region sets against a shared
/// annotation, background and motif list. Every count of the run goes
/// through the same `counter`.
///
pub struct EnrichmentAnalysis<'a> {
    pub config: &'a EnrichmentConfig,
    pub annotation: &'a GeneAnnotation,
    pub background: &'a Background,
    pub motifs: &'a [String],
    pub counter: &'a MotifCounter,
}

impl EnrichmentAnalysis<'_> {
    ///
    /// Analyze one region set.
    ///
    /// With a gene set, regions near a gene of interest form the evidence
    /// partition and the rest the non-evidence partition; the gene test
    /// compares the two and the site test compares evidence with the
    /// background. Binding sites are then filtered by the gene test. Without a
    /// gene set every region is evidence, only the site test runs and binding
    /// sites are filtered by it.
    ///
    /// # Arguments
    /// - regions: sorted region set
    /// - mpbs: sorted binding sites predicted on those regions
    /// - gene_set: optional genes of interest
    pub fn run(
        &self,
        regions: &IntervalSet,
        mpbs: &IntervalSet,
        gene_set: Option<&GeneSet>,
    ) -> Result<RegionSetReport, EnrichmentError> {
        let config = self.config;
        let counter = self.counter;

        let associated = associate(
            regions,
            self.annotation,
            gene_set,
            config.promoter_length,
            config.max_association_length,
        )?;

        let mut report = match gene_set {
            Some(genes) => {
                let (evidence, non_evidence) =
                    associated.partition(("ev", "nev"), |r| is_evidence(&r.name));
                info!(
                    "'{}' against '{}': {} evidence, {} non-evidence regions",
                    regions.name,
                    genes.name,
                    evidence.len(),
                    non_evidence.len()
                );

                let ev_counts = counter.count_all(self.motifs, &evidence, mpbs, true)?;
                let nev_counts = counter.count_all(self.motifs, &non_evidence, mpbs, false)?;

                let gene_test = evaluate(
                    self.motifs,
                    &ev_counts,
                    &nev_counts,
                    config.alpha,
                    config.correction_method,
                );
                let site_test = evaluate(
                    self.motifs,
                    &ev_counts,
                    &self.background.counts,
                    config.alpha,
                    config.correction_method,
                );

                let lookup = corrected_p_values(&gene_test);
                let mpbs_evidence = significant_hits(&evidence, mpbs, &lookup, config)?;
                let mpbs_non_evidence = significant_hits(&non_evidence, mpbs, &lookup, config)?;

                RegionSetReport {
                    name: regions.name.clone(),
                    gene_set: Some(genes.name.clone()),
                    association: IntervalSet::default(),
                    gene_test: Some(gene_test),
                    site_test,
                    evidence_regions: evidence.len(),
                    non_evidence_regions: non_evidence.len(),
                    mpbs_evidence,
                    mpbs_non_evidence: Some(mpbs_non_evidence),
                }
            }
            None => {
                let ev_counts = counter.count_all(self.motifs, &associated, mpbs, true)?;
                let site_test = evaluate(
                    self.motifs,
                    &ev_counts,
                    &self.background.counts,
                    config.alpha,
                    config.correction_method,
                );

                let lookup = corrected_p_values(&site_test);
                let mpbs_evidence = significant_hits(&associated, mpbs, &lookup, config)?;

                RegionSetReport {
                    name: regions.name.clone(),
                    gene_set: None,
                    association: IntervalSet::default(),
                    gene_test: None,
                    site_test,
                    evidence_regions: associated.len(),
                    non_evidence_regions: 0,
                    mpbs_evidence,
                    mpbs_non_evidence: None,
                }
            }
        };

        let mut association = associated;
        for region in association.intervals.iter_mut() {
            region.name = display_name(&region.name);
        }
        report.association = association;

        let tested = report.gene_test.as_ref().unwrap_or(&report.site_test);
        info!(
            "'{}': {} of {} motifs significant at alpha {}",
            report.label(),
            tested.iter().filter(|r| r.significant).count(),
            tested.len(),
            config.alpha
        );

        Ok(report)
    }
}

fn significant_hits(
    regions: &IntervalSet,
    mpbs: &IntervalSet,
    corrected: &FxHashMap<String, f64>,
    config: &EnrichmentConfig,
) -> Result<IntervalSet, EnrichmentError> {
    let hits = collect_hits(regions, mpbs)?;
    let name = hits.name.clone();
    let kept = filter_mpbs(hits.intervals, corrected, config.print_thresh).collect();
    Ok(IntervalSet::new(&name, kept))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::results::ContingencyTable;
    use menrich_stats::CorrectionMethod;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::path::PathBuf;

    fn get_test_path(file_name: &str) -> PathBuf {
        std::env::current_dir()
            .unwrap()
            .join("../tests/data/enrichment")
            .join(file_name)
    }

    fn load(file_name: &str) -> IntervalSet {
        IntervalSet::try_from(get_test_path(file_name)).unwrap()
    }

    #[fixture]
    fn config() -> EnrichmentConfig {
        EnrichmentConfig {
            max_association_length: 10_000,
            print_thresh: 1.0,
            processes: 2,
            correction_method: CorrectionMethod::Independent,
            ..Default::default()
        }
    }

    #[fixture]
    fn annotation() -> GeneAnnotation {
        GeneAnnotation::from_bed(get_test_path("genes.bed")).unwrap()
    }

    #[fixture]
    fn motifs() -> Vec<String> {
        motif_names(&load("background_mpbs.bed"), None)
    }

    #[fixture]
    fn counter() -> MotifCounter {
        MotifCounter::new(2).unwrap()
    }

    #[fixture]
    fn background(motifs: Vec<String>, counter: MotifCounter) -> Background {
        let mpbs = load("background_mpbs.bed");
        Background::new(load("background.bed"), &mpbs, &motifs, &counter).unwrap()
    }

    fn find<'r>(results: &'r [EnrichmentResult], motif: &str) -> &'r EnrichmentResult {
        results.iter().find(|r| r.motif_name == motif).unwrap()
    }

    #[rstest]
    fn test_motif_names() {
        let mpbs = load("background_mpbs.bed");
        assert_eq!(motif_names(&mpbs, None), vec!["M1", "M2"]);

        let selected: BTreeSet<String> =
            ["M2".to_string(), "M7".to_string()].into_iter().collect();
        assert_eq!(motif_names(&mpbs, Some(&selected)), vec!["M2"]);
    }

    #[rstest]
    fn test_background_counts(background: Background) {
        assert_eq!(background.counts.get("M1"), (1, 9));
        assert_eq!(background.counts.get("M2"), (5, 5));
    }

    #[rstest]
    fn test_run_with_gene_set(
        config: EnrichmentConfig,
        annotation: GeneAnnotation,
        motifs: Vec<String>,
        background: Background,
        counter: MotifCounter,
    ) {
        let analysis = EnrichmentAnalysis {
            config: &config,
            annotation: &annotation,
            background: &background,
            motifs: &motifs,
            counter: &counter,
        };
        let genes = GeneSet::from_file(get_test_path("genes.txt")).unwrap();
        let report = analysis
            .run(&load("regions.bed"), &load("regions_mpbs.bed"), Some(&genes))
            .unwrap();

        assert_eq!(report.label(), "regions__genes");
        assert_eq!(report.evidence_regions, 2);
        assert_eq!(report.non_evidence_regions, 3);

        let gene_test = report.gene_test.as_ref().unwrap();
        let m1 = find(gene_test, "M1");
        assert_eq!(m1.table, ContingencyTable::new(2, 0, 0, 3));
        assert!((m1.p_value - 0.1).abs() < 1e-9);
        assert_eq!(m1.gene_list, vec!["GENEA", "GENED"]);
        let m2 = find(gene_test, "M2");
        assert_eq!(m2.table, ContingencyTable::new(0, 2, 2, 1));
        assert_eq!(m2.p_value, 1.0);
        assert_eq!(gene_test[0].motif_name, "M1");

        let m1_site = find(&report.site_test, "M1");
        assert_eq!(m1_site.table, ContingencyTable::new(2, 0, 1, 9));
        assert!((m1_site.p_value - 3.0 / 66.0).abs() < 1e-9);

        // print_thresh 1.0 keeps every site on the partitions
        assert_eq!(report.mpbs_evidence.len(), 3);
        assert_eq!(report.mpbs_non_evidence.as_ref().unwrap().len(), 2);

        let names: Vec<&str> = report.association.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["GENEA_0", "GENEB_0", ".", "GENED_0", "."]);
    }

    #[rstest]
    fn test_run_without_gene_set(
        config: EnrichmentConfig,
        annotation: GeneAnnotation,
        motifs: Vec<String>,
        background: Background,
        counter: MotifCounter,
    ) {
        let analysis = EnrichmentAnalysis {
            config: &config,
            annotation: &annotation,
            background: &background,
            motifs: &motifs,
            counter: &counter,
        };
        let report = analysis
            .run(&load("regions.bed"), &load("regions_mpbs.bed"), None)
            .unwrap();

        assert!(report.gene_test.is_none());
        assert!(report.mpbs_non_evidence.is_none());
        assert_eq!(report.label(), "regions");
        assert_eq!(report.evidence_regions, 5);

        let m1 = find(&report.site_test, "M1");
        assert_eq!(m1.table, ContingencyTable::new(2, 3, 1, 9));
        assert_eq!(m1.gene_list, vec!["GENEA", "GENED"]);
        let m2 = find(&report.site_test, "M2");
        assert_eq!(m2.table, ContingencyTable::new(2, 3, 5, 5));
        assert_eq!(m2.gene_list, vec!["GENEB"]);

        assert_eq!(report.mpbs_evidence.len(), 5);
    }

    // site test M1 is (2, 0, 1, 9): p = 3/66, corrected 6/66 over two motifs
    #[rstest]
    #[case(0.05, false)]
    #[case(0.1, true)]
    fn test_alpha_marks_significant_motifs(
        annotation: GeneAnnotation,
        motifs: Vec<String>,
        background: Background,
        counter: MotifCounter,
        #[case] alpha: f64,
        #[case] expected: bool,
    ) {
        let config = EnrichmentConfig {
            max_association_length: 10_000,
            alpha,
            correction_method: CorrectionMethod::Independent,
            ..Default::default()
        };
        let analysis = EnrichmentAnalysis {
            config: &config,
            annotation: &annotation,
            background: &background,
            motifs: &motifs,
            counter: &counter,
        };
        let genes = GeneSet::from_file(get_test_path("genes.txt")).unwrap();
        let report = analysis
            .run(&load("regions.bed"), &load("regions_mpbs.bed"), Some(&genes))
            .unwrap();

        let m1_site = find(&report.site_test, "M1");
        assert!((m1_site.corrected_p_value - 6.0 / 66.0).abs() < 1e-9);
        assert_eq!(m1_site.significant, expected);
        assert!(!find(&report.site_test, "M2").significant);
    }

    #[rstest]
    fn test_strict_threshold_drops_sites(
        annotation: GeneAnnotation,
        motifs: Vec<String>,
        background: Background,
        counter: MotifCounter,
    ) {
        let config = EnrichmentConfig {
            max_association_length: 10_000,
            print_thresh: 0.0,
            ..Default::default()
        };
        let analysis = EnrichmentAnalysis {
            config: &config,
            annotation: &annotation,
            background: &background,
            motifs: &motifs,
            counter: &counter,
        };
        let report = analysis
            .run(&load("regions.bed"), &load("regions_mpbs.bed"), None)
            .unwrap();
        assert!(report.mpbs_evidence.is_empty());
    }
}
