use std::path::{Path, PathBuf};

use rstest::*;

#[fixture]
fn path_to_data() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../tests/data/enrichment")
}

mod tests {
    use super::*;

    use std::fs::read_to_string;

    use menrich::core::models::IntervalSet;
    use menrich::enrichment::{
        Background, EnrichmentAnalysis, EnrichmentConfig, ExperimentalMatrix, MotifCounter,
        motif_names,
    };
    use menrich::genes::GeneAnnotation;
    use menrich::io::{EVIDENCE_COLOR, write_mpbs_bed, write_stats_file};
    use menrich::stats::CorrectionMethod;
    use pretty_assertions::assert_eq;

    #[rstest]
    fn test_matrix_run_end_to_end(path_to_data: PathBuf) {
        let config = EnrichmentConfig::try_from(path_to_data.join("config.toml").as_path()).unwrap();
        assert_eq!(config.correction_method, CorrectionMethod::Dependent);

        let matrix = ExperimentalMatrix::try_from(path_to_data.join("matrix.txt").as_path()).unwrap();
        let groups = matrix.load_groups().unwrap();
        assert_eq!(groups.len(), 1);

        let annotation = GeneAnnotation::from_path(path_to_data.join("genes.bed")).unwrap();
        let bg_mpbs = IntervalSet::try_from(path_to_data.join("background_mpbs.bed")).unwrap();
        let motifs = motif_names(&bg_mpbs, None);
        let counter = MotifCounter::new(config.processes).unwrap();
        let background = Background::new(
            IntervalSet::try_from(path_to_data.join("background.bed")).unwrap(),
            &bg_mpbs,
            &motifs,
            &counter,
        )
        .unwrap();

        let analysis = EnrichmentAnalysis {
            config: &config,
            annotation: &annotation,
            background: &background,
            motifs: &motifs,
            counter: &counter,
        };

        let group = &groups[0];
        let regions = &group.region_sets[0];
        let mpbs = IntervalSet::try_from(path_to_data.join("regions_mpbs.bed")).unwrap();
        let report = analysis
            .run(regions, &mpbs, group.gene_set.as_ref())
            .unwrap();

        assert_eq!(report.label(), "regions__interesting");

        let gene_test = report.gene_test.as_ref().unwrap();
        assert_eq!(gene_test[0].motif_name, "M1");
        for result in gene_test.iter().chain(report.site_test.iter()) {
            assert!(result.corrected_p_value >= result.p_value);
            assert!(result.corrected_p_value <= 1.0);
        }

        let out = tempfile::tempdir().unwrap();
        let stats_path = out.path().join(report.label()).join("genetest.txt");
        write_stats_file(gene_test, &stats_path).unwrap();
        let mpbs_path = out.path().join(report.label()).join("mpbs_ev.bed");
        write_mpbs_bed(&report.mpbs_evidence, &mpbs_path, EVIDENCE_COLOR).unwrap();

        let table = read_to_string(stats_path).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 1 + motifs.len());
        assert!(lines[0].starts_with("FACTOR\t"));
        assert!(lines[1].starts_with("M1\t"));
        assert!(lines[1].ends_with("GENEA,GENED"));

        let sites = read_to_string(mpbs_path).unwrap();
        assert_eq!(sites.lines().count(), report.mpbs_evidence.len());
        assert!(sites.lines().all(|l| l.ends_with(EVIDENCE_COLOR)));
    }

    #[rstest]
    fn test_default_config_rejects_nothing() {
        assert!(EnrichmentConfig::default().validate().is_ok());
    }
}
