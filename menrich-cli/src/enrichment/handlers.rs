use std::collections::BTreeSet;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};

use menrich_core::models::IntervalSet;
use menrich_core::utils::get_dynamic_reader;
use menrich_enrichment::{
    AnalysisGroup, Background, EnrichmentAnalysis, EnrichmentConfig, EnrichmentError,
    ExperimentalMatrix, MotifCounter, RegionSetReport, motif_names,
};
use menrich_genes::{GeneAnnotation, GeneSet};
use menrich_io::{
    EVIDENCE_COLOR, NON_EVIDENCE_COLOR, write_association_bed, write_mpbs_bed, write_report_json,
    write_stats_file,
};

///
/// Settings from `--config`, overridden by individual flags.
///
pub fn build_config(matches: &ArgMatches) -> Result<EnrichmentConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => EnrichmentConfig::try_from(Path::new(path))
            .with_context(|| format!("Failed to load config {path}"))?,
        None => EnrichmentConfig::default(),
    };

    if let Some(v) = matches.get_one::<u32>("promoter-length") {
        config.promoter_length = *v;
    }
    if let Some(v) = matches.get_one::<u32>("max-association-length") {
        config.max_association_length = *v;
    }
    if let Some(v) = matches.get_one::<f64>("alpha") {
        config.alpha = *v;
    }
    if let Some(v) = matches.get_one::<f64>("print-thresh") {
        config.print_thresh = *v;
    }
    if let Some(v) = matches.get_one::<usize>("processes") {
        config.processes = *v;
    }
    if let Some(v) = matches.get_one::<String>("correction-method") {
        config.correction_method = v.parse().map_err(anyhow::Error::msg)?;
    }

    config.validate()?;
    Ok(config)
}

///
/// Binding sites of a region set: `<dir>/<name>_mpbs.bed`, or `.bed.gz`.
///
pub fn find_mpbs_file(match_location: &Path, name: &str) -> Result<PathBuf, EnrichmentError> {
    ["bed", "bed.gz"]
        .iter()
        .map(|ext| match_location.join(format!("{name}_mpbs.{ext}")))
        .find(|path| path.is_file())
        .ok_or_else(|| {
            EnrichmentError::MissingInput(format!(
                "no {name}_mpbs.bed[.gz] in {}",
                match_location.display()
            ))
        })
}

fn read_motif_list(path: &Path) -> Result<BTreeSet<String>> {
    let reader = get_dynamic_reader(path)?;
    let mut motifs = BTreeSet::new();
    for line in reader.lines() {
        let line = line?;
        let motif = line.trim();
        if !motif.is_empty() && !motif.starts_with('#') {
            motifs.insert(motif.to_string());
        }
    }
    Ok(motifs)
}

fn load_groups(matches: &ArgMatches) -> Result<Vec<AnalysisGroup>> {
    if let Some(matrix) = matches.get_one::<String>("input-matrix") {
        let matrix = ExperimentalMatrix::try_from(Path::new(matrix))
            .with_context(|| format!("Failed to read experimental matrix {matrix}"))?;
        return Ok(matrix.load_groups()?);
    }

    let Some(files) = matches.get_many::<String>("regions") else {
        bail!("Give region files or --input-matrix");
    };
    let region_sets = files
        .map(|f| IntervalSet::try_from(f.as_str()).with_context(|| format!("Failed to read {f}")))
        .collect::<Result<Vec<_>>>()?;
    Ok(vec![AnalysisGroup::from_region_sets(region_sets)])
}

///
/// Write every output of one region set under `<output>/<label>/`.
///
pub fn write_report(report: &RegionSetReport, output: &Path) -> Result<()> {
    let dir = output.join(report.label());

    if let Some(gene_test) = &report.gene_test {
        write_stats_file(gene_test, dir.join("genetest.txt"))?;
    }
    write_stats_file(&report.site_test, dir.join("fulltest.txt"))?;
    write_report_json(report, dir.join("results.json"))?;
    write_association_bed(&report.association, dir.join("coord_association.bed"))?;
    write_mpbs_bed(&report.mpbs_evidence, dir.join("mpbs_ev.bed"), EVIDENCE_COLOR)?;
    if let Some(non_evidence) = &report.mpbs_non_evidence {
        write_mpbs_bed(non_evidence, dir.join("mpbs_nev.bed"), NON_EVIDENCE_COLOR)?;
    }

    info!("Wrote results for '{}' to {}", report.label(), dir.display());
    Ok(())
}

///
/// Binding sites from `path`, restricted to the selected motifs when there is
/// a selection.
///
fn load_mpbs(path: &Path, selected: Option<&BTreeSet<String>>) -> Result<IntervalSet> {
    let mpbs = IntervalSet::try_from(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(match selected {
        Some(selected) => mpbs.retain_names(selected),
        None => mpbs,
    })
}

fn analyze_region_set(
    analysis: &EnrichmentAnalysis,
    regions: &IntervalSet,
    gene_set: Option<&GeneSet>,
    selected: Option<&BTreeSet<String>>,
    match_location: &Path,
    output: &Path,
) -> Result<()> {
    let mpbs_path = find_mpbs_file(match_location, &regions.name)?;
    let mpbs = load_mpbs(&mpbs_path, selected)?;

    let report = analysis.run(regions, &mpbs, gene_set)?;
    write_report(&report, output)
}

pub fn run_enrichment(matches: &ArgMatches) -> Result<()> {
    let config = build_config(matches)?;

    let match_location = PathBuf::from(
        matches
            .get_one::<String>("match-location")
            .expect("A match location is required."),
    );
    let output = PathBuf::from(
        matches
            .get_one::<String>("output-location")
            .expect("Output location has a default."),
    );
    let annotation_path = matches
        .get_one::<String>("annotation")
        .expect("A gene annotation is required.");
    let background_path = matches
        .get_one::<String>("background")
        .expect("A background region file is required.");

    let groups = load_groups(matches)?;

    let annotation = GeneAnnotation::from_path(annotation_path)
        .with_context(|| format!("Failed to read gene annotation {annotation_path}"))?;
    info!("Loaded {} genes", annotation.len());

    let background_regions = IntervalSet::try_from(background_path.as_str())
        .with_context(|| format!("Failed to read background {background_path}"))?;
    let background_mpbs_path = match matches.get_one::<String>("background-mpbs") {
        Some(path) => PathBuf::from(path),
        None => find_mpbs_file(&match_location, &background_regions.name)?,
    };
    let selected = matches
        .get_one::<String>("selected-motifs")
        .map(|path| read_motif_list(Path::new(path)))
        .transpose()?;
    let background_mpbs = load_mpbs(&background_mpbs_path, selected.as_ref())?;

    let motifs = motif_names(&background_mpbs, selected.as_ref());
    if motifs.is_empty() {
        bail!("No motifs to test: the background has no binding sites of the selected motifs");
    }
    info!("Testing {} motifs", motifs.len());

    let counter = MotifCounter::new(config.processes)?;
    let background = Background::new(background_regions, &background_mpbs, &motifs, &counter)?;

    let analysis = EnrichmentAnalysis {
        config: &config,
        annotation: &annotation,
        background: &background,
        motifs: &motifs,
        counter: &counter,
    };

    let total: usize = groups.iter().map(|g| g.region_sets.len()).sum();
    let progress_bar = ProgressBar::new(total as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut failed: Vec<String> = Vec::new();
    for group in &groups {
        for regions in &group.region_sets {
            progress_bar.set_message(regions.name.clone());
            if let Err(e) = analyze_region_set(
                &analysis,
                regions,
                group.gene_set.as_ref(),
                selected.as_ref(),
                &match_location,
                &output,
            ) {
                error!("Region set '{}' failed: {e:#}", regions.name);
                failed.push(regions.name.clone());
            }
            progress_bar.inc(1);
        }
    }
    progress_bar.finish_and_clear();

    if !failed.is_empty() {
        bail!(
            "{} of {} region sets failed: {}",
            failed.len(),
            total,
            failed.join(", ")
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    use crate::enrichment::cli::create_enrichment_cli;

    fn get_test_path(file_name: &str) -> PathBuf {
        std::env::current_dir()
            .unwrap()
            .join("../tests/data/enrichment")
            .join(file_name)
    }

    fn matches_from(args: &[&str]) -> ArgMatches {
        create_enrichment_cli()
            .try_get_matches_from(std::iter::once("enrichment").chain(args.iter().copied()))
            .unwrap()
    }

    #[rstest]
    fn test_flags_override_config_file() {
        let config_path = get_test_path("config.toml");
        let matches = matches_from(&[
            "regions.bed",
            "--match-location",
            ".",
            "--background",
            "bg.bed",
            "--annotation",
            "genes.bed",
            "--config",
            config_path.to_str().unwrap(),
            "--processes",
            "3",
            "--correction-method",
            "independent",
        ]);
        let config = build_config(&matches).unwrap();
        assert_eq!(config.max_association_length, 10000);
        assert_eq!(config.processes, 3);
        assert_eq!(config.correction_method.to_string(), "independent");
    }

    #[rstest]
    fn test_invalid_override_is_rejected() {
        let matches = matches_from(&[
            "regions.bed",
            "--match-location",
            ".",
            "--background",
            "bg.bed",
            "--annotation",
            "genes.bed",
            "--alpha",
            "2.0",
        ]);
        assert!(build_config(&matches).is_err());
    }

    #[rstest]
    fn test_find_mpbs_file() {
        let dir = get_test_path("");
        assert_eq!(
            find_mpbs_file(&dir, "regions").unwrap(),
            dir.join("regions_mpbs.bed")
        );
        assert!(matches!(
            find_mpbs_file(&dir, "nothing"),
            Err(EnrichmentError::MissingInput(_))
        ));
    }

    #[rstest]
    fn test_run_enrichment_from_matrix() {
        let tempdir = tempfile::tempdir().unwrap();
        let output = tempdir.path().join("out");
        let data = get_test_path("");
        let matches = matches_from(&[
            "--input-matrix",
            get_test_path("matrix.txt").to_str().unwrap(),
            "--match-location",
            data.to_str().unwrap(),
            "--background",
            get_test_path("background.bed").to_str().unwrap(),
            "--annotation",
            get_test_path("genes.bed").to_str().unwrap(),
            "--config",
            get_test_path("config.toml").to_str().unwrap(),
            "--output-location",
            output.to_str().unwrap(),
        ]);

        run_enrichment(&matches).unwrap();

        let dir = output.join("regions__interesting");
        for file in [
            "genetest.txt",
            "fulltest.txt",
            "results.json",
            "coord_association.bed",
            "mpbs_ev.bed",
            "mpbs_nev.bed",
        ] {
            assert!(dir.join(file).is_file(), "missing {file}");
        }

        let genetest = std::fs::read_to_string(dir.join("genetest.txt")).unwrap();
        let first_row: Vec<&str> = genetest.lines().nth(1).unwrap().split('\t').collect();
        assert_eq!(first_row[0], "M1");
        assert_eq!(&first_row[3..7], &["2", "0", "0", "3"]);
        assert_eq!(first_row[9], "GENEA,GENED");
    }

    #[rstest]
    fn test_run_enrichment_with_selected_motifs() {
        let tempdir = tempfile::tempdir().unwrap();
        let output = tempdir.path().join("out");
        let selection = tempdir.path().join("motifs.txt");
        std::fs::write(&selection, "# keep one\nM1\n").unwrap();

        let matches = matches_from(&[
            get_test_path("regions.bed").to_str().unwrap(),
            "--match-location",
            get_test_path("").to_str().unwrap(),
            "--background",
            get_test_path("background.bed").to_str().unwrap(),
            "--annotation",
            get_test_path("genes.bed").to_str().unwrap(),
            "--config",
            get_test_path("config.toml").to_str().unwrap(),
            "--selected-motifs",
            selection.to_str().unwrap(),
            "--output-location",
            output.to_str().unwrap(),
        ]);

        run_enrichment(&matches).unwrap();

        let dir = output.join("regions");
        let fulltest = std::fs::read_to_string(dir.join("fulltest.txt")).unwrap();
        let factors: Vec<&str> = fulltest
            .lines()
            .skip(1)
            .map(|l| l.split('\t').next().unwrap())
            .collect();
        assert_eq!(factors, vec!["M1"]);

        let sites = std::fs::read_to_string(dir.join("mpbs_ev.bed")).unwrap();
        assert!(!sites.is_empty());
        assert!(sites.lines().all(|l| l.split('\t').nth(3) == Some("M1")));
    }

    #[rstest]
    fn test_load_mpbs_restricts_to_selection() {
        let selected: BTreeSet<String> = ["M2".to_string()].into_iter().collect();
        let path = get_test_path("regions_mpbs.bed");

        let all = load_mpbs(&path, None).unwrap();
        let kept = load_mpbs(&path, Some(&selected)).unwrap();
        assert_eq!(all.len(), 6);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept.name, all.name);
        assert!(kept.is_sorted());
    }

    #[rstest]
    fn test_run_enrichment_reports_failed_region_sets() {
        let tempdir = tempfile::tempdir().unwrap();
        // no lonely_mpbs.bed next to the other binding site files
        let regions = tempdir.path().join("lonely.bed");
        std::fs::write(&regions, "chr1\t10\t20\n").unwrap();

        let matches = matches_from(&[
            regions.to_str().unwrap(),
            "--match-location",
            get_test_path("").to_str().unwrap(),
            "--background",
            get_test_path("background.bed").to_str().unwrap(),
            "--annotation",
            get_test_path("genes.bed").to_str().unwrap(),
            "--output-location",
            tempdir.path().join("out").to_str().unwrap(),
        ]);

        let err = run_enrichment(&matches).unwrap_err();
        assert!(err.to_string().contains("lonely"));
    }
}
