use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;

use menrich_core::models::IntervalSet;
use menrich_genes::{GeneAnnotation, GeneSet, associate, display_name};
use menrich_io::{association_line, write_association_bed};

pub fn run_associate(matches: &ArgMatches) -> Result<()> {
    let regions_file = matches
        .get_one::<String>("regions")
        .expect("A region file is required.");
    let annotation_file = matches
        .get_one::<String>("annotation")
        .expect("A gene annotation is required.");
    let promoter_length = *matches
        .get_one::<u32>("promoter-length")
        .expect("Promoter length has a default.");
    let max_distance = *matches
        .get_one::<u32>("max-association-length")
        .expect("Maximum association length has a default.");

    let regions = IntervalSet::try_from(regions_file.as_str())
        .with_context(|| format!("Failed to read {regions_file}"))?;
    let annotation = GeneAnnotation::from_path(annotation_file)
        .with_context(|| format!("Failed to read gene annotation {annotation_file}"))?;
    let genes = matches
        .get_one::<String>("genes")
        .map(GeneSet::from_file)
        .transpose()?;

    let mut associated = associate(
        &regions,
        &annotation,
        genes.as_ref(),
        promoter_length,
        max_distance,
    )?;
    for region in associated.intervals.iter_mut() {
        region.name = display_name(&region.name);
    }

    match matches.get_one::<String>("output") {
        Some(path) => write_association_bed(&associated, Path::new(path))?,
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            for region in &associated {
                writeln!(writer, "{}", association_line(region))?;
            }
            writer.flush()?;
        }
    }

    Ok(())
}
