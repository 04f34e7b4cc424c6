use std::io::Write;
use std::path::Path;

use serde::Serialize;

use menrich_enrichment::{EnrichmentResult, RegionSetReport};

use crate::bed::create_file;
use crate::error::Result;

/// Column header of the statistics table.
pub const STATS_HEADER: [&str; 10] = [
    "FACTOR",
    "P-VALUE",
    "CORR.P-VALUE",
    "A",
    "B",
    "C",
    "D",
    "FREQ",
    "BACK.FREQ.",
    "GENES",
];

///
/// One row of the statistics table.
///
pub fn stats_row(result: &EnrichmentResult) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        result.motif_name,
        result.p_value_string(),
        result.corrected_p_value_string(),
        result.table.a,
        result.table.b,
        result.table.c,
        result.table.d,
        result.percent_string(),
        result.back_percent_string(),
        result.gene_list.join(",")
    )
}

///
/// Write ranked results as a tab-separated table, header first.
///
pub fn write_stats_table<W: Write>(results: &[EnrichmentResult], writer: &mut W) -> Result<()> {
    writeln!(writer, "{}", STATS_HEADER.join("\t"))?;
    for result in results {
        writeln!(writer, "{}", stats_row(result))?;
    }
    Ok(())
}

pub fn write_stats_file<T: AsRef<Path>>(results: &[EnrichmentResult], path: T) -> Result<()> {
    let mut file = create_file(path)?;
    write_stats_table(results, &mut file)?;
    file.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct ReportDocument<'a> {
    region_set: &'a str,
    gene_set: Option<&'a str>,
    evidence_regions: usize,
    non_evidence_regions: usize,
    gene_test: Option<&'a [EnrichmentResult]>,
    site_test: &'a [EnrichmentResult],
}

///
/// Dump the results of one region set as pretty-printed JSON.
///
pub fn write_report_json<T: AsRef<Path>>(report: &RegionSetReport, path: T) -> Result<()> {
    let document = ReportDocument {
        region_set: &report.name,
        gene_set: report.gene_set.as_deref(),
        evidence_regions: report.evidence_regions,
        non_evidence_regions: report.non_evidence_regions,
        gene_test: report.gene_test.as_deref(),
        site_test: &report.site_test,
    };

    let mut file = create_file(path)?;
    serde_json::to_writer_pretty(&mut file, &document)?;
    writeln!(file)?;
    file.flush()?;
    Ok(())
}
