use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;

use menrich_core::models::{GenomicInterval, IntervalSet};

///
/// Open a buffered file for writing, creating parent directories.
///
pub fn create_file<T: AsRef<Path>>(path: T) -> std::io::Result<BufWriter<File>> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(BufWriter::new(File::create(path)?))
}

fn write_lines<W, I>(writer: &mut W, lines: I) -> std::io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = String>,
{
    for line in lines {
        writeln!(writer, "{line}")?;
    }
    writer.flush()
}

///
/// Write text lines to `path`, gzip-compressed when the path ends in `.gz`.
///
pub fn write_bed_lines<T, I>(path: T, lines: I) -> std::io::Result<()>
where
    T: AsRef<Path>,
    I: IntoIterator<Item = String>,
{
    let path = path.as_ref();
    let mut file = create_file(path)?;
    match path.extension() {
        Some(ext) if ext == "gz" => {
            let mut encoder = GzEncoder::new(file, Compression::best());
            write_lines(&mut encoder, lines)?;
            encoder.finish()?.flush()
        }
        _ => write_lines(&mut file, lines),
    }
}

///
/// Write the gene association of a region set as BED4: coordinates and the
/// colon-joined `GENE_distance` tokens (or `.`).
///
pub fn write_association_bed<T: AsRef<Path>>(set: &IntervalSet, path: T) -> std::io::Result<()> {
    write_bed_lines(path, set.iter().map(association_line))
}

pub fn association_line(region: &GenomicInterval) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        region.chrom, region.start, region.end, region.name
    )
}

/// Display color of binding sites on evidence regions.
pub const EVIDENCE_COLOR: &str = "0,130,0";
/// Display color of binding sites on non-evidence regions.
pub const NON_EVIDENCE_COLOR: &str = "130,0,0";

fn bed9_line(site: &GenomicInterval, color: &str) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        site.chrom,
        site.start,
        site.end,
        site.name,
        site.score,
        site.strand,
        site.start,
        site.end,
        color
    )
}

///
/// Write binding sites as coordinate-sorted BED9, every record carrying
/// `color` as its `itemRgb`.
///
/// # Arguments
/// - set: binding sites to write
/// - path: output path
/// - color: `r,g,b` string
pub fn write_mpbs_bed<T: AsRef<Path>>(
    set: &IntervalSet,
    path: T,
    color: &str,
) -> std::io::Result<()> {
    let mut sites: Vec<&GenomicInterval> = set.iter().collect();
    sites.sort_by(|a, b| a.cmp_position(b));

    write_bed_lines(path, sites.into_iter().map(|site| bed9_line(site, color)))
}
