use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

use log::{debug, warn};
use menrich_core::models::{GenomicInterval, IntervalSet, Strand};
use menrich_core::utils::get_dynamic_reader;

use crate::errors::GeneAnnotationError;
use crate::models::Gene;

///
/// Genes of a genome, indexed per chromosome by transcription start site so
/// that all promoter windows near a region can be found with a binary search.
///
#[derive(Debug, Clone, Default)]
pub struct GeneAnnotation {
    genes: BTreeMap<String, Vec<Gene>>,
}

impl From<Vec<Gene>> for GeneAnnotation {
    fn from(genes: Vec<Gene>) -> Self {
        let mut by_chrom: BTreeMap<String, Vec<Gene>> = BTreeMap::new();
        for gene in genes {
            by_chrom.entry(gene.chrom.clone()).or_default().push(gene);
        }
        for genes in by_chrom.values_mut() {
            genes.sort_by(|a, b| a.tss().cmp(&b.tss()).then_with(|| a.symbol.cmp(&b.symbol)));
        }
        GeneAnnotation { genes: by_chrom }
    }
}

impl GeneAnnotation {
    ///
    /// Load an annotation, choosing the parser from the file extension
    /// (`.bed` or `.gtf`, either optionally gzipped).
    ///
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, GeneAnnotationError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let base = file_name.strip_suffix(".gz").unwrap_or(file_name);

        if base.ends_with(".gtf") || base.ends_with(".gff") {
            GeneAnnotation::from_gtf(path)
        } else if base.ends_with(".bed") {
            GeneAnnotation::from_bed(path)
        } else {
            Err(GeneAnnotationError::UnsupportedFormat(file_name.to_string()))
        }
    }

    ///
    /// Load genes from a BED6 file: the name column holds the gene symbol and
    /// the strand column its orientation.
    ///
    /// # Arguments
    /// - path: BED file on disk, optionally gzipped
    pub fn from_bed<P: AsRef<Path>>(path: P) -> Result<Self, GeneAnnotationError> {
        let set = IntervalSet::try_from(path.as_ref())?;
        let mut genes = Vec::with_capacity(set.len());
        let mut unnamed = 0usize;

        for interval in set.intervals {
            if interval.name == "." || interval.name.is_empty() {
                unnamed += 1;
                continue;
            }
            genes.push(Gene {
                symbol: interval.name,
                chrom: interval.chrom,
                start: interval.start,
                end: interval.end,
                strand: interval.strand,
            });
        }

        if unnamed > 0 {
            warn!("Skipped {unnamed} unnamed genes in {}", path.as_ref().display());
        }

        Ok(GeneAnnotation::from(genes))
    }

    ///
    /// Load `gene` features from a GTF file. The symbol is taken from the
    /// `gene_name` attribute, falling back to `gene_id`. GTF coordinates are
    /// 1-based inclusive and are converted to 0-based half-open.
    ///
    /// # Arguments
    /// - path: GTF file on disk, optionally gzipped
    pub fn from_gtf<P: AsRef<Path>>(path: P) -> Result<Self, GeneAnnotationError> {
        let reader = get_dynamic_reader(path.as_ref())?;
        let mut genes = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < 9 {
                return Err(GeneAnnotationError::Parse {
                    line: idx + 1,
                    msg: format!("expected 9 columns, found {}", fields.len()),
                });
            }
            if fields[2] != "gene" {
                continue;
            }

            let start: u32 = fields[3].parse().map_err(|_| GeneAnnotationError::Parse {
                line: idx + 1,
                msg: format!("invalid start '{}'", fields[3]),
            })?;
            let end: u32 = fields[4].parse().map_err(|_| GeneAnnotationError::Parse {
                line: idx + 1,
                msg: format!("invalid end '{}'", fields[4]),
            })?;
            if start == 0 || end < start {
                return Err(GeneAnnotationError::Parse {
                    line: idx + 1,
                    msg: format!("invalid gene coordinates {start}-{end}"),
                });
            }

            let attrs = fields[8];
            let symbol = match extract_gtf_attribute(attrs, "gene_name")
                .or_else(|| extract_gtf_attribute(attrs, "gene_id"))
            {
                Some(symbol) => symbol,
                None => {
                    debug!("GTF line {} has no gene_name or gene_id, skipping", idx + 1);
                    continue;
                }
            };

            genes.push(Gene {
                symbol,
                chrom: fields[0].to_string(),
                start: start - 1,
                end,
                strand: fields[6].parse().unwrap_or_default(),
            });
        }

        Ok(GeneAnnotation::from(genes))
    }

    pub fn len(&self) -> usize {
        self.genes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.values().all(Vec::is_empty)
    }

    pub fn has_chrom(&self, chrom: &str) -> bool {
        self.genes.contains_key(chrom)
    }

    ///
    /// Every gene whose promoter window lies within `max_distance` bases of
    /// `region`, with its signed distance.
    ///
    /// The distance is 0 when region and window overlap, otherwise the gap in
    /// bases between them. It is negative when the region lies upstream of the
    /// window with respect to the gene's strand. A gene qualifies only when
    /// the gap is strictly smaller than `max_distance`, so `max_distance == 0`
    /// never associates anything.
    ///
    /// Genes sharing a symbol are reported once, at their smallest absolute
    /// distance. The result is ordered by absolute distance, then symbol.
    ///
    /// # Arguments
    /// - region: interval to look up
    /// - promoter_length: bases upstream of each TSS that form the promoter window
    /// - max_distance: exclusive upper bound on the gap
    pub fn promoters_near(
        &self,
        region: &GenomicInterval,
        promoter_length: u32,
        max_distance: u32,
    ) -> Vec<(String, i64)> {
        let Some(genes) = self.genes.get(&region.chrom) else {
            return Vec::new();
        };
        if max_distance == 0 {
            return Vec::new();
        }

        // every window lies within promoter_length + 1 bases of its TSS
        let reach = max_distance as i64 + promoter_length as i64 + 1;
        let lower = region.start as i64 - reach;
        let upper = region.end as i64 + reach;

        let first = genes.partition_point(|g| (g.tss() as i64) < lower);

        let mut best: BTreeMap<&str, i64> = BTreeMap::new();
        for gene in genes[first..].iter().take_while(|g| (g.tss() as i64) <= upper) {
            let distance = signed_distance(region, gene, promoter_length);
            if distance.unsigned_abs() >= max_distance as u64 {
                continue;
            }
            best.entry(gene.symbol.as_str())
                .and_modify(|d| {
                    if distance.abs() < d.abs() {
                        *d = distance;
                    }
                })
                .or_insert(distance);
        }

        let mut hits: Vec<(String, i64)> = best
            .into_iter()
            .map(|(symbol, distance)| (symbol.to_string(), distance))
            .collect();
        hits.sort_by(|a, b| a.1.abs().cmp(&b.1.abs()).then_with(|| a.0.cmp(&b.0)));
        hits
    }
}

///
/// Signed gap between a region and a gene's promoter window, 0 on overlap.
///
fn signed_distance(region: &GenomicInterval, gene: &Gene, promoter_length: u32) -> i64 {
    let (window_start, window_end) = gene.promoter_window(promoter_length);

    let (gap, region_is_left) = if region.end <= window_start {
        ((window_start - region.end) as i64, true)
    } else if region.start >= window_end {
        ((region.start - window_end) as i64, false)
    } else {
        return 0;
    };

    let upstream = match gene.strand {
        Strand::Reverse => !region_is_left,
        _ => region_is_left,
    };
    if upstream { -gap } else { gap }
}

fn extract_gtf_attribute(attrs: &str, key: &str) -> Option<String> {
    attrs
        .split(';')
        .map(str::trim)
        .find_map(|attr| attr.strip_prefix(key)?.trim().strip_prefix('"')?.strip_suffix('"'))
        .map(str::to_string)
}
