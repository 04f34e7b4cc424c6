use std::collections::BTreeSet;
use std::io::BufRead;
use std::path::Path;

use menrich_core::models::Strand;
use menrich_core::utils::{get_dynamic_reader, label_from_path};

use crate::errors::GeneAnnotationError;

///
/// A single annotated gene: symbol, locus and strand. Coordinates are
/// 0-based half-open like every other interval in menrich.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Gene {
    pub symbol: String,
    pub chrom: String,
    pub start: u32,
    pub end: u32,
    pub strand: Strand,
}

impl Gene {
    ///
    /// Transcription start site: the first base of the gene on its strand.
    /// Unstranded genes are read as forward.
    ///
    pub fn tss(&self) -> u32 {
        match self.strand {
            Strand::Reverse => self.end.saturating_sub(1),
            _ => self.start,
        }
    }

    ///
    /// Promoter window as half-open `[start, end)` coordinates.
    ///
    /// The window holds the TSS base plus `promoter_length` bases upstream of
    /// it, so it is never empty. Upstream is towards lower coordinates on the
    /// forward strand and towards higher ones on the reverse strand.
    ///
    /// # Arguments
    /// - promoter_length: number of bases upstream of the TSS
    pub fn promoter_window(&self, promoter_length: u32) -> (u32, u32) {
        let tss = self.tss();
        match self.strand {
            Strand::Reverse => (tss, tss.saturating_add(promoter_length).saturating_add(1)),
            _ => (tss.saturating_sub(promoter_length), tss.saturating_add(1)),
        }
    }
}

///
/// A named list of gene symbols of interest. Lookups are case-insensitive.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneSet {
    pub name: String,
    genes: BTreeSet<String>,
}

impl GeneSet {
    pub fn new<I, S>(name: &str, genes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        GeneSet {
            name: name.to_string(),
            genes: genes
                .into_iter()
                .map(|g| g.as_ref().trim().to_uppercase())
                .filter(|g| !g.is_empty())
                .collect(),
        }
    }

    ///
    /// Read a gene set from a text file with one symbol per line. Blank lines
    /// and `#` comments are skipped; only the first whitespace-separated word
    /// of each line is used. The set is named after the file.
    ///
    /// # Arguments
    /// - path: gene list on disk, optionally gzipped
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, GeneAnnotationError> {
        let path = path.as_ref();
        let reader = get_dynamic_reader(path)?;

        let mut symbols = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(symbol) = line.split_whitespace().next() {
                symbols.push(symbol.to_string());
            }
        }

        Ok(GeneSet::new(&label_from_path(path), symbols))
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.genes.contains(&symbol.to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Upper-cased symbols, in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.genes.iter().map(String::as_str)
    }
}
