//! Experimental matrix: a tab-separated table listing region sets and gene
//! sets, optionally grouped so that each region set is tested against the
//! gene set of its group.
//!
//! ```text
//! name        type     file              genegroup
//! K562        regions  k562_peaks.bed    erythroid
//! ery_genes   genes    erythroid.txt     erythroid
//! ```
use std::io::BufRead;
use std::path::{Path, PathBuf};

use log::{info, warn};
use menrich_core::models::IntervalSet;
use menrich_core::utils::get_dynamic_reader;
use menrich_genes::GeneSet;

use crate::errors::EnrichmentError;

///
/// One matrix row, resolved once by its `type` column.
///
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixEntry {
    Regions {
        name: String,
        path: PathBuf,
        group: Option<String>,
    },
    Genes {
        name: String,
        path: PathBuf,
        group: Option<String>,
    },
}

impl MatrixEntry {
    pub fn name(&self) -> &str {
        match self {
            MatrixEntry::Regions { name, .. } | MatrixEntry::Genes { name, .. } => name,
        }
    }

    pub fn group(&self) -> Option<&str> {
        match self {
            MatrixEntry::Regions { group, .. } | MatrixEntry::Genes { group, .. } => {
                group.as_deref()
            }
        }
    }
}

///
/// Region sets tested together, with the gene set that defines their
/// evidence regions. Without a gene set only the site test runs.
///
#[derive(Debug, Clone, Default)]
pub struct AnalysisGroup {
    pub name: Option<String>,
    pub gene_set: Option<GeneSet>,
    pub region_sets: Vec<IntervalSet>,
}

impl AnalysisGroup {
    ///
    /// A single group without a gene set, for region files given directly.
    ///
    pub fn from_region_sets(region_sets: Vec<IntervalSet>) -> Self {
        AnalysisGroup {
            name: None,
            gene_set: None,
            region_sets,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExperimentalMatrix {
    pub entries: Vec<MatrixEntry>,
}

impl TryFrom<&Path> for ExperimentalMatrix {
    type Error = EnrichmentError;

    ///
    /// Parse a matrix file. Relative file paths are resolved against the
    /// directory holding the matrix.
    ///
    fn try_from(path: &Path) -> Result<Self, EnrichmentError> {
        let base = path.parent().unwrap_or(Path::new("."));
        let reader = get_dynamic_reader(path)?;
        let mut lines = reader.lines().enumerate();

        let header = loop {
            match lines.next() {
                Some((_, line)) => {
                    let line = line?;
                    if !line.trim().is_empty() && !line.starts_with('#') {
                        break line;
                    }
                }
                None => {
                    return Err(EnrichmentError::Matrix {
                        line: 0,
                        msg: "empty matrix".to_string(),
                    });
                }
            }
        };

        let columns: Vec<String> = header
            .split('\t')
            .map(|c| c.trim().to_lowercase())
            .collect();
        let column = |name: &str| columns.iter().position(|c| c == name);
        let (Some(name_col), Some(type_col), Some(file_col)) =
            (column("name"), column("type"), column("file"))
        else {
            return Err(EnrichmentError::Matrix {
                line: 1,
                msg: "header must contain name, type and file columns".to_string(),
            });
        };
        let group_col = column("genegroup");

        let mut entries = Vec::new();
        for (idx, line) in lines {
            let line = line?;
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
            let field = |col: usize| -> Result<String, EnrichmentError> {
                fields
                    .get(col)
                    .filter(|f| !f.is_empty())
                    .map(|f| f.to_string())
                    .ok_or_else(|| EnrichmentError::Matrix {
                        line: idx + 1,
                        msg: format!("missing column {}", columns[col]),
                    })
            };

            let name = field(name_col)?;
            let file = PathBuf::from(field(file_col)?);
            let path = if file.is_absolute() { file } else { base.join(file) };
            let group = group_col.and_then(|col| field(col).ok());

            let entry = match field(type_col)?.to_lowercase().as_str() {
                "regions" => MatrixEntry::Regions { name, path, group },
                "genes" => MatrixEntry::Genes { name, path, group },
                other => {
                    return Err(EnrichmentError::Matrix {
                        line: idx + 1,
                        msg: format!("unknown type '{other}', expected regions or genes"),
                    });
                }
            };
            entries.push(entry);
        }

        Ok(ExperimentalMatrix { entries })
    }
}

impl ExperimentalMatrix {
    pub fn region_entries(&self) -> impl Iterator<Item = &MatrixEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e, MatrixEntry::Regions { .. }))
    }

    ///
    /// Load every file and group the sets by their `genegroup`, in order of
    /// first appearance. Region sets without a group share one group with no
    /// gene set. A group listing several gene sets keeps the first.
    ///
    pub fn load_groups(&self) -> Result<Vec<AnalysisGroup>, EnrichmentError> {
        let mut groups: Vec<AnalysisGroup> = Vec::new();

        for entry in &self.entries {
            let key = entry.group().map(str::to_string);
            let position = match groups.iter().position(|g| g.name == key) {
                Some(position) => position,
                None => {
                    groups.push(AnalysisGroup {
                        name: key.clone(),
                        ..Default::default()
                    });
                    groups.len() - 1
                }
            };
            let group = &mut groups[position];

            match entry {
                MatrixEntry::Regions { name, path, .. } => {
                    let set = IntervalSet::try_from(path.as_path())?.with_name(name);
                    info!("Loaded region set '{}' ({} regions)", name, set.len());
                    group.region_sets.push(set);
                }
                MatrixEntry::Genes { name, path, .. } => {
                    if group.name.is_none() {
                        warn!("Gene set '{name}' has no genegroup and is ignored");
                        continue;
                    }
                    if let Some(existing) = &group.gene_set {
                        warn!(
                            "Group '{}' already uses gene set '{}'; ignoring '{}'",
                            key.as_deref().unwrap_or_default(),
                            existing.name,
                            name
                        );
                        continue;
                    }
                    let mut genes = GeneSet::from_file(path)?;
                    genes.name = name.clone();
                    group.gene_set = Some(genes);
                }
            }
        }

        groups.retain(|g| !g.region_sets.is_empty());
        for group in &groups {
            if group.gene_set.is_none() {
                warn!(
                    "No gene set for group '{}'; running the site test only",
                    group.name.as_deref().unwrap_or("default")
                );
            }
        }

        Ok(groups)
    }
}
