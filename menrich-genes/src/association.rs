use std::collections::BTreeSet;

use log::{info, warn};
use menrich_core::models::name::{join_tokens, split_tokens};
use menrich_core::models::IntervalSet;

use crate::annotation::GeneAnnotation;
use crate::errors::GeneAnnotationError;
use crate::models::GeneSet;

/// Prefix marking a gene that lies in range but is outside the gene set of interest.
pub const EXCLUSION_MARKER: char = '.';

///
/// One gene found near a region.
///
#[derive(Debug, Clone, PartialEq)]
pub struct GeneHit {
    pub gene: String,
    pub distance: i64,
    /// `false` when a gene set was given and this gene is not in it.
    pub of_interest: bool,
}

impl GeneHit {
    fn to_token(&self) -> String {
        if self.of_interest {
            format!("{}_{}", self.gene, self.distance)
        } else {
            format!("{}{}_{}", EXCLUSION_MARKER, self.gene, self.distance)
        }
    }

    fn from_token(token: &str) -> Option<GeneHit> {
        let (of_interest, body) = match token.strip_prefix(EXCLUSION_MARKER) {
            Some(rest) => (false, rest),
            None => (true, token),
        };
        let (gene, distance) = body.rsplit_once('_')?;
        Some(GeneHit {
            gene: gene.to_string(),
            distance: distance.parse().ok()?,
            of_interest,
        })
    }
}

///
/// All genes associated with one region, as encoded in the region's name.
///
/// The name holds colon-separated `GENE_distance` tokens; genes outside the
/// gene set of interest carry a leading [`EXCLUSION_MARKER`]. A region with no
/// gene in range is named `.`.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneAssociation {
    pub hits: Vec<GeneHit>,
}

impl GeneAssociation {
    ///
    /// Decode a region name. Tokens that do not parse as `GENE_distance` are
    /// ignored.
    ///
    pub fn decode(name: &str) -> GeneAssociation {
        GeneAssociation {
            hits: split_tokens(name).filter_map(GeneHit::from_token).collect(),
        }
    }

    pub fn encode(&self) -> String {
        join_tokens(self.hits.iter().map(GeneHit::to_token))
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    ///
    /// Is at least one gene of interest associated? This decides the
    /// evidence/non-evidence split.
    ///
    pub fn is_evidence(&self) -> bool {
        self.hits.iter().any(|h| h.of_interest)
    }

    ///
    /// Name for display: every token with the exclusion marker stripped.
    ///
    pub fn display_name(&self) -> String {
        join_tokens(self.hits.iter().map(|h| format!("{}_{}", h.gene, h.distance)))
    }
}

///
/// Fast check on an encoded name: does any token lack the exclusion marker?
///
pub fn is_evidence(name: &str) -> bool {
    split_tokens(name).any(|t| !t.starts_with(EXCLUSION_MARKER))
}

///
/// Gene symbols of interest in an encoded name.
///
pub fn evidence_genes(name: &str) -> impl Iterator<Item = &str> {
    split_tokens(name)
        .filter(|t| !t.starts_with(EXCLUSION_MARKER))
        .filter_map(|t| t.rsplit_once('_').map(|(gene, _)| gene))
}

///
/// Strip exclusion markers from an encoded name. Tokens that do not parse as
/// `GENE_distance` are dropped.
///
pub fn display_name(name: &str) -> String {
    GeneAssociation::decode(name).display_name()
}

///
/// Associate every region with the genes whose promoter window lies within
/// `max_distance` of it, rewriting the region's name into the gene/distance
/// token list (see [`GeneAssociation`]).
///
/// Order, coordinates, strand and score of the regions are preserved. When
/// `genes` is `None` every annotated gene counts as a gene of interest.
///
/// # Arguments
/// - regions: sorted region set to annotate
/// - annotation: genome annotation
/// - genes: optional gene set of interest
/// - promoter_length: bases upstream of each TSS forming the promoter window
/// - max_distance: exclusive upper bound on the region-to-window gap
pub fn associate(
    regions: &IntervalSet,
    annotation: &GeneAnnotation,
    genes: Option<&GeneSet>,
    promoter_length: u32,
    max_distance: u32,
) -> Result<IntervalSet, GeneAnnotationError> {
    regions.ensure_sorted()?;

    let mut missing_chroms: BTreeSet<&str> = BTreeSet::new();
    let mut associated = Vec::with_capacity(regions.len());
    let mut evidence = 0usize;

    for region in regions {
        if !annotation.has_chrom(&region.chrom) {
            missing_chroms.insert(region.chrom.as_str());
        }

        let association = GeneAssociation {
            hits: annotation
                .promoters_near(region, promoter_length, max_distance)
                .into_iter()
                .map(|(gene, distance)| GeneHit {
                    of_interest: genes.is_none_or(|set| set.contains(&gene)),
                    gene,
                    distance,
                })
                .collect(),
        };
        if association.is_evidence() {
            evidence += 1;
        }

        let mut out = region.clone();
        out.name = association.encode();
        associated.push(out);
    }

    for chrom in &missing_chroms {
        warn!(
            "No genes annotated on {chrom}; its regions in '{}' get no association",
            regions.name
        );
    }
    info!(
        "Associated {} of {} regions in '{}' with genes of interest",
        evidence,
        regions.len(),
        regions.name
    );

    let mut set = IntervalSet::new(&regions.name, associated);
    set.path = regions.path.clone();
    Ok(set)
}
