use std::cmp::Ordering;
use std::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::IntervalError;
use crate::models::name::NO_NAME;
use crate::models::strand::Strand;

///
/// A half-open genomic interval `[start, end)` with BED6 metadata.
///
/// Coordinates are fixed at construction; `name` and `score` are the only
/// fields rewritten afterwards (by gene association).
///
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GenomicInterval {
    pub chrom: String,
    pub start: u32,
    pub end: u32,
    pub name: String,
    pub score: f64,
    pub strand: Strand,
}

impl GenomicInterval {
    ///
    /// Create a new interval, rejecting empty or inverted coordinates.
    ///
    pub fn new(chrom: &str, start: u32, end: u32) -> Result<Self, IntervalError> {
        if start >= end {
            return Err(IntervalError::InvalidInterval {
                chrom: chrom.to_string(),
                start,
                end,
            });
        }
        Ok(GenomicInterval {
            chrom: chrom.to_string(),
            start,
            end,
            name: NO_NAME.to_string(),
            score: 0.0,
            strand: Strand::Unstranded,
        })
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    pub fn with_strand(mut self, strand: Strand) -> Self {
        self.strand = strand;
        self
    }

    pub fn width(&self) -> u32 {
        self.end - self.start
    }

    /// Half-open overlap test; chromosomes must match.
    #[inline]
    pub fn overlaps(&self, other: &GenomicInterval) -> bool {
        self.chrom == other.chrom && self.start < other.end && other.start < self.end
    }

    /// Genomic order: chromosome (lexicographic), then start, then end.
    #[inline]
    pub fn cmp_position(&self, other: &GenomicInterval) -> Ordering {
        self.chrom
            .cmp(&other.chrom)
            .then_with(|| self.start.cmp(&other.start))
            .then_with(|| self.end.cmp(&other.end))
    }

    ///
    /// Parse one BED line (BED3 up to BED6; extra columns are ignored).
    ///
    /// # Arguments
    /// - line: the raw tab-separated line
    /// - line_number: 1-based line number used in error messages
    pub fn from_bed_line(line: &str, line_number: usize) -> Result<Self, IntervalError> {
        let parse_err = |msg: String| IntervalError::Parse {
            line: line_number,
            msg,
        };

        let mut fields = line.trim_end_matches(['\r', '\n']).split('\t');

        let chrom = fields
            .next()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| parse_err("missing chromosome field".to_string()))?;
        let start: u32 = fields
            .next()
            .ok_or_else(|| parse_err("missing start field".to_string()))?
            .parse()
            .map_err(|_| parse_err(format!("invalid start position in '{}'", line)))?;
        let end: u32 = fields
            .next()
            .ok_or_else(|| parse_err("missing end field".to_string()))?
            .parse()
            .map_err(|_| parse_err(format!("invalid end position in '{}'", line)))?;

        let name = fields.next().unwrap_or(NO_NAME);
        let score = match fields.next() {
            None | Some(".") | Some("") => 0.0,
            Some(s) => s
                .parse::<f64>()
                .map_err(|_| parse_err(format!("invalid score '{}'", s)))?,
        };
        let strand = match fields.next() {
            None | Some("") => Strand::Unstranded,
            Some(s) => s
                .parse::<Strand>()
                .map_err(|e| parse_err(e.to_string()))?,
        };

        let interval = GenomicInterval::new(chrom, start, end)
            .map_err(|e| parse_err(e.to_string()))?;

        Ok(interval
            .with_name(name)
            .with_score(score)
            .with_strand(strand))
    }

    ///
    /// BED6 representation of the interval.
    ///
    pub fn as_string(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.chrom, self.start, self.end, self.name, self.score, self.strand
        )
    }
}

impl Display for GenomicInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_new_rejects_empty_interval() {
        assert!(GenomicInterval::new("chr1", 10, 10).is_err());
        assert!(GenomicInterval::new("chr1", 20, 10).is_err());
        assert!(GenomicInterval::new("chr1", 10, 11).is_ok());
    }

    #[rstest]
    #[case(("chr1", 100, 200), ("chr1", 199, 300), true)]
    #[case(("chr1", 100, 200), ("chr1", 200, 300), false)]
    #[case(("chr1", 100, 200), ("chr2", 150, 160), false)]
    #[case(("chr1", 100, 200), ("chr1", 50, 101), true)]
    #[case(("chr1", 100, 200), ("chr1", 120, 130), true)]
    fn test_overlaps(
        #[case] a: (&str, u32, u32),
        #[case] b: (&str, u32, u32),
        #[case] expected: bool,
    ) {
        let a = GenomicInterval::new(a.0, a.1, a.2).unwrap();
        let b = GenomicInterval::new(b.0, b.1, b.2).unwrap();
        assert_eq!(a.overlaps(&b), expected);
        assert_eq!(b.overlaps(&a), expected);
    }

    #[rstest]
    fn test_cmp_position() {
        let a = GenomicInterval::new("chr1", 100, 200).unwrap();
        let b = GenomicInterval::new("chr1", 100, 300).unwrap();
        let c = GenomicInterval::new("chr10", 1, 2).unwrap();
        let d = GenomicInterval::new("chr2", 1, 2).unwrap();

        assert_eq!(a.cmp_position(&b), Ordering::Less);
        assert_eq!(b.cmp_position(&c), Ordering::Less);
        // chromosome order is lexicographic, so chr10 sorts before chr2
        assert_eq!(c.cmp_position(&d), Ordering::Less);
        assert_eq!(a.cmp_position(&a.clone()), Ordering::Equal);
    }

    #[rstest]
    fn test_parse_bed6_line() {
        let iv = GenomicInterval::from_bed_line("chr1\t10\t20\tMYOD1\t7.5\t-", 1).unwrap();
        assert_eq!(iv.chrom, "chr1");
        assert_eq!(iv.start, 10);
        assert_eq!(iv.end, 20);
        assert_eq!(iv.name, "MYOD1");
        assert_eq!(iv.score, 7.5);
        assert_eq!(iv.strand, Strand::Reverse);
    }

    #[rstest]
    fn test_parse_bed3_line_defaults() {
        let iv = GenomicInterval::from_bed_line("chr3\t5\t9", 1).unwrap();
        assert_eq!(iv.name, ".");
        assert_eq!(iv.score, 0.0);
        assert_eq!(iv.strand, Strand::Unstranded);
    }

    #[rstest]
    #[case("chr1\tabc\t20")]
    #[case("chr1\t10")]
    #[case("chr1\t30\t20")]
    #[case("chr1\t10\t20\tname\tnotascore")]
    fn test_parse_malformed_line(#[case] line: &str) {
        let err = GenomicInterval::from_bed_line(line, 7).unwrap_err();
        assert!(matches!(err, IntervalError::Parse { line: 7, .. }));
    }

    #[rstest]
    fn test_as_string() {
        let iv = GenomicInterval::new("chr1", 10, 20)
            .unwrap()
            .with_name("M1")
            .with_score(3.0)
            .with_strand(Strand::Forward);
        assert_eq!(iv.as_string(), "chr1\t10\t20\tM1\t3\t+");
    }
}
