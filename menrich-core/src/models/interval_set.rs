use std::collections::BTreeSet;
use std::fmt::{self, Display};
use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::errors::IntervalError;
use crate::models::GenomicInterval;
use crate::utils::{get_dynamic_reader, is_bed_header, label_from_path};

///
/// IntervalSet struct, a labelled collection of genomic intervals such as a
/// peak file or a set of motif-predicted binding sites.
///
/// Insertion order is not significant; sort order is. Every overlap or
/// proximity operation requires the set to be sorted (see [`IntervalSet::ensure_sorted`]).
///
#[derive(Clone, Debug, Default)]
pub struct IntervalSet {
    pub name: String,
    pub intervals: Vec<GenomicInterval>,
    pub path: Option<PathBuf>,
}

impl TryFrom<&Path> for IntervalSet {
    type Error = IntervalError;

    ///
    /// Read an [IntervalSet] from a BED (or BED.gz) file. The result is sorted.
    ///
    /// # Arguments:
    /// - value: path to bed file on disk.
    fn try_from(value: &Path) -> Result<Self, IntervalError> {
        let reader = get_dynamic_reader(value)?;

        let mut intervals: Vec<GenomicInterval> = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() || is_bed_header(&line) {
                continue;
            }
            intervals.push(GenomicInterval::from_bed_line(&line, idx + 1)?);
        }

        let mut set = IntervalSet {
            name: label_from_path(value),
            intervals,
            path: Some(value.to_owned()),
        };
        set.sort();

        Ok(set)
    }
}

impl TryFrom<&str> for IntervalSet {
    type Error = IntervalError;

    fn try_from(value: &str) -> Result<Self, IntervalError> {
        IntervalSet::try_from(Path::new(value))
    }
}

impl TryFrom<String> for IntervalSet {
    type Error = IntervalError;

    fn try_from(value: String) -> Result<Self, IntervalError> {
        IntervalSet::try_from(Path::new(&value))
    }
}

impl TryFrom<PathBuf> for IntervalSet {
    type Error = IntervalError;

    fn try_from(value: PathBuf) -> Result<Self, IntervalError> {
        IntervalSet::try_from(value.as_path())
    }
}

impl From<Vec<GenomicInterval>> for IntervalSet {
    fn from(intervals: Vec<GenomicInterval>) -> Self {
        IntervalSet {
            name: String::new(),
            intervals,
            path: None,
        }
    }
}

impl<'a> IntoIterator for &'a IntervalSet {
    type Item = &'a GenomicInterval;
    type IntoIter = std::slice::Iter<'a, GenomicInterval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}

impl IntervalSet {
    pub fn new(name: &str, intervals: Vec<GenomicInterval>) -> Self {
        IntervalSet {
            name: name.to_string(),
            intervals,
            path: None,
        }
    }

    ///
    /// Same intervals under another label.
    ///
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GenomicInterval> {
        self.intervals.iter()
    }

    ///
    /// Sort intervals by chromosome, start and end. The sort is stable, so
    /// intervals at identical coordinates keep their relative order.
    ///
    pub fn sort(&mut self) {
        self.intervals.sort_by(|a, b| a.cmp_position(b));
    }

    ///
    /// Does every interval precede (or tie with) the next one?
    ///
    pub fn is_sorted(&self) -> bool {
        self.first_unsorted_index().is_none()
    }

    ///
    /// Check the sortedness precondition of overlap and proximity queries.
    /// Ordering is never repaired silently.
    ///
    pub fn ensure_sorted(&self) -> Result<(), IntervalError> {
        match self.first_unsorted_index() {
            None => Ok(()),
            Some(index) => Err(IntervalError::Unsorted {
                set: self.name.clone(),
                index,
            }),
        }
    }

    fn first_unsorted_index(&self) -> Option<usize> {
        self.intervals
            .windows(2)
            .position(|w| w[0].cmp_position(&w[1]).is_gt())
            .map(|i| i + 1)
    }

    ///
    /// Distinct interval names, in sorted order.
    ///
    pub fn distinct_names(&self) -> BTreeSet<&str> {
        self.intervals.iter().map(|iv| iv.name.as_str()).collect()
    }

    ///
    /// Split the set in two by a predicate, keeping relative order in both
    /// halves. The halves are labelled `<name>_<label>` for diagnostics.
    ///
    pub fn partition<F>(&self, labels: (&str, &str), mut pred: F) -> (IntervalSet, IntervalSet)
    where
        F: FnMut(&GenomicInterval) -> bool,
    {
        let (yes, no): (Vec<GenomicInterval>, Vec<GenomicInterval>) =
            self.intervals.iter().cloned().partition(|iv| pred(iv));
        (
            IntervalSet::new(&format!("{}_{}", self.name, labels.0), yes),
            IntervalSet::new(&format!("{}_{}", self.name, labels.1), no),
        )
    }

    ///
    /// Keep only the intervals whose name is in `names`. Order, label and
    /// path are kept.
    ///
    pub fn retain_names(mut self, names: &BTreeSet<String>) -> IntervalSet {
        self.intervals.retain(|iv| names.contains(&iv.name));
        self
    }
}

impl Display for IntervalSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IntervalSet '{}' with {} intervals.", self.name, self.len())
    }
}
