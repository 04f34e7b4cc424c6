use std::fmt::{self, Display};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::IntervalError;

/// Strand of a genomic feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Strand {
    Forward,
    Reverse,
    #[default]
    Unstranded,
}

impl Strand {
    /// Lenient conversion used for annotation columns: anything that is not
    /// `+` or `-` is unstranded.
    pub fn from_char(c: char) -> Strand {
        match c {
            '+' => Strand::Forward,
            '-' => Strand::Reverse,
            _ => Strand::Unstranded,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Strand::Forward => '+',
            Strand::Reverse => '-',
            Strand::Unstranded => '.',
        }
    }

    /// Minus-strand features are read right to left; everything else left to right.
    pub fn is_reverse(&self) -> bool {
        matches!(self, Strand::Reverse)
    }
}

impl FromStr for Strand {
    type Err = IntervalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Forward),
            "-" => Ok(Strand::Reverse),
            "." | "*" => Ok(Strand::Unstranded),
            other => Err(IntervalError::InvalidStrand(other.to_string())),
        }
    }
}

impl Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("+", Strand::Forward)]
    #[case("-", Strand::Reverse)]
    #[case(".", Strand::Unstranded)]
    #[case("*", Strand::Unstranded)]
    fn test_parse_strand(#[case] input: &str, #[case] expected: Strand) {
        assert_eq!(input.parse::<Strand>().unwrap(), expected);
    }

    #[rstest]
    fn test_parse_invalid_strand() {
        assert!("x".parse::<Strand>().is_err());
    }

    #[rstest]
    fn test_round_trip_char() {
        for strand in [Strand::Forward, Strand::Reverse, Strand::Unstranded] {
            assert_eq!(Strand::from_char(strand.as_char()), strand);
        }
    }
}
