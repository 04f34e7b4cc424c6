use adjustp::{Procedure, adjust};

///
/// False discovery rate procedure.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CorrectionMethod {
    /// Benjamini-Hochberg: tests independent or positively correlated.
    #[default]
    Independent,
    /// Benjamini-Yekutieli: arbitrary dependence.
    Dependent,
}

impl std::str::FromStr for CorrectionMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "independent" | "indep" | "bh" => Ok(CorrectionMethod::Independent),
            "dependent" | "negcorr" | "by" => Ok(CorrectionMethod::Dependent),
            other => Err(format!(
                "unknown correction method '{other}' (expected independent or dependent)"
            )),
        }
    }
}

impl std::fmt::Display for CorrectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CorrectionMethod::Independent => write!(f, "independent"),
            CorrectionMethod::Dependent => write!(f, "dependent"),
        }
    }
}

impl From<CorrectionMethod> for Procedure {
    fn from(method: CorrectionMethod) -> Self {
        match method {
            CorrectionMethod::Independent => Procedure::BenjaminiHochberg,
            CorrectionMethod::Dependent => Procedure::BenjaminiYekutieli,
        }
    }
}

///
/// Corrected p-values and rejection flags, index-aligned with the input.
///
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Correction {
    pub rejected: Vec<bool>,
    pub corrected: Vec<f64>,
}

///
/// Correct a vector of p-values for multiple testing.
///
/// The output keeps input order. `alpha` only decides `rejected`
/// (`corrected <= alpha`); the corrected values do not depend on it.
///
/// # Arguments
/// - p_values: raw p-values, one per test
/// - alpha: family-wise false discovery rate
/// - method: correction procedure
pub fn correct(p_values: &[f64], alpha: f64, method: CorrectionMethod) -> Correction {
    if p_values.is_empty() {
        return Correction::default();
    }

    let corrected: Vec<f64> = adjust(p_values, method.into())
        .into_iter()
        .map(|p| p.clamp(0.0, 1.0))
        .collect();
    let rejected = corrected.iter().map(|p| *p <= alpha).collect();

    Correction {
        rejected,
        corrected,
    }
}
