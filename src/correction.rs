//! Multiple testing correction and significance classification
//!
//! Implements the three thresholding modes used across the atlas views:
//! - none: nominal threshold, p < t
//! - bonferroni: family-wise correction, p < t / N
//! - fdr: Benjamini-Hochberg step-up cutoff, p < largest p(i) with p(i) <= (i/N)*t
//!
//! N is always the number of records in the slice being classified, so the
//! caller decides whether correction is relative to the full cohort or to a
//! filtered subset.

use crate::data::GeneRecord;
use crate::error::{AtlasError, Result};

/// How the significance threshold is adjusted for multiple testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionMethod {
    None,
    Bonferroni,
    Fdr,
}

impl CorrectionMethod {
    /// Parse a method name, case-insensitively.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "none" => Ok(CorrectionMethod::None),
            "bonferroni" => Ok(CorrectionMethod::Bonferroni),
            "fdr" | "bh" => Ok(CorrectionMethod::Fdr),
            _ => Err(AtlasError::InvalidInput {
                reason: format!(
                    "unknown correction method '{}' (expected none, bonferroni, or fdr)",
                    name
                ),
            }),
        }
    }
}

impl std::fmt::Display for CorrectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CorrectionMethod::None => "none",
            CorrectionMethod::Bonferroni => "bonferroni",
            CorrectionMethod::Fdr => "fdr",
        };
        write!(f, "{}", name)
    }
}

/// The outcome of classifying a record slice: a per-record significance mask
/// aligned with the input order, plus the effective p-value cutoff that
/// produced it.
#[derive(Debug, Clone)]
pub struct Significance {
    mask: Vec<bool>,
    cutoff: f64,
    method: CorrectionMethod,
    threshold: f64,
}

impl Significance {
    /// Whether the record at `index` is significant.
    pub fn is_significant(&self, index: usize) -> bool {
        self.mask.get(index).copied().unwrap_or(false)
    }

    /// The significance mask, aligned with the classified slice.
    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    /// The effective cutoff; records are significant iff p < cutoff.
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// The correction method that was applied.
    pub fn method(&self) -> CorrectionMethod {
        self.method
    }

    /// The uncorrected threshold the cutoff was derived from.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Number of significant records.
    pub fn count(&self) -> usize {
        self.mask.iter().filter(|&&s| s).count()
    }

    /// Indices of the significant records, in input order.
    pub fn indices(&self) -> Vec<usize> {
        self.mask
            .iter()
            .enumerate()
            .filter_map(|(i, &s)| if s { Some(i) } else { None })
            .collect()
    }

    /// Borrow the significant records out of the slice this mask was built
    /// from, preserving order.
    pub fn select<'a>(&self, records: &'a [GeneRecord]) -> Vec<&'a GeneRecord> {
        records
            .iter()
            .zip(self.mask.iter())
            .filter_map(|(r, &s)| if s { Some(r) } else { None })
            .collect()
    }
}

/// Classify `records` against `threshold` under the given correction method.
///
/// The comparison is strict: a record whose p-value equals the effective
/// cutoff is not significant. An empty slice yields an empty mask with a
/// cutoff of zero.
pub fn classify(
    records: &[GeneRecord],
    threshold: f64,
    method: CorrectionMethod,
) -> Result<Significance> {
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(AtlasError::InvalidThreshold { value: threshold });
    }

    let n = records.len();
    if n == 0 {
        return Ok(Significance {
            mask: vec![],
            cutoff: 0.0,
            method,
            threshold,
        });
    }

    let cutoff = match method {
        CorrectionMethod::None => threshold,
        CorrectionMethod::Bonferroni => threshold / n as f64,
        CorrectionMethod::Fdr => {
            let pvalues: Vec<f64> = records.iter().map(|r| r.p_value).collect();
            fdr_cutoff(&pvalues, threshold)
        }
    };

    let mask = records.iter().map(|r| r.p_value < cutoff).collect();
    Ok(Significance {
        mask,
        cutoff,
        method,
        threshold,
    })
}

/// Benjamini-Hochberg step-up cutoff.
///
/// Sorts the p-values ascending and returns the largest p(i) satisfying
/// p(i) <= (i/N) * threshold, checking every rank. Returns 0.0 when no rank
/// qualifies, so that nothing passes the strict comparison.
fn fdr_cutoff(pvalues: &[f64], threshold: f64) -> f64 {
    let n = pvalues.len();
    let mut sorted = pvalues.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mut cutoff = 0.0;
    for (i, &p) in sorted.iter().enumerate() {
        let rank = (i + 1) as f64;
        if p <= rank / n as f64 * threshold {
            cutoff = p;
        }
    }
    cutoff
}
