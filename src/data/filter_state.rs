//! Shared filter settings for the analysis pipeline

use std::collections::BTreeSet;

use crate::correction::CorrectionMethod;
use crate::data::record::GeneRecord;
use crate::error::{AtlasError, Result};

/// The user-facing filter settings: a significance threshold, the multiple
/// testing correction to apply, and optional phenotype / grex selections.
///
/// An empty selection set means "keep everything" for that dimension. When
/// both sets are non-empty a record must match one entry from each.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub threshold: f64,
    pub correction: CorrectionMethod,
    pub phenotypes: BTreeSet<String>,
    pub grex_sites: BTreeSet<String>,
}

impl Default for FilterState {
    /// The single-cohort defaults: nominal 1e-4 threshold, no correction,
    /// nothing selected.
    fn default() -> Self {
        Self {
            threshold: 1e-4,
            correction: CorrectionMethod::None,
            phenotypes: BTreeSet::new(),
            grex_sites: BTreeSet::new(),
        }
    }
}

impl FilterState {
    /// Build a filter state with a validated threshold.
    pub fn new(threshold: f64, correction: CorrectionMethod) -> Result<Self> {
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(AtlasError::InvalidThreshold { value: threshold });
        }
        Ok(Self {
            threshold,
            correction,
            phenotypes: BTreeSet::new(),
            grex_sites: BTreeSet::new(),
        })
    }

    /// The cross-cohort defaults: 0.05 threshold under FDR correction.
    pub fn comparison() -> Self {
        Self {
            threshold: 0.05,
            correction: CorrectionMethod::Fdr,
            phenotypes: BTreeSet::new(),
            grex_sites: BTreeSet::new(),
        }
    }

    /// Restrict the phenotype selection.
    pub fn select_phenotypes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.phenotypes = names.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict the grex selection.
    pub fn select_grex<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grex_sites = names.into_iter().map(Into::into).collect();
        self
    }

    /// True when neither dimension restricts anything.
    pub fn selection_is_empty(&self) -> bool {
        self.phenotypes.is_empty() && self.grex_sites.is_empty()
    }

    /// Whether `record` passes the phenotype and grex selections.
    pub fn matches(&self, record: &GeneRecord) -> bool {
        let phenotype_ok =
            self.phenotypes.is_empty() || self.phenotypes.contains(&record.phenotype);
        let grex_ok = self.grex_sites.is_empty() || self.grex_sites.contains(&record.grex);
        phenotype_ok && grex_ok
    }
}
