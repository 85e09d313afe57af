//! twas_atlas: significance classification and genome layout for TWAS
//! association records
//!
//! This crate takes transcriptome-wide association records (one gene x
//! phenotype x grex-site test each), classifies their significance under
//! nominal, Bonferroni, or Benjamini-Hochberg thresholds, and lays the
//! records out on a packed per-chromosome axis for Manhattan-style plots.
//! Two cohorts can be compared through per-phenotype overlap grids and
//! record pairing.
//!
//! # Example
//!
//! ```ignore
//! use twas_atlas::prelude::*;
//!
//! // Load a merged record table
//! let collection = read_records("records.csv")?;
//!
//! // FDR at 0.05 within a phenotype selection
//! let state = FilterState::new(0.05, CorrectionMethod::Fdr)?
//!     .select_phenotypes(["putamen"]);
//!
//! // Classify and lay out
//! let classified = run_classification(&collection, &state)?;
//! let layout = GenomeLayout::from_records(&classified.records)?;
//! ```

pub mod cli;
pub mod compare;
pub mod correction;
pub mod data;
pub mod error;
pub mod filter;
pub mod io;
pub mod layout;
pub mod report;
pub mod stats;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::correction::{classify, CorrectionMethod, Significance};
    pub use crate::data::{FilterState, GeneRecord, RecordCollection, RecordKey};
    pub use crate::error::{AtlasError, Result};
    pub use crate::io::{
        merge, read_association_rows, read_position_table, read_records, write_layout_blocks,
        write_manhattan_points, write_paired_points, write_records,
    };
    pub use crate::layout::{GenomeLayout, ManhattanPoint};
    pub use crate::{run_classification, ClassifiedSet};
}

use correction::Significance;
use data::{FilterState, GeneRecord, RecordCollection};
use error::Result;

/// A selection's records together with their significance mask.
#[derive(Debug, Clone)]
pub struct ClassifiedSet {
    /// The records that survived the phenotype/grex selection, in input
    /// order.
    pub records: Vec<GeneRecord>,
    /// Significance mask aligned with `records`.
    pub significance: Significance,
}

/// Run the selection and classification pipeline over a collection.
///
/// Correction is computed against the records that survive the selection,
/// so narrowing the selection loosens a Bonferroni cutoff and reshapes an
/// FDR cutoff. This mirrors how the interactive views behave: the filter
/// changes the family of tests, not just what is displayed.
pub fn run_classification(
    collection: &RecordCollection,
    state: &FilterState,
) -> Result<ClassifiedSet> {
    let records = filter::apply_owned(collection.records(), state);
    if !state.selection_is_empty() {
        log::info!(
            "Selection kept {} of {} records",
            records.len(),
            collection.len()
        );
    }

    let significance = correction::classify(&records, state.threshold, state.correction)?;
    log::info!(
        "{} of {} records significant (method: {}, cutoff: {:e})",
        significance.count(),
        records.len(),
        significance.method(),
        significance.cutoff()
    );

    Ok(ClassifiedSet {
        records,
        significance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correction::CorrectionMethod;

    fn record(gene_id: &str, phenotype: &str, grex: &str, p: f64) -> GeneRecord {
        GeneRecord {
            gene_id: gene_id.to_string(),
            gene_symbol: gene_id.to_lowercase(),
            chromosome: "1".to_string(),
            start_position: 1_000,
            end_position: 2_000,
            phenotype: phenotype.to_string(),
            grex: grex.to_string(),
            p_value: p,
            beta: 0.2,
        }
    }

    #[test]
    fn test_full_pipeline() {
        let collection = RecordCollection::new(vec![
            record("g1", "putamen", "dlpfc", 0.001),
            record("g2", "putamen", "dlpfc", 0.2),
            record("g3", "amygdala", "dlpfc", 0.001),
            record("g4", "amygdala", "caudate", 0.03),
        ])
        .unwrap();

        let state = FilterState::new(0.05, CorrectionMethod::None).unwrap();
        let classified = run_classification(&collection, &state).unwrap();

        assert_eq!(classified.records.len(), 4);
        assert_eq!(classified.significance.count(), 3);

        let layout = layout::GenomeLayout::from_records(&classified.records).unwrap();
        assert_eq!(layout.total_count(), 4);
    }

    #[test]
    fn test_small_cohort_end_to_end() {
        let mut r1 = record("g1", "putamen", "dlpfc", 0.001);
        r1.start_position = 100;
        r1.end_position = 200;
        let mut r2 = record("g2", "putamen", "dlpfc", 0.2);
        r2.start_position = 5_000;
        r2.end_position = 5_100;
        let mut r3 = record("g3", "putamen", "dlpfc", 0.0001);
        r3.chromosome = "2".to_string();
        r3.start_position = 50;
        r3.end_position = 60;

        let collection = RecordCollection::new(vec![r1, r2, r3]).unwrap();
        let state = FilterState::new(0.01, CorrectionMethod::None).unwrap();
        let classified = run_classification(&collection, &state).unwrap();

        assert_eq!(classified.significance.indices(), [0, 2]);

        let layout = layout::GenomeLayout::from_records(&classified.records).unwrap();
        let positions: Vec<f64> = classified
            .records
            .iter()
            .map(|r| layout.position(r).unwrap())
            .collect();
        assert!(positions[0] < positions[2]);
        assert!(positions[1] < positions[2]);
    }

    #[test]
    fn test_selection_changes_bonferroni_family() {
        let collection = RecordCollection::new(vec![
            record("g1", "putamen", "dlpfc", 0.02),
            record("g2", "putamen", "dlpfc", 0.4),
            record("g3", "amygdala", "dlpfc", 0.5),
            record("g4", "amygdala", "caudate", 0.6),
        ])
        .unwrap();

        // Over all four records the Bonferroni cutoff is 0.05/4 = 0.0125,
        // which excludes g1.
        let state = FilterState::new(0.05, CorrectionMethod::Bonferroni).unwrap();
        let classified = run_classification(&collection, &state).unwrap();
        assert_eq!(classified.significance.count(), 0);

        // Narrowing to putamen shrinks the family to two tests, cutoff
        // 0.025, and g1 becomes significant.
        let state = state.select_phenotypes(["putamen"]);
        let classified = run_classification(&collection, &state).unwrap();
        assert_eq!(classified.records.len(), 2);
        assert_eq!(classified.significance.count(), 1);
    }
}
