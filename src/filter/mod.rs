//! Phenotype and grex selection filtering

use crate::data::{FilterState, GeneRecord};

/// Apply the phenotype / grex selections to `records`, preserving order.
///
/// Empty selection sets keep everything, so filtering with a default state
/// returns the input unchanged. The operation is idempotent: filtering an
/// already-filtered slice with the same state is a no-op.
pub fn apply<'a>(records: &'a [GeneRecord], state: &FilterState) -> Vec<&'a GeneRecord> {
    records.iter().filter(|r| state.matches(r)).collect()
}

/// Owned variant of [`apply`], for callers that go on to mutate or store the
/// survivors.
pub fn apply_owned(records: &[GeneRecord], state: &FilterState) -> Vec<GeneRecord> {
    records.iter().filter(|r| state.matches(r)).cloned().collect()
}
