//! Cross-cohort comparison: overlap grids and paired scatter data

mod overlap;
mod pairs;

pub use overlap::{overlap_grid, OverlapCell, OverlapGrid};
pub use pairs::{pair_records, scatter_fit, PairedPoint};
