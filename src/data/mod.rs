//! Data structures for association records and filter state

mod collection;
mod filter_state;
mod record;

pub use collection::{group_by_phenotype, RecordCollection};
pub use filter_state::FilterState;
pub use record::{GeneRecord, RecordKey};
