//! Input/Output operations for association tables, position tables, and
//! exported artifacts

pub mod bed;
pub mod csv;
pub mod json;
mod merge;

pub use self::csv::{
    read_association_rows, read_records, write_layout_blocks, write_manhattan_points,
    write_paired_points, write_records, AssociationRow,
};
pub use bed::{read_position_table, GenePosition};
pub use merge::{merge, MergeOutcome};
