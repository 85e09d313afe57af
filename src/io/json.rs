//! JSON reading and writing for records and overlap grids

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::Serialize;

use crate::compare::{OverlapCell, OverlapGrid};
use crate::data::{GeneRecord, RecordCollection};
use crate::error::Result;

/// Read an array of records from JSON and validate it into a collection.
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<RecordCollection> {
    let file = File::open(path)?;
    let records: Vec<GeneRecord> = serde_json::from_reader(BufReader::new(file))?;
    RecordCollection::new(records)
}

/// Write records as a JSON array.
pub fn write_records<P: AsRef<Path>>(path: P, records: &[GeneRecord]) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), records)?;
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OverlapGridDocument<'a> {
    row_phenotypes: &'a [String],
    col_phenotypes: &'a [String],
    cells: &'a [OverlapCell],
}

/// Write an overlap grid with its row and column phenotype catalogs.
pub fn write_overlap_grid<P: AsRef<Path>>(path: P, grid: &OverlapGrid) -> Result<()> {
    let document = OverlapGridDocument {
        row_phenotypes: grid.row_phenotypes(),
        col_phenotypes: grid.col_phenotypes(),
        cells: grid.cells(),
    };
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), &document)?;
    Ok(())
}
