//! CSV reading and writing for association tables and merged records
//!
//! Two table shapes pass through here. Association tables are the raw
//! cohort exports with short column names (ens, sym, phen, grex, pval,
//! beta) in any order, possibly with extra columns. Record tables are the
//! merged form this crate writes itself, with one camelCase column per
//! [`GeneRecord`] field.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};

use crate::compare::PairedPoint;
use crate::data::{GeneRecord, RecordCollection};
use crate::error::{AtlasError, Result};
use crate::layout::{GenomeLayout, ManhattanPoint};

/// One row of a raw association table, before positions are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct AssociationRow {
    pub gene_id: String,
    pub gene_symbol: String,
    pub phenotype: String,
    pub grex: String,
    pub p_value: f64,
    pub beta: f64,
}

/// Columns an association table must provide, by their export names.
const REQUIRED_COLUMNS: [&str; 6] = ["ens", "sym", "phen", "grex", "pval", "beta"];

/// Sniff the delimiter from the first line: tab wins over comma.
fn detect_delimiter<P: AsRef<Path>>(path: P) -> Result<u8> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut first_line = String::new();
    reader.read_line(&mut first_line)?;

    if first_line.trim().is_empty() {
        return Err(AtlasError::EmptyData {
            reason: "empty table".to_string(),
        });
    }
    Ok(if first_line.contains('\t') { b'\t' } else { b',' })
}

/// Read a raw association table.
///
/// Columns are located by header name, case-insensitively, so column order
/// does not matter and extra columns (precomputed correction columns, for
/// instance) are ignored.
pub fn read_association_rows<P: AsRef<Path>>(path: P) -> Result<Vec<AssociationRow>> {
    let path = path.as_ref();
    let delimiter = detect_delimiter(path)?;
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let mut column_index = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, name) in REQUIRED_COLUMNS.iter().enumerate() {
        column_index[slot] = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| AtlasError::InvalidInput {
                reason: format!("association table is missing the '{}' column", name),
            })?;
    }
    let [ens, sym, phen, grex, pval, beta] = column_index;

    let mut rows = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result?;
        let field = |index: usize| -> Result<&str> {
            record.get(index).ok_or_else(|| AtlasError::MalformedRecord {
                row,
                reason: format!("missing column {}", index),
            })
        };
        let number = |index: usize, name: &str| -> Result<f64> {
            let raw = field(index)?.trim();
            raw.parse::<f64>().map_err(|_| AtlasError::MalformedRecord {
                row,
                reason: format!("invalid {} value '{}'", name, raw),
            })
        };

        rows.push(AssociationRow {
            gene_id: field(ens)?.trim().to_string(),
            gene_symbol: field(sym)?.trim().to_string(),
            phenotype: field(phen)?.trim().to_string(),
            grex: field(grex)?.trim().to_string(),
            p_value: number(pval, "pval")?,
            beta: number(beta, "beta")?,
        });
    }

    if rows.is_empty() {
        return Err(AtlasError::EmptyData {
            reason: "association table has no data rows".to_string(),
        });
    }
    log::debug!("Read {} association rows", rows.len());
    Ok(rows)
}

/// Read a merged record table and validate it into a collection.
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<RecordCollection> {
    let path = path.as_ref();
    let delimiter = detect_delimiter(path)?;
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_path(path)?;

    let mut records = Vec::new();
    for result in reader.deserialize::<GeneRecord>() {
        records.push(result?);
    }
    RecordCollection::new(records)
}

/// Write a merged record table.
pub fn write_records<P: AsRef<Path>>(path: P, records: &[GeneRecord]) -> Result<()> {
    let mut writer = WriterBuilder::new().from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write plotted points: one row per record with its axis position,
/// -log10 p-value, and significance flag.
pub fn write_manhattan_points<P: AsRef<Path>>(path: P, points: &[ManhattanPoint]) -> Result<()> {
    let mut writer = WriterBuilder::new().from_path(path)?;
    for point in points {
        writer.serialize(point)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write paired cohort points. Sides missing from a cohort come out as
/// empty fields.
pub fn write_paired_points<P: AsRef<Path>>(path: P, points: &[PairedPoint]) -> Result<()> {
    let mut writer = WriterBuilder::new().from_path(path)?;
    for point in points {
        writer.serialize(point)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the axis layout: one row per chromosome with its record count,
/// axis offset, span normalizer, and tick position.
pub fn write_layout_blocks<P: AsRef<Path>>(path: P, layout: &GenomeLayout) -> Result<()> {
    let mut writer = WriterBuilder::new().from_path(path)?;
    writer.write_record(["chromosome", "records", "offset", "maxEnd", "tick"])?;
    for (block, tick) in layout.blocks().iter().zip(layout.ticks()) {
        writer.write_record(&[
            block.label.clone(),
            block.count.to_string(),
            block.offset.to_string(),
            block.max_end.to_string(),
            tick.position.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
