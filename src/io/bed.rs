//! BED position table reading
//!
//! Expected format: tab-separated lines of chromosome, start, end, gene id.
//! A leading header line is tolerated and detected by its non-numeric
//! coordinate fields.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{AtlasError, Result};

/// A gene's location from the position table.
#[derive(Debug, Clone, PartialEq)]
pub struct GenePosition {
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
}

/// Read a BED position table into a map keyed by gene id.
///
/// When a gene id appears more than once the last entry wins. Errors carry
/// the one-based line number.
pub fn read_position_table<P: AsRef<Path>>(path: P) -> Result<HashMap<String, GenePosition>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut positions = HashMap::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if index == 0 && looks_like_header(&fields) {
            continue;
        }
        if fields.len() < 4 {
            return Err(AtlasError::InvalidPositionTable {
                reason: format!(
                    "line {}: expected 4 tab-separated fields, found {}",
                    line_number,
                    fields.len()
                ),
            });
        }

        let start = parse_coordinate(fields[1], "start", line_number)?;
        let end = parse_coordinate(fields[2], "end", line_number)?;
        let gene_id = fields[3].trim();
        if gene_id.is_empty() {
            return Err(AtlasError::InvalidPositionTable {
                reason: format!("line {}: empty gene id", line_number),
            });
        }

        positions.insert(
            gene_id.to_string(),
            GenePosition {
                chromosome: fields[0].trim().to_string(),
                start,
                end,
            },
        );
    }

    if positions.is_empty() {
        return Err(AtlasError::EmptyData {
            reason: "position table has no entries".to_string(),
        });
    }
    log::debug!("Read {} gene positions", positions.len());
    Ok(positions)
}

fn looks_like_header(fields: &[&str]) -> bool {
    fields.len() >= 3
        && (fields[1].trim().parse::<u64>().is_err() || fields[2].trim().parse::<u64>().is_err())
}

fn parse_coordinate(raw: &str, name: &str, line_number: usize) -> Result<u64> {
    let raw = raw.trim();
    raw.parse::<u64>().map_err(|_| AtlasError::InvalidPositionTable {
        reason: format!("line {}: invalid {} coordinate '{}'", line_number, name, raw),
    })
}
