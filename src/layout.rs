//! Genomic coordinate layout for Manhattan-style plotting
//!
//! Maps records onto a single horizontal axis by packing chromosomes side by
//! side in numeric order. Each chromosome occupies a span proportional to its
//! record count, and a record lands inside that span at its basepair midpoint
//! scaled by the chromosome's largest end position.

use std::collections::HashMap;

use serde::Serialize;

use crate::correction::Significance;
use crate::data::GeneRecord;
use crate::error::{AtlasError, Result};
use crate::stats::neg_log10;

/// One chromosome's span on the layout axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ChromosomeBlock {
    /// Chromosome label as it appears in the records, e.g. "17".
    pub label: String,
    /// Numeric chromosome for ordering.
    pub number: u32,
    /// Largest end position among the chromosome's records.
    pub max_end: u64,
    /// Number of records on the chromosome.
    pub count: usize,
    /// Sum of the counts of all preceding chromosomes.
    pub offset: usize,
}

/// Axis tick for a chromosome, placed at the middle of its block.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub label: String,
    pub position: f64,
}

/// A plotted record: layout position, -log10 p-value, and significance.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManhattanPoint {
    pub gene_id: String,
    pub gene_symbol: String,
    pub chromosome: String,
    pub phenotype: String,
    pub x: f64,
    pub y: f64,
    pub significant: bool,
}

/// The axis layout derived from a record set.
///
/// Positions are expressed in record-count units, so the axis domain is
/// `[0, total_count()]` and a chromosome with more records is drawn wider.
#[derive(Debug, Clone)]
pub struct GenomeLayout {
    blocks: Vec<ChromosomeBlock>,
    index: HashMap<u32, usize>,
    total: usize,
}

impl GenomeLayout {
    /// Build the layout from `records`.
    ///
    /// Chromosomes are ordered numerically, so "10" comes after "2" rather
    /// than between "1" and "2". A record with a non-numeric chromosome
    /// label is rejected.
    pub fn from_records(records: &[GeneRecord]) -> Result<Self> {
        use std::collections::BTreeMap;

        let mut per_chromosome: BTreeMap<u32, (String, u64, usize)> = BTreeMap::new();
        for record in records {
            let number = record.chromosome_number().ok_or_else(|| AtlasError::InvalidInput {
                reason: format!("non-numeric chromosome '{}'", record.chromosome),
            })?;
            let entry = per_chromosome
                .entry(number)
                .or_insert_with(|| (record.chromosome.clone(), 0, 0));
            entry.1 = entry.1.max(record.end_position);
            entry.2 += 1;
        }

        let mut blocks = Vec::with_capacity(per_chromosome.len());
        let mut index = HashMap::with_capacity(per_chromosome.len());
        let mut offset = 0;
        for (number, (label, max_end, count)) in per_chromosome {
            index.insert(number, blocks.len());
            blocks.push(ChromosomeBlock {
                label,
                number,
                max_end,
                count,
                offset,
            });
            offset += count;
        }

        log::debug!(
            "Genome layout: {} chromosomes, {} records",
            blocks.len(),
            offset
        );
        Ok(Self {
            blocks,
            index,
            total: offset,
        })
    }

    /// Chromosome blocks in axis order.
    pub fn blocks(&self) -> &[ChromosomeBlock] {
        &self.blocks
    }

    /// Total record count, which is also the axis span.
    pub fn total_count(&self) -> usize {
        self.total
    }

    /// Axis position of `record`.
    ///
    /// The chromosome is matched by numeric value, so a record labelled
    /// "07" lands in the block built from "7". Fails when the chromosome
    /// has no block in this layout; plotting a record against a layout
    /// built from different data is a caller bug that must surface, not
    /// produce a silent misplacement.
    pub fn position(&self, record: &GeneRecord) -> Result<f64> {
        let block_index = record
            .chromosome_number()
            .and_then(|number| self.index.get(&number))
            .ok_or_else(|| AtlasError::UnknownChromosome {
                chromosome: record.chromosome.clone(),
            })?;
        let block = &self.blocks[*block_index];

        let ratio = if block.max_end == 0 {
            0.0
        } else {
            record.midpoint() / block.max_end as f64
        };
        Ok(ratio * block.count as f64 + block.offset as f64)
    }

    /// One tick per chromosome, at the middle of its block.
    pub fn ticks(&self) -> Vec<Tick> {
        self.blocks
            .iter()
            .map(|b| Tick {
                label: b.label.clone(),
                position: b.offset as f64 + b.count as f64 / 2.0,
            })
            .collect()
    }
}

/// Project `records` onto `layout`, pairing each position with the record's
/// -log10 p-value and its flag from `significance`.
///
/// The mask must come from classifying the same slice.
pub fn manhattan_points(
    records: &[GeneRecord],
    significance: &Significance,
    layout: &GenomeLayout,
) -> Result<Vec<ManhattanPoint>> {
    let mut points = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        points.push(ManhattanPoint {
            gene_id: record.gene_id.clone(),
            gene_symbol: record.gene_symbol.clone(),
            chromosome: record.chromosome.clone(),
            phenotype: record.phenotype.clone(),
            x: layout.position(record)?,
            y: neg_log10(record.p_value),
            significant: significance.is_significant(i),
        });
    }
    Ok(points)
}
