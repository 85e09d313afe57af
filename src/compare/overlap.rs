//! Pairwise overlap between phenotype groups of two cohorts

use std::collections::{BTreeMap, BTreeSet, HashSet};

use ndarray::Array2;
use rayon::prelude::*;
use serde::Serialize;

use crate::data::GeneRecord;

/// Overlap between one phenotype group from each cohort.
///
/// Genes are matched by `gene_id` and reported by cohort A's `gene_symbol`,
/// deduplicated and sorted. `jaccard` divides the number of shared symbols
/// by the smaller of the two raw group sizes (the overlap coefficient), so
/// a group fully contained in the other scores 1.0.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapCell {
    pub phenotype_a: String,
    pub phenotype_b: String,
    pub size_a: usize,
    pub size_b: usize,
    pub shared_symbols: Vec<String>,
    pub shared_count: usize,
    pub jaccard: f64,
}

/// The full cross product of phenotype groups, row-major: rows are cohort A
/// phenotypes, columns are cohort B phenotypes, both in group order.
#[derive(Debug, Clone)]
pub struct OverlapGrid {
    row_phenotypes: Vec<String>,
    col_phenotypes: Vec<String>,
    cells: Vec<OverlapCell>,
}

impl OverlapGrid {
    pub fn row_phenotypes(&self) -> &[String] {
        &self.row_phenotypes
    }

    pub fn col_phenotypes(&self) -> &[String] {
        &self.col_phenotypes
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[OverlapCell] {
        &self.cells
    }

    pub fn cell(&self, row: usize, col: usize) -> &OverlapCell {
        &self.cells[row * self.col_phenotypes.len() + col]
    }

    /// Jaccard scores as a dense matrix.
    pub fn jaccard_matrix(&self) -> Array2<f64> {
        let cols = self.col_phenotypes.len();
        Array2::from_shape_fn((self.row_phenotypes.len(), cols), |(i, j)| {
            self.cells[i * cols + j].jaccard
        })
    }

    /// Shared symbol counts as a dense matrix.
    pub fn shared_count_matrix(&self) -> Array2<usize> {
        let cols = self.col_phenotypes.len();
        Array2::from_shape_fn((self.row_phenotypes.len(), cols), |(i, j)| {
            self.cells[i * cols + j].shared_count
        })
    }
}

/// Compute the overlap grid for two phenotype groupings.
///
/// Cells are independent, so the cross product is evaluated in parallel.
/// A pairing where either group is empty scores 0.0.
pub fn overlap_grid(
    groups_a: &BTreeMap<&str, Vec<&GeneRecord>>,
    groups_b: &BTreeMap<&str, Vec<&GeneRecord>>,
) -> OverlapGrid {
    let rows: Vec<(&str, &Vec<&GeneRecord>)> = groups_a.iter().map(|(k, v)| (*k, v)).collect();
    let cols: Vec<(&str, &Vec<&GeneRecord>)> = groups_b.iter().map(|(k, v)| (*k, v)).collect();

    let cells: Vec<OverlapCell> = rows
        .par_iter()
        .flat_map_iter(|&(phenotype_a, group_a)| {
            cols.iter().map(move |&(phenotype_b, group_b)| {
                overlap_cell(phenotype_a, group_a, phenotype_b, group_b)
            })
        })
        .collect();

    OverlapGrid {
        row_phenotypes: rows.iter().map(|(k, _)| k.to_string()).collect(),
        col_phenotypes: cols.iter().map(|(k, _)| k.to_string()).collect(),
        cells,
    }
}

fn overlap_cell(
    phenotype_a: &str,
    group_a: &[&GeneRecord],
    phenotype_b: &str,
    group_b: &[&GeneRecord],
) -> OverlapCell {
    let ids_b: HashSet<&str> = group_b.iter().map(|r| r.gene_id.as_str()).collect();

    let mut shared: BTreeSet<&str> = BTreeSet::new();
    for record in group_a {
        if ids_b.contains(record.gene_id.as_str()) {
            shared.insert(record.gene_symbol.as_str());
        }
    }

    let shared_count = shared.len();
    let denominator = group_a.len().min(group_b.len());
    let jaccard = if denominator == 0 {
        0.0
    } else {
        shared_count as f64 / denominator as f64
    };

    OverlapCell {
        phenotype_a: phenotype_a.to_string(),
        phenotype_b: phenotype_b.to_string(),
        size_a: group_a.len(),
        size_b: group_b.len(),
        shared_symbols: shared.into_iter().map(|s| s.to_string()).collect(),
        shared_count,
        jaccard,
    }
}
