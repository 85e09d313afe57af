//! Record pairing across two cohorts

use std::collections::HashMap;

use serde::Serialize;

use crate::data::{GeneRecord, RecordKey};
use crate::stats::{neg_log10, LinearFit};

/// One gene/phenotype/grex combination observed in up to two cohorts.
///
/// A side missing from a cohort is `None` rather than a sentinel p-value, so
/// downstream consumers cannot mistake absence for perfect significance.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairedPoint {
    pub gene_id: String,
    pub gene_symbol: String,
    pub phenotype: String,
    pub grex: String,
    pub p_a: Option<f64>,
    pub p_b: Option<f64>,
    pub beta_a: Option<f64>,
    pub beta_b: Option<f64>,
}

impl PairedPoint {
    /// Whether both cohorts observed this combination.
    pub fn is_complete(&self) -> bool {
        self.p_a.is_some() && self.p_b.is_some()
    }
}

/// Pair two cohorts' records by their `(gene_id, phenotype, grex)` key.
///
/// The output covers the union of keys, ordered by first appearance in
/// cohort A and then cohort B. When a cohort repeats a key, the first
/// occurrence wins.
pub fn pair_records(cohort_a: &[GeneRecord], cohort_b: &[GeneRecord]) -> Vec<PairedPoint> {
    let mut points: Vec<PairedPoint> = Vec::new();
    let mut by_key: HashMap<RecordKey, usize> = HashMap::new();

    for record in cohort_a {
        let key = record.key();
        if by_key.contains_key(&key) {
            continue;
        }
        by_key.insert(key, points.len());
        points.push(PairedPoint {
            gene_id: record.gene_id.clone(),
            gene_symbol: record.gene_symbol.clone(),
            phenotype: record.phenotype.clone(),
            grex: record.grex.clone(),
            p_a: Some(record.p_value),
            p_b: None,
            beta_a: Some(record.beta),
            beta_b: None,
        });
    }

    for record in cohort_b {
        let key = record.key();
        match by_key.get(&key) {
            Some(&index) => {
                let point = &mut points[index];
                if point.p_b.is_none() {
                    point.p_b = Some(record.p_value);
                    point.beta_b = Some(record.beta);
                }
            }
            None => {
                by_key.insert(key, points.len());
                points.push(PairedPoint {
                    gene_id: record.gene_id.clone(),
                    gene_symbol: record.gene_symbol.clone(),
                    phenotype: record.phenotype.clone(),
                    grex: record.grex.clone(),
                    p_a: None,
                    p_b: Some(record.p_value),
                    beta_a: None,
                    beta_b: Some(record.beta),
                });
            }
        }
    }

    points
}

/// Fit the -log10 p-value of cohort B against cohort A over the complete
/// pairs. Incomplete pairs are excluded rather than imputed.
pub fn scatter_fit(points: &[PairedPoint]) -> LinearFit {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for point in points {
        if let (Some(pa), Some(pb)) = (point.p_a, point.p_b) {
            xs.push(neg_log10(pa));
            ys.push(neg_log10(pb));
        }
    }
    LinearFit::fit(&xs, &ys)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(gene_id: &str, phenotype: &str, grex: &str, p: f64, beta: f64) -> GeneRecord {
        GeneRecord {
            gene_id: gene_id.to_string(),
            gene_symbol: gene_id.to_lowercase(),
            chromosome: "1".to_string(),
            start_position: 100,
            end_position: 200,
            phenotype: phenotype.to_string(),
            grex: grex.to_string(),
            p_value: p,
            beta,
        }
    }

    #[test]
    fn test_matching_keys_are_joined() {
        let a = vec![record("g1", "putamen", "dlpfc", 0.01, 0.5)];
        let b = vec![record("g1", "putamen", "dlpfc", 0.02, -0.3)];

        let points = pair_records(&a, &b);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].p_a, Some(0.01));
        assert_eq!(points[0].p_b, Some(0.02));
        assert_eq!(points[0].beta_b, Some(-0.3));
        assert!(points[0].is_complete());
    }

    #[test]
    fn test_differing_phenotype_does_not_join() {
        let a = vec![record("g1", "putamen", "dlpfc", 0.01, 0.5)];
        let b = vec![record("g1", "amygdala", "dlpfc", 0.02, -0.3)];

        let points = pair_records(&a, &b);
        assert_eq!(points.len(), 2);
        assert!(!points[0].is_complete());
        assert!(!points[1].is_complete());
    }

    #[test]
    fn test_missing_side_is_none_not_sentinel() {
        let a = vec![
            record("g1", "putamen", "dlpfc", 0.01, 0.5),
            record("g2", "putamen", "dlpfc", 0.03, 0.1),
        ];
        let b = vec![record("g2", "putamen", "dlpfc", 0.04, 0.2)];

        let points = pair_records(&a, &b);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].p_b, None);
        assert_eq!(points[1].p_b, Some(0.04));
    }

    #[test]
    fn test_union_preserves_first_appearance_order() {
        let a = vec![
            record("g2", "putamen", "dlpfc", 0.01, 0.5),
            record("g1", "putamen", "dlpfc", 0.02, 0.5),
        ];
        let b = vec![
            record("g3", "putamen", "dlpfc", 0.03, 0.5),
            record("g1", "putamen", "dlpfc", 0.04, 0.5),
        ];

        let points = pair_records(&a, &b);
        let ids: Vec<&str> = points.iter().map(|p| p.gene_id.as_str()).collect();
        assert_eq!(ids, ["g2", "g1", "g3"]);
    }

    #[test]
    fn test_duplicate_key_first_occurrence_wins() {
        let a = vec![
            record("g1", "putamen", "dlpfc", 0.01, 0.5),
            record("g1", "putamen", "dlpfc", 0.09, 0.9),
        ];
        let b: Vec<GeneRecord> = vec![];

        let points = pair_records(&a, &b);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].p_a, Some(0.01));
    }

    #[test]
    fn test_scatter_fit_uses_complete_pairs_only() {
        let a = vec![
            record("g1", "putamen", "dlpfc", 0.1, 0.5),
            record("g2", "putamen", "dlpfc", 0.01, 0.5),
            record("g3", "putamen", "dlpfc", 0.001, 0.5),
            record("g4", "putamen", "dlpfc", 0.0001, 0.5),
            record("lonely", "putamen", "dlpfc", 0.5, 0.5),
        ];
        let b = vec![
            record("g1", "putamen", "dlpfc", 0.1, 0.5),
            record("g2", "putamen", "dlpfc", 0.01, 0.5),
            record("g3", "putamen", "dlpfc", 0.001, 0.5),
            record("g4", "putamen", "dlpfc", 0.0001, 0.5),
        ];

        let points = pair_records(&a, &b);
        let fit = scatter_fit(&points);

        assert_eq!(fit.n, 4);
        assert!((fit.slope - 1.0).abs() < 1e-9);
        assert!((fit.r_squared - 1.0).abs() < 1e-9);
    }
}
