//! Association record type and per-record validation

use serde::{Deserialize, Serialize};

use crate::error::{AtlasError, Result};

/// One TWAS/GWAS observation: a gene tested against a phenotype at one
/// expression site.
///
/// Field names serialize in camelCase, matching the JSON shape produced by
/// the persisted store (`geneId`, `startPosition`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneRecord {
    /// Stable gene identifier (e.g. an Ensembl ID)
    pub gene_id: String,
    /// Display name for tables and overlap reporting
    pub gene_symbol: String,
    /// Chromosome label as a decimal digit string ("1".."22")
    pub chromosome: String,
    /// Start of the gene in base pairs
    pub start_position: u64,
    /// End of the gene in base pairs (>= start_position)
    pub end_position: u64,
    /// Trait the association was tested against
    pub phenotype: String,
    /// Tissue / expression-site grouping dimension
    pub grex: String,
    /// Association p-value, in (0, 1]
    pub p_value: f64,
    /// Effect size
    pub beta: f64,
}

impl GeneRecord {
    /// Numeric value of the chromosome label, if it is one.
    pub fn chromosome_number(&self) -> Option<u32> {
        self.chromosome.parse::<u32>().ok().filter(|&c| c >= 1)
    }

    /// Midpoint of the gene in base pairs.
    pub fn midpoint(&self) -> f64 {
        // Summing the raw coordinates could overflow u64.
        self.start_position as f64 + (self.end_position - self.start_position) as f64 / 2.0
    }

    /// Composite identity used for matching across collections.
    pub fn key(&self) -> RecordKey {
        RecordKey {
            gene_id: self.gene_id.clone(),
            phenotype: self.phenotype.clone(),
            grex: self.grex.clone(),
        }
    }

    /// Check that the record's fields are well formed, reporting `row`
    /// in the error.
    ///
    /// Rejects records rather than letting NaN or inverted coordinates
    /// propagate into layout math.
    pub fn validate(&self, row: usize) -> Result<()> {
        let fail = |reason: String| AtlasError::MalformedRecord { row, reason };

        if self.gene_id.is_empty() {
            return Err(fail("empty gene id".to_string()));
        }
        if self.chromosome_number().is_none() {
            return Err(fail(format!(
                "chromosome '{}' is not a positive decimal label",
                self.chromosome
            )));
        }
        if self.end_position < self.start_position {
            return Err(fail(format!(
                "end position {} precedes start position {}",
                self.end_position, self.start_position
            )));
        }
        if !self.p_value.is_finite() || self.p_value <= 0.0 || self.p_value > 1.0 {
            return Err(fail(format!(
                "p-value {} outside (0, 1]",
                self.p_value
            )));
        }
        if !self.beta.is_finite() {
            return Err(fail(format!("non-finite beta {}", self.beta)));
        }
        Ok(())
    }
}

/// Composite record identity: `(gene_id, phenotype, grex)`.
///
/// Two records with the same key describe the same test and are treated as
/// the same observation when pairing cohorts or tracking a highlighted row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    pub gene_id: String,
    pub phenotype: String,
    pub grex: String,
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}_{}", self.gene_id, self.phenotype, self.grex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(chromosome: &str, start: u64, end: u64, p: f64) -> GeneRecord {
        GeneRecord {
            gene_id: "ENSG0001".to_string(),
            gene_symbol: "GENE1".to_string(),
            chromosome: chromosome.to_string(),
            start_position: start,
            end_position: end,
            phenotype: "hippocampus".to_string(),
            grex: "dlpfc".to_string(),
            p_value: p,
            beta: 0.2,
        }
    }

    #[test]
    fn test_valid_record_passes() {
        assert!(record("1", 100, 200, 0.01).validate(0).is_ok());
    }

    #[test]
    fn test_non_numeric_chromosome_rejected() {
        let result = record("X", 100, 200, 0.01).validate(3);
        match result {
            Err(AtlasError::MalformedRecord { row, .. }) => assert_eq!(row, 3),
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_inverted_positions_rejected() {
        assert!(record("1", 500, 100, 0.01).validate(0).is_err());
    }

    #[test]
    fn test_midpoint_near_coordinate_limit() {
        assert!((record("1", 100, 200, 0.01).midpoint() - 150.0).abs() < 1e-12);

        // Coordinates whose sum exceeds u64::MAX must still land in range.
        let wide = record("1", u64::MAX - 10, u64::MAX - 2, 0.01);
        let mid = wide.midpoint();
        assert!(mid >= (u64::MAX - 10) as f64);
        assert!(mid <= (u64::MAX - 2) as f64);
    }

    #[test]
    fn test_pvalue_bounds() {
        assert!(record("1", 100, 200, 0.0).validate(0).is_err());
        assert!(record("1", 100, 200, 1.5).validate(0).is_err());
        assert!(record("1", 100, 200, f64::NAN).validate(0).is_err());
        // 1.0 is inside the closed upper bound
        assert!(record("1", 100, 200, 1.0).validate(0).is_ok());
    }

    #[test]
    fn test_key_matches_identity_fields_only() {
        let a = record("1", 100, 200, 0.01);
        let mut b = record("1", 100, 200, 0.9);
        b.beta = -1.0;
        assert_eq!(a.key(), b.key());

        let mut c = a.clone();
        c.grex = "putamen".to_string();
        assert_ne!(a.key(), c.key());
    }

    #[test]
    fn test_wire_field_names_are_camel_case() {
        let json = r#"{
            "geneId": "ENSG0002",
            "geneSymbol": "GENE2",
            "chromosome": "2",
            "startPosition": 50,
            "endPosition": 60,
            "phenotype": "amygdala",
            "grex": "caudate",
            "pValue": 0.0001,
            "beta": -0.4
        }"#;
        let record: GeneRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.gene_id, "ENSG0002");
        assert_eq!(record.chromosome_number(), Some(2));
        assert!(record.validate(0).is_ok());
    }
}
