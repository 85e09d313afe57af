//! Validated, immutable record collections

use std::collections::{BTreeMap, HashSet};

use crate::data::record::GeneRecord;
use crate::error::Result;

/// An immutable collection of validated records plus cached catalogs of the
/// distinct phenotypes and grex sites it contains.
///
/// Construction is the validation boundary: every record is checked here so
/// the engines downstream never see a malformed row. Records keep their
/// input order.
#[derive(Debug, Clone)]
pub struct RecordCollection {
    records: Vec<GeneRecord>,
    phenotypes: Vec<String>,
    grex_sites: Vec<String>,
}

impl RecordCollection {
    /// Validate `records` and build the collection.
    ///
    /// Fails on the first malformed record, reporting its zero-based row.
    /// Duplicate `(gene_id, phenotype, grex)` keys are legal but unexpected
    /// and logged, since pairing treats them as the same observation.
    pub fn new(records: Vec<GeneRecord>) -> Result<Self> {
        for (row, record) in records.iter().enumerate() {
            record.validate(row)?;
        }

        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(record.key()) {
                log::warn!("Duplicate record key {}", record.key());
            }
        }

        let phenotypes = distinct_sorted(records.iter().map(|r| r.phenotype.as_str()));
        let grex_sites = distinct_sorted(records.iter().map(|r| r.grex.as_str()));

        Ok(Self {
            records,
            phenotypes,
            grex_sites,
        })
    }

    /// All records, in input order.
    pub fn records(&self) -> &[GeneRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the collection holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct phenotype names, sorted.
    pub fn phenotypes(&self) -> &[String] {
        &self.phenotypes
    }

    /// Distinct grex site names, sorted.
    pub fn grex_sites(&self) -> &[String] {
        &self.grex_sites
    }
}

fn distinct_sorted<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = values.map(|s| s.to_string()).collect();
    out.sort();
    out.dedup();
    out
}

/// Group records by phenotype into an ordered mapping.
///
/// Member order within each group follows the input slice, so grouping a
/// filtered subset keeps its stable order.
pub fn group_by_phenotype<'a>(records: &'a [GeneRecord]) -> BTreeMap<&'a str, Vec<&'a GeneRecord>> {
    let mut groups: BTreeMap<&str, Vec<&GeneRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.phenotype.as_str()).or_default().push(record);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(gene_id: &str, phenotype: &str, grex: &str, p: f64) -> GeneRecord {
        GeneRecord {
            gene_id: gene_id.to_string(),
            gene_symbol: gene_id.to_lowercase(),
            chromosome: "1".to_string(),
            start_position: 100,
            end_position: 200,
            phenotype: phenotype.to_string(),
            grex: grex.to_string(),
            p_value: p,
            beta: 0.1,
        }
    }

    #[test]
    fn test_catalogs_are_sorted_and_distinct() {
        let collection = RecordCollection::new(vec![
            record("g1", "putamen", "dlpfc", 0.01),
            record("g2", "amygdala", "caudate", 0.02),
            record("g3", "putamen", "dlpfc", 0.03),
        ])
        .unwrap();

        assert_eq!(collection.phenotypes(), ["amygdala", "putamen"]);
        assert_eq!(collection.grex_sites(), ["caudate", "dlpfc"]);
        assert_eq!(collection.len(), 3);
    }

    #[test]
    fn test_malformed_record_reports_row() {
        let mut bad = record("g2", "amygdala", "caudate", 0.02);
        bad.chromosome = "chrX".to_string();

        let err = RecordCollection::new(vec![record("g1", "putamen", "dlpfc", 0.01), bad])
            .unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_group_by_phenotype_keeps_member_order() {
        let records = vec![
            record("g1", "putamen", "dlpfc", 0.03),
            record("g2", "amygdala", "dlpfc", 0.02),
            record("g3", "putamen", "dlpfc", 0.01),
        ];
        let groups = group_by_phenotype(&records);

        let keys: Vec<&str> = groups.keys().copied().collect();
        assert_eq!(keys, ["amygdala", "putamen"]);

        let putamen: Vec<&str> = groups["putamen"].iter().map(|r| r.gene_id.as_str()).collect();
        assert_eq!(putamen, ["g1", "g3"]);
    }

    #[test]
    fn test_empty_collection_is_valid() {
        let collection = RecordCollection::new(vec![]).unwrap();
        assert!(collection.is_empty());
        assert!(collection.phenotypes().is_empty());
    }
}
