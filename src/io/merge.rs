//! Joining association rows with gene positions

use std::collections::HashMap;

use crate::data::{GeneRecord, RecordCollection};
use crate::error::Result;
use crate::io::bed::GenePosition;
use crate::io::csv::AssociationRow;

/// The result of a merge: the validated collection plus counts of what made
/// it in and what was dropped.
#[derive(Debug)]
pub struct MergeOutcome {
    pub collection: RecordCollection,
    pub matched: usize,
    pub skipped: usize,
}

/// Attach positions to association rows by gene id.
///
/// Rows whose gene id has no entry in the position table are dropped, not
/// given placeholder coordinates; the count of dropped rows is returned and
/// logged. Row order is preserved.
pub fn merge(
    rows: Vec<AssociationRow>,
    positions: &HashMap<String, GenePosition>,
) -> Result<MergeOutcome> {
    let total = rows.len();
    let mut records = Vec::with_capacity(total);
    let mut skipped = 0;

    for row in rows {
        match positions.get(&row.gene_id) {
            Some(position) => records.push(GeneRecord {
                gene_id: row.gene_id,
                gene_symbol: row.gene_symbol,
                chromosome: position.chromosome.clone(),
                start_position: position.start,
                end_position: position.end,
                phenotype: row.phenotype,
                grex: row.grex,
                p_value: row.p_value,
                beta: row.beta,
            }),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        log::warn!(
            "Skipped {} of {} association rows with no position entry",
            skipped,
            total
        );
    }

    let matched = records.len();
    let collection = RecordCollection::new(records)?;
    Ok(MergeOutcome {
        collection,
        matched,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(gene_id: &str, p: f64) -> AssociationRow {
        AssociationRow {
            gene_id: gene_id.to_string(),
            gene_symbol: gene_id.to_lowercase(),
            phenotype: "putamen".to_string(),
            grex: "dlpfc".to_string(),
            p_value: p,
            beta: 0.2,
        }
    }

    fn positions() -> HashMap<String, GenePosition> {
        let mut map = HashMap::new();
        map.insert(
            "ENSG1".to_string(),
            GenePosition {
                chromosome: "1".to_string(),
                start: 100,
                end: 200,
            },
        );
        map.insert(
            "ENSG2".to_string(),
            GenePosition {
                chromosome: "2".to_string(),
                start: 300,
                end: 400,
            },
        );
        map
    }

    #[test]
    fn test_matched_rows_get_positions() {
        let outcome = merge(vec![row("ENSG1", 0.01), row("ENSG2", 0.02)], &positions()).unwrap();

        assert_eq!(outcome.matched, 2);
        assert_eq!(outcome.skipped, 0);
        let records = outcome.collection.records();
        assert_eq!(records[0].chromosome, "1");
        assert_eq!(records[1].start_position, 300);
    }

    #[test]
    fn test_unmatched_rows_are_dropped_and_counted() {
        let outcome = merge(
            vec![row("ENSG1", 0.01), row("ENSG9", 0.02), row("ENSG2", 0.03)],
            &positions(),
        )
        .unwrap();

        assert_eq!(outcome.matched, 2);
        assert_eq!(outcome.skipped, 1);

        let ids: Vec<&str> = outcome
            .collection
            .records()
            .iter()
            .map(|r| r.gene_id.as_str())
            .collect();
        assert_eq!(ids, ["ENSG1", "ENSG2"]);
    }

    #[test]
    fn test_merged_records_are_validated() {
        let mut bad_positions = positions();
        bad_positions.insert(
            "ENSG1".to_string(),
            GenePosition {
                chromosome: "1".to_string(),
                start: 500,
                end: 100,
            },
        );

        assert!(merge(vec![row("ENSG1", 0.01)], &bad_positions).is_err());
    }
}
