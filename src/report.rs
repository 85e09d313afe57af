//! Human-readable reporting: the significant gene table and run summaries

use crate::correction::Significance;
use crate::data::GeneRecord;

/// Format a p-value in scientific notation with the given number of
/// decimal places, e.g. 3.20e-6.
pub fn format_scientific(p: f64, decimals: usize) -> String {
    format!("{:.*e}", decimals, p)
}

/// The significant genes of a run, sorted by ascending p-value.
#[derive(Debug, Clone)]
pub struct SignificantTable {
    rows: Vec<GeneRecord>,
}

impl SignificantTable {
    /// Collect and sort the given records. The sort is stable, so ties keep
    /// their input order.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a GeneRecord>,
    {
        let mut rows: Vec<GeneRecord> = records.into_iter().cloned().collect();
        rows.sort_by(|a, b| a.p_value.total_cmp(&b.p_value));
        Self { rows }
    }

    pub fn rows(&self) -> &[GeneRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl std::fmt::Display for SignificantTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{:<14} {:<18} {:>4} {:<16} {:<12} {:>10} {:>9}",
            "symbol", "gene_id", "chr", "phenotype", "grex", "p_value", "beta"
        )?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<14} {:<18} {:>4} {:<16} {:<12} {:>10} {:>9.4}",
                row.gene_symbol,
                row.gene_id,
                row.chromosome,
                row.phenotype,
                row.grex,
                format_scientific(row.p_value, 2),
                row.beta
            )?;
        }
        Ok(())
    }
}

/// Summary of a classification run.
#[derive(Debug, Clone)]
pub struct AnalysisSummary {
    pub total_records: usize,
    pub after_selection: usize,
    pub significant: usize,
    pub threshold: f64,
    pub cutoff: f64,
    pub method: String,
}

impl AnalysisSummary {
    pub fn new(total_records: usize, after_selection: usize, significance: &Significance) -> Self {
        Self {
            total_records,
            after_selection,
            significant: significance.count(),
            threshold: significance.threshold(),
            cutoff: significance.cutoff(),
            method: significance.method().to_string(),
        }
    }
}

impl std::fmt::Display for AnalysisSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Significance Summary")?;
        writeln!(f, "====================")?;
        writeln!(f, "Total records: {}", self.total_records)?;
        writeln!(f, "After selection: {}", self.after_selection)?;
        writeln!(
            f,
            "Correction: {} (threshold {})",
            self.method,
            format_scientific(self.threshold, 2)
        )?;
        writeln!(
            f,
            "Effective cutoff: {}",
            format_scientific(self.cutoff, 2)
        )?;
        writeln!(f, "Significant: {}", self.significant)?;
        Ok(())
    }
}
