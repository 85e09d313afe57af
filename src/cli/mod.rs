//! Command-line interface for twas_atlas

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "twas_atlas")]
#[command(version)]
#[command(about = "Significance classification and Manhattan layout for TWAS association records")]
#[command(disable_help_flag = true)]
#[command(disable_version_flag = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify one cohort and lay it out for plotting
    #[command(
        about = "Classify one cohort and lay it out for plotting",
        long_about = "Classify one cohort and lay it out for plotting\n\n\
            Loads a merged record table, applies the phenotype/grex selection,\n\
            classifies significance under the chosen correction method, and\n\
            writes the significant genes sorted by ascending p-value. The\n\
            genome layout and -log10 transform can be exported as plot-ready\n\
            points with --points, and the axis blocks with --blocks.",
        after_long_help = "\
Examples:
  # Nominal threshold over everything
  twas_atlas analyze -i records.csv -o significant.csv

  # FDR at 0.05 within a phenotype selection
  twas_atlas analyze -i records.csv --correction fdr -t 0.05 \\
    --phenotype putamen --phenotype caudate -o significant.csv

  # Export Manhattan points alongside the table
  twas_atlas analyze -i records.json --points points.csv -o significant.csv"
    )]
    Analyze {
        /// Path to the merged record table (CSV, TSV, or JSON)
        #[arg(short, long,
            long_help = "Path to the merged record table.\n\
                CSV/TSV files need one camelCase column per record field\n\
                (geneId, geneSymbol, chromosome, startPosition, endPosition,\n\
                phenotype, grex, pValue, beta). A .json extension switches to\n\
                the JSON array form of the same records.")]
        input: String,

        /// Significance threshold [default: 1e-4]
        #[arg(short, long, default_value = "1e-4",
            long_help = "Uncorrected significance threshold.\n\
                The default matches the single-cohort view; cross-cohort runs\n\
                conventionally use 0.05 with --correction fdr.")]
        threshold: f64,

        /// Multiple testing correction [default: none]
        #[arg(long, default_value = "none",
            long_help = "Multiple testing correction.\n\
                none:       compare p against the threshold directly\n\
                bonferroni: divide the threshold by the number of records\n\
                fdr:        Benjamini-Hochberg step-up cutoff\n\
                Correction always counts the records that survive the\n\
                phenotype/grex selection, not the whole input.")]
        correction: String,

        /// Restrict to a phenotype (repeatable)
        #[arg(long, value_name = "NAME",
            long_help = "Restrict the analysis to a phenotype.\n\
                Can be given multiple times: --phenotype putamen --phenotype caudate\n\
                With no --phenotype flags, every phenotype is kept.")]
        phenotype: Vec<String>,

        /// Restrict to a grex site (repeatable)
        #[arg(long, value_name = "NAME",
            long_help = "Restrict the analysis to a grex imputation site.\n\
                Can be given multiple times. With no --grex flags, every site\n\
                is kept.")]
        grex: Vec<String>,

        /// Output path for the significant gene table [default: significant_genes.csv]
        #[arg(short, long, default_value = "significant_genes.csv")]
        output: String,

        /// Optional output path for plot-ready Manhattan points
        #[arg(long, value_name = "PATH",
            long_help = "Write every selected record as a plot-ready point:\n\
                layout position, -log10 p-value, and significance flag.")]
        points: Option<String>,

        /// Optional output path for the per-chromosome axis table
        #[arg(long, value_name = "PATH",
            long_help = "Write one row per chromosome: record count, axis\n\
                offset, span normalizer, and tick position.")]
        blocks: Option<String>,
    },

    /// Compare two cohorts: overlap grid and paired scatter
    #[command(
        about = "Compare two cohorts: overlap grid and paired scatter",
        long_about = "Compare two cohorts: overlap grid and paired scatter\n\n\
            Classifies both cohorts under the same settings, computes the\n\
            per-phenotype overlap of their significant genes, and pairs\n\
            records across cohorts by gene/phenotype/grex for scatter\n\
            summaries.",
        after_long_help = "\
Examples:
  # FDR 0.05 on both cohorts, overlap grid to JSON
  twas_atlas compare --cohort-a ea.csv --cohort-b aa.csv --overlap overlap.json

  # Also export the paired points and restrict to one grex site
  twas_atlas compare --cohort-a ea.csv --cohort-b aa.csv \\
    --grex dlpfc --overlap overlap.json --pairs pairs.csv"
    )]
    Compare {
        /// Path to the first cohort's record table
        #[arg(long, value_name = "PATH")]
        cohort_a: String,

        /// Path to the second cohort's record table
        #[arg(long, value_name = "PATH")]
        cohort_b: String,

        /// Significance threshold [default: 0.05]
        #[arg(short, long, default_value = "0.05")]
        threshold: f64,

        /// Multiple testing correction [default: fdr]
        #[arg(long, default_value = "fdr",
            long_help = "Multiple testing correction applied to each cohort\n\
                separately: none, bonferroni, or fdr.")]
        correction: String,

        /// Restrict to a phenotype (repeatable)
        #[arg(long, value_name = "NAME")]
        phenotype: Vec<String>,

        /// Restrict to a grex site (repeatable)
        #[arg(long, value_name = "NAME")]
        grex: Vec<String>,

        /// Output path for the overlap grid [default: overlap.json]
        #[arg(long, default_value = "overlap.json")]
        overlap: String,

        /// Optional output path for paired cohort points
        #[arg(long, value_name = "PATH",
            long_help = "Write the union of both cohorts' records paired by\n\
                gene/phenotype/grex. A side missing from a cohort is left\n\
                empty.")]
        pairs: Option<String>,

        /// Number of threads (0 = auto) [default: 0]
        #[arg(long, default_value = "0")]
        threads: usize,
    },

    /// Merge a raw association table with a BED position table
    #[command(
        about = "Merge a raw association table with a BED position table",
        long_about = "Merge a raw association table with a BED position table\n\n\
            Joins association rows (ens, sym, phen, grex, pval, beta) to gene\n\
            coordinates by Ensembl id. Rows without a position entry are\n\
            dropped and counted rather than given placeholder coordinates.",
        after_long_help = "\
Examples:
  twas_atlas merge -a twas.csv -p gene_positions.bed -o records.csv

  # JSON output for downstream tooling
  twas_atlas merge -a twas.csv -p gene_positions.bed -o records.json"
    )]
    Merge {
        /// Path to the raw association table
        #[arg(short, long,
            long_help = "Path to the raw association table.\n\
                Columns are found by name (ens, sym, phen, grex, pval, beta),\n\
                case-insensitively and in any order; extra columns are\n\
                ignored. CSV and TSV delimiters are auto-detected.")]
        associations: String,

        /// Path to the BED position table
        #[arg(short, long,
            long_help = "Path to the BED position table.\n\
                Tab-separated chromosome, start, end, gene id. A header line\n\
                is detected and skipped.")]
        positions: String,

        /// Output path for the merged record table [default: records.csv]
        #[arg(short, long, default_value = "records.csv",
            long_help = "Output path for the merged record table.\n\
                A .json extension writes the JSON array form instead of CSV.")]
        output: String,
    },
}
