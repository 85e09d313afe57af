//! twas_atlas command-line interface

use clap::Parser;
use log::{info, LevelFilter};

use twas_atlas::cli::{Cli, Commands};
use twas_atlas::compare::{overlap_grid, pair_records, scatter_fit};
use twas_atlas::data::group_by_phenotype;
use twas_atlas::layout::manhattan_points;
use twas_atlas::prelude::*;
use twas_atlas::report::{format_scientific, AnalysisSummary, SignificantTable};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    let args: Vec<String> = std::env::args().collect();

    // Find the first non-flag argument (potential subcommand)
    let first_positional = args.iter().skip(1).find(|a| !a.starts_with('-'));
    let subcommands = ["analyze", "compare", "merge", "help"];
    let has_subcommand = first_positional.map_or(false, |a| subcommands.contains(&a.as_str()));

    if !has_subcommand {
        // No subcommand -- handle top-level help/version manually
        if args.len() == 1 {
            print_no_args();
            return;
        }
        if args.iter().any(|a| a == "--help") {
            print_long_help();
            return;
        }
        if args.iter().any(|a| a == "-h") {
            print_short_help();
            return;
        }
        if args.iter().any(|a| a == "-V" || a == "--version") {
            println!("twas_atlas {}", VERSION);
            return;
        }
        // Unknown flags without subcommand -- show hint
        print_no_args();
        return;
    }

    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Some(Commands::Analyze {
            input,
            threshold,
            correction,
            phenotype,
            grex,
            output,
            points,
            blocks,
        }) => run_analyze(
            &input,
            threshold,
            &correction,
            &phenotype,
            &grex,
            &output,
            points.as_deref(),
            blocks.as_deref(),
        ),
        Some(Commands::Compare {
            cohort_a,
            cohort_b,
            threshold,
            correction,
            phenotype,
            grex,
            overlap,
            pairs,
            threads,
        }) => run_compare(
            &cohort_a,
            &cohort_b,
            threshold,
            &correction,
            &phenotype,
            &grex,
            &overlap,
            pairs.as_deref(),
            threads,
        ),
        Some(Commands::Merge {
            associations,
            positions,
            output,
        }) => run_merge(&associations, &positions, &output),
        None => {
            // Should not reach here (handled above), but just in case
            print_no_args();
            return;
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

// ---------------------------------------------------------------------------
// Custom help output
// ---------------------------------------------------------------------------

fn print_no_args() {
    println!("twas_atlas v{}", VERSION);
    println!("Run `twas_atlas -h` for usage or `twas_atlas --help` for detailed information.");
}

fn print_short_help() {
    println!("twas_atlas v{}", VERSION);
    println!();
    println!("Usage: twas_atlas <COMMAND> [OPTIONS]");
    println!();
    println!("Commands:");
    println!("  analyze  Classify one cohort and lay it out for plotting");
    println!("  compare  Compare two cohorts: overlap grid and paired scatter");
    println!("  merge    Merge a raw association table with a BED position table");
    println!();
    println!("Run `twas_atlas <COMMAND> -h` for command-specific options.");
}

fn print_long_help() {
    println!("twas_atlas v{}", VERSION);
    println!("Significance classification and Manhattan layout for TWAS association records");
    println!();
    println!("Usage: twas_atlas <COMMAND> [OPTIONS]");
    println!();
    println!("Commands:");
    println!("  analyze  Classify one cohort and lay it out for plotting");
    println!("             - nominal, Bonferroni, or FDR thresholds");
    println!("             - phenotype / grex selection");
    println!("             - significant gene table sorted by p-value");
    println!("             - plot-ready Manhattan points");
    println!("  compare  Compare two cohorts");
    println!("             - per-phenotype overlap of significant genes");
    println!("             - record pairing by gene/phenotype/grex");
    println!("             - scatter fit of -log10 p-values");
    println!("  merge    Merge a raw association table with a BED position table");
    println!();
    println!("Global Options:");
    println!("  -v, --verbose    Enable verbose output");
    println!("  -h               Print short help");
    println!("      --help       Print detailed help");
    println!("  -V, --version    Print version");
    println!();
    println!("Examples:");
    println!("  twas_atlas merge -a twas.csv -p gene_positions.bed -o records.csv");
    println!();
    println!("  twas_atlas analyze -i records.csv --correction fdr -t 0.05 \\");
    println!("    --phenotype putamen -o significant.csv --points points.csv");
    println!();
    println!("  twas_atlas compare --cohort-a ea.csv --cohort-b aa.csv \\");
    println!("    --overlap overlap.json --pairs pairs.csv");
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

/// Load a record table, switching on the file extension.
fn load_records(path: &str) -> Result<RecordCollection> {
    if path.ends_with(".json") {
        twas_atlas::io::json::read_records(path)
    } else {
        read_records(path)
    }
}

fn build_filter_state(
    threshold: f64,
    correction: &str,
    phenotypes: &[String],
    grex_sites: &[String],
) -> Result<FilterState> {
    let method = CorrectionMethod::from_name(correction)?;
    Ok(FilterState::new(threshold, method)?
        .select_phenotypes(phenotypes.iter().cloned())
        .select_grex(grex_sites.iter().cloned()))
}

fn run_analyze(
    input_path: &str,
    threshold: f64,
    correction: &str,
    phenotypes: &[String],
    grex_sites: &[String],
    output_path: &str,
    points_path: Option<&str>,
    blocks_path: Option<&str>,
) -> Result<()> {
    info!("Loading records from: {}", input_path);
    let collection = load_records(input_path)?;
    info!(
        "  {} records, {} phenotypes, {} grex sites",
        collection.len(),
        collection.phenotypes().len(),
        collection.grex_sites().len()
    );

    let state = build_filter_state(threshold, correction, phenotypes, grex_sites)?;
    let classified = run_classification(&collection, &state)?;

    let layout = GenomeLayout::from_records(&classified.records)?;
    info!(
        "Laid out {} records across {} chromosomes",
        layout.total_count(),
        layout.blocks().len()
    );

    if let Some(path) = points_path {
        let points = manhattan_points(&classified.records, &classified.significance, &layout)?;
        info!("Writing {} Manhattan points to: {}", points.len(), path);
        write_manhattan_points(path, &points)?;
    }

    if let Some(path) = blocks_path {
        info!(
            "Writing {} chromosome blocks to: {}",
            layout.blocks().len(),
            path
        );
        write_layout_blocks(path, &layout)?;
    }

    let table = SignificantTable::from_records(
        classified.significance.select(&classified.records),
    );
    info!(
        "Writing {} significant genes to: {}",
        table.len(),
        output_path
    );
    write_records(output_path, table.rows())?;

    let summary = AnalysisSummary::new(
        collection.len(),
        classified.records.len(),
        &classified.significance,
    );
    println!("\n{}", summary);

    Ok(())
}

fn run_compare(
    cohort_a_path: &str,
    cohort_b_path: &str,
    threshold: f64,
    correction: &str,
    phenotypes: &[String],
    grex_sites: &[String],
    overlap_path: &str,
    pairs_path: Option<&str>,
    threads: usize,
) -> Result<()> {
    // Configure thread pool
    if threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .ok();
    }

    info!("Loading cohort A from: {}", cohort_a_path);
    let cohort_a = load_records(cohort_a_path)?;
    info!("  {} records", cohort_a.len());

    info!("Loading cohort B from: {}", cohort_b_path);
    let cohort_b = load_records(cohort_b_path)?;
    info!("  {} records", cohort_b.len());

    let state = build_filter_state(threshold, correction, phenotypes, grex_sites)?;
    let classified_a = run_classification(&cohort_a, &state)?;
    let classified_b = run_classification(&cohort_b, &state)?;

    let significant_a = classified_a.significance.select(&classified_a.records);
    let significant_b = classified_b.significance.select(&classified_b.records);
    info!(
        "Significant: {} in cohort A, {} in cohort B",
        significant_a.len(),
        significant_b.len()
    );

    let owned_a: Vec<GeneRecord> = significant_a.into_iter().cloned().collect();
    let owned_b: Vec<GeneRecord> = significant_b.into_iter().cloned().collect();
    let grid = overlap_grid(&group_by_phenotype(&owned_a), &group_by_phenotype(&owned_b));
    info!(
        "Writing {}x{} overlap grid to: {}",
        grid.row_phenotypes().len(),
        grid.col_phenotypes().len(),
        overlap_path
    );
    twas_atlas::io::json::write_overlap_grid(overlap_path, &grid)?;

    let points = pair_records(&classified_a.records, &classified_b.records);
    let complete = points.iter().filter(|p| p.is_complete()).count();
    info!(
        "Paired {} combinations ({} present in both cohorts)",
        points.len(),
        complete
    );
    if let Some(path) = pairs_path {
        info!("Writing paired points to: {}", path);
        write_paired_points(path, &points)?;
    }

    let fit = scatter_fit(&points);
    println!();
    println!("Cohort Comparison Summary");
    println!("=========================");
    println!("Cohort A significant: {}", classified_a.significance.count());
    println!("Cohort B significant: {}", classified_b.significance.count());
    println!("Paired combinations: {} ({} complete)", points.len(), complete);
    if fit.n >= 3 {
        println!(
            "Scatter fit: slope {:.4}, r^2 {:.4}, p {}",
            fit.slope,
            fit.r_squared,
            format_scientific(fit.p_value, 2)
        );
    } else {
        println!("Scatter fit: not enough complete pairs");
    }

    Ok(())
}

fn run_merge(associations_path: &str, positions_path: &str, output_path: &str) -> Result<()> {
    info!("Loading association table from: {}", associations_path);
    let rows = read_association_rows(associations_path)?;
    info!("  {} rows", rows.len());

    info!("Loading position table from: {}", positions_path);
    let positions = read_position_table(positions_path)?;
    info!("  {} gene positions", positions.len());

    let outcome = merge(rows, &positions)?;
    info!(
        "Merged {} records ({} rows had no position entry)",
        outcome.matched, outcome.skipped
    );

    info!("Writing merged records to: {}", output_path);
    if output_path.ends_with(".json") {
        twas_atlas::io::json::write_records(output_path, outcome.collection.records())?;
    } else {
        write_records(output_path, outcome.collection.records())?;
    }

    info!("Done!");
    Ok(())
}
