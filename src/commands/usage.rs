//! Usage extraction commands (`fargate`, `ec2`, `lambda`, `all`)

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::info;

use aws_cost_report::output::{self, OutputFormat, TableData};
use aws_cost_report::product::Product;
use aws_cost_report::usage::{LoadedUsage, UsageExtractor, UsageReport};

use crate::cli::{AllArgs, SourceArgs, UsageArgs};

/// Execute a single-product usage command
pub fn execute(product: Product, args: &UsageArgs) -> Result<()> {
    let loaded = LoadedUsage::load(&args.source.paths)?;
    let report = report_for(product, &args.source, &loaded)?;
    let title = product.descriptor().usage_title;

    match &args.output {
        Some(path) => save(&report, path, title),
        None => display(&report, title, args.format),
    }
}

/// Execute the `all` command: Fargate, EC2 then Lambda over the same sources
pub fn execute_all(args: &AllArgs) -> Result<()> {
    let loaded = LoadedUsage::load(&args.source.paths)?;
    info!(
        files = loaded.sources.len(),
        records = loaded.records.len(),
        "Loaded usage exports"
    );

    if let Some(dir) = &args.output_dir {
        export_all(&args.source, &loaded, dir)?;
        return Ok(());
    }

    for product in Product::ALL {
        let report = report_for(product, &args.source, &loaded)?;
        display(&report, product.descriptor().usage_title, args.format)?;
        println!();
    }

    Ok(())
}

/// Write one CSV per product into `dir`, creating it if needed. Returns the
/// written paths in Fargate, EC2, Lambda order.
fn export_all(source: &SourceArgs, loaded: &LoadedUsage, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let mut written = Vec::with_capacity(Product::ALL.len());
    for product in Product::ALL {
        let descriptor = product.descriptor();
        let report = report_for(product, source, loaded)?;
        let path = dir.join(descriptor.export_file_name);
        save(&report, &path, descriptor.usage_title)?;
        written.push(path);
    }

    Ok(written)
}

fn report_for(product: Product, source: &SourceArgs, loaded: &LoadedUsage) -> Result<UsageReport> {
    let query = source.query(product);
    info!(product = %product, filter = %query.usage_type_substring, "Extracting usage");

    let report = UsageExtractor::new(query).report_loaded(loaded)?;
    info!(product = %product, rows = report.rows.len(), "Extraction finished");
    Ok(report)
}

fn save(report: &UsageReport, path: &Path, title: &str) -> Result<()> {
    output::write_csv_file(&report.to_table(), path)?;

    if report.is_empty() {
        println!("{}", format!("{}: No matching rows found", title).yellow());
    }
    println!(
        "{} {} ({} rows)",
        "Saved:".green(),
        path.display(),
        report.rows.len()
    );
    Ok(())
}

fn display(report: &UsageReport, title: &str, format: OutputFormat) -> Result<()> {
    let table = report.to_table();

    match format {
        OutputFormat::Table => {
            if report.is_empty() {
                println!("{}", format!("{}: No matching rows found", title).yellow());
                return Ok(());
            }
            println!("{}", summary_line(&table).bold());
            println!("{}", output::render_table(&table, title));
        }
        OutputFormat::Markdown | OutputFormat::Csv => {
            print!("{}", terminated(output::render(&table, title, format)?));
        }
    }

    Ok(())
}

fn summary_line(table: &TableData) -> String {
    format!("Extracted rows: {}", table.rows.len())
}

fn terminated(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_line() {
        let mut table = TableData::new(["account_id", "cost"]);
        table.push_row(["1", "2"]);
        table.push_row(["3", "4"]);
        assert_eq!(summary_line(&table), "Extracted rows: 2");
    }

    #[test]
    fn test_terminated_adds_single_newline() {
        assert_eq!(terminated("a".to_string()), "a\n");
        assert_eq!(terminated("a\n".to_string()), "a\n");
    }

    #[test]
    fn test_export_all_writes_every_product_file() {
        let dir = tempfile::tempdir().unwrap();
        let bill = dir.path().join("bill.csv");
        std::fs::write(
            &bill,
            "bill_id,aws_account_id,month,usage_type,item_description,cost\n\
             b1,111,2024-05,APN1-Fargate-vCPU-Hours:perCPU,Fargate vCPU,1.5\n\
             b2,111,2024-05,APN1-BoxUsage:t3.micro,Linux t3.micro,0.25\n",
        )
        .unwrap();

        let source = SourceArgs {
            paths: vec![bill.to_string_lossy().into_owned()],
            no_negation: false,
            negation_only: false,
            group_by: Vec::new(),
        };
        let loaded = LoadedUsage::load(&source.paths).unwrap();
        let out_dir = dir.path().join("reports").join("2024-05");

        let written = export_all(&source, &loaded, &out_dir).unwrap();

        assert!(out_dir.is_dir());
        assert_eq!(
            written,
            vec![
                out_dir.join("fargate_usage.csv"),
                out_dir.join("ec2_usage.csv"),
                out_dir.join("lambda_usage.csv"),
            ]
        );
        assert_eq!(
            std::fs::read_to_string(&written[0]).unwrap(),
            "account_id,month,usage_type,item_description,cost\n\
             111,2024-05,APN1-Fargate-vCPU-Hours:perCPU,Fargate vCPU,1.5\n"
        );
        assert_eq!(
            std::fs::read_to_string(&written[1]).unwrap(),
            "account_id,month,usage_type,item_description,cost\n\
             111,2024-05,APN1-BoxUsage:t3.micro,Linux t3.micro,0.25\n"
        );
        assert_eq!(
            std::fs::read_to_string(&written[2]).unwrap(),
            "account_id,month,usage_type,item_description,cost\n"
        );
    }
}
