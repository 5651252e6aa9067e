//! `inspect` - show what a CSV file looks like to the importer

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::*;

use crate::roster::CsvImport;

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// CSV file to inspect
    pub csv: PathBuf,

    /// Number of extracted employees to preview
    #[arg(long, default_value_t = 10)]
    pub preview: usize,
}

pub async fn handle_inspect_command(args: InspectArgs) -> Result<()> {
    let mut import = CsvImport::new();
    import
        .load_path(&args.csv)
        .await
        .with_context(|| format!("Failed to inspect {}", args.csv.display()))?;

    println!("{}", args.csv.display().to_string().cyan().bold());
    println!("  Rows:    {}", import.row_count());
    println!("  Headers: {}", import.headers().join(", "));

    if let Some(selection) = import.selection() {
        println!();
        println!("{}", "Inferred columns".bold());
        println!("  Name:     {}", selection.name.green());
        println!("  Civil ID: {}", display_column(selection.civil_id_column()));
        println!("  Origin:   {}", display_column(selection.origin_column()));
    }

    if let Some(output) = import.output() {
        println!();
        println!(
            "{} unique employee(s), {} with a recognized type",
            output.employees.len().to_string().bold(),
            output.types.len()
        );
        for employee in output.employees.iter().take(args.preview) {
            let kind = output
                .types
                .get(&employee.name)
                .map(|t| t.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {:<30} {:<16} {}",
                employee.name,
                if employee.civil_id.is_empty() { "-" } else { employee.civil_id.as_str() },
                kind.dimmed()
            );
        }
        if output.employees.len() > args.preview {
            println!("  ... {} more", output.employees.len() - args.preview);
        }
    }

    Ok(())
}

pub(crate) fn display_column(column: Option<&str>) -> ColoredString {
    match column {
        Some(c) => c.green(),
        None => "(none)".dimmed(),
    }
}
