//! `export` - turn a saved schedule JSON into a workbook

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::*;

use super::generate::print_schedule_summary;
use crate::config::Config;
use crate::schedule::SchedulePayload;
use crate::session::export_payload;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Schedule JSON saved with `generate --save-payload`
    pub payload: PathBuf,

    /// Workbook path (default: export directory, named by month)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Open the workbook after export
    #[arg(long)]
    pub open: bool,
}

pub async fn handle_export_command(args: ExportArgs, config: &Config) -> Result<()> {
    let text = tokio::fs::read_to_string(&args.payload)
        .await
        .with_context(|| format!("Failed to read schedule file: {}", args.payload.display()))?;
    let payload: SchedulePayload = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse schedule file: {}", args.payload.display()))?;

    print_schedule_summary(&payload);

    let path = export_payload(config, &payload, args.out.as_deref(), args.open).await?;
    println!();
    println!("Exported workbook to {}", path.display().to_string().green().bold());
    Ok(())
}
