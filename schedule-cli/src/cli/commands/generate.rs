//! `generate` - import, validate, submit and export in one go

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::*;

use super::roster::{RosterArgs, print_roster};
use crate::export::shaper::cell_text;
use crate::roster::TypeFilter;
use crate::schedule::SchedulePayload;
use crate::schedule::rules::{ScheduleRules, normalize_month};
use crate::session::Session;

/// Rule overrides on top of the configured defaults
#[derive(Args, Debug, Default)]
pub struct RuleArgs {
    /// Schedule year (default: current year)
    #[arg(long)]
    pub year: Option<i32>,

    /// Schedule month as a name, abbreviation or number (default: current month)
    #[arg(long)]
    pub month: Option<String>,

    /// First day of the schedule within the month
    #[arg(long)]
    pub start_day: Option<u32>,

    /// Public holidays as YYYY-MM-DD, comma separated or repeated
    #[arg(long = "holiday", value_name = "DATES")]
    pub holidays: Vec<String>,

    /// File with one holiday per line
    #[arg(long, value_name = "FILE")]
    pub holidays_file: Option<PathBuf>,

    /// Holiday to drop after the file and flags are merged (repeatable)
    #[arg(long = "skip-holiday", value_name = "DATE")]
    pub skip_holidays: Vec<String>,

    /// Weekday to exclude from scheduling (repeatable)
    #[arg(long = "exclude-weekday", value_name = "DAY")]
    pub exclude_weekdays: Vec<String>,

    /// Weekday to schedule even if excluded by default (repeatable)
    #[arg(long = "include-weekday", value_name = "DAY")]
    pub include_weekdays: Vec<String>,

    #[arg(long)]
    pub local_off_days: Option<u32>,

    #[arg(long)]
    pub overseas_off_days: Option<u32>,

    /// Maximum share of drivers off on the same day (0-1)
    #[arg(long = "cap")]
    pub driver_percentage_cap: Option<f64>,
}

impl RuleArgs {
    pub async fn apply(&self, rules: &mut ScheduleRules) -> Result<()> {
        if let Some(year) = self.year {
            rules.year = year;
        }
        if let Some(month) = &self.month {
            rules.month = normalize_month(month)
                .map(str::to_string)
                .unwrap_or_else(|| month.trim().to_lowercase());
        }
        if let Some(day) = self.start_day {
            rules.start_day = day;
        }
        if let Some(days) = self.local_off_days {
            rules.local_off_days = days;
        }
        if let Some(days) = self.overseas_off_days {
            rules.overseas_off_days = days;
        }
        if let Some(cap) = self.driver_percentage_cap {
            rules.driver_percentage_cap = cap;
        }

        for text in &self.holidays {
            rules.add_holidays_from_text(text);
        }
        if let Some(path) = &self.holidays_file {
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read holidays file: {}", path.display()))?;
            rules.add_holidays_from_text(&text);
        }
        for date in &self.skip_holidays {
            rules.remove_holiday(date);
        }

        for day in &self.exclude_weekdays {
            if !rules.exclude_weekday(day) {
                anyhow::bail!("Unknown weekday: {}", day);
            }
        }
        for day in &self.include_weekdays {
            rules.include_weekday(day);
        }

        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub roster: RosterArgs,

    #[command(flatten)]
    pub rules: RuleArgs,

    /// Bearer token (default: SCHEDULE_TOKEN)
    #[arg(long)]
    pub token: Option<String>,

    /// Workbook path (default: export directory, named by month)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Open the workbook after export
    #[arg(long)]
    pub open: bool,

    /// Also save the raw schedule JSON
    #[arg(long, value_name = "FILE")]
    pub save_payload: Option<PathBuf>,

    /// Skip writing the workbook
    #[arg(long)]
    pub no_export: bool,
}

pub async fn handle_generate_command(args: GenerateArgs, session: &mut Session) -> Result<()> {
    if let Some(token) = args.token.clone() {
        session.set_token(Some(token));
    }

    args.roster.apply(session).await?;
    args.rules.apply(&mut session.rules).await?;

    println!();
    print_roster(&session.roster, TypeFilter::All, "");
    println!();
    println!(
        "Generating schedule for {} {}...",
        session.rules.month.cyan(),
        session.rules.year.to_string().cyan()
    );

    let payload = session.generate().await?.clone();
    print_schedule_summary(&payload);

    if let Some(path) = &args.save_payload {
        let json = serde_json::to_string_pretty(&payload).context("Failed to serialize schedule")?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write schedule JSON: {}", path.display()))?;
        println!("Saved schedule JSON to {}", path.display().to_string().cyan());
    }

    if !args.no_export {
        let path = session.export(args.out.as_deref(), args.open).await?;
        println!("Exported workbook to {}", path.display().to_string().green().bold());
    }

    Ok(())
}

/// Print generation metadata and the issue list
pub fn print_schedule_summary(payload: &SchedulePayload) {
    let meta = &payload.meta;
    let dash = || "-".to_string();

    println!("{}", "Result".bold());
    println!(
        "  Generated at:    {}",
        meta.generated_at_utc.clone().unwrap_or_else(dash)
    );
    println!(
        "  Drivers:         {}",
        meta.counts
            .as_ref()
            .and_then(|c| c.drivers)
            .map(|d| d.to_string())
            .unwrap_or_else(dash)
    );
    println!(
        "  Cap per day:     {}",
        meta.cap_per_day_used
            .as_ref()
            .map(cell_text)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(dash)
    );

    println!();
    if payload.issues.is_empty() {
        println!("{}", "No issues detected.".green());
    } else {
        println!("{}", format!("Issues ({})", payload.issues.len()).yellow().bold());
        for issue in &payload.issues {
            println!("  - {}", issue);
        }
    }
}
