//! `roster` - build the reconciled roster from CSV files and manual edits

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::*;

use crate::roster::{EmployeeType, Roster, TypeFilter};
use crate::session::{ColumnOverrides, Session};

/// Roster inputs shared by `roster` and `generate`
#[derive(Args, Debug, Default)]
pub struct RosterArgs {
    /// CSV files to import, merged in order
    pub csv: Vec<PathBuf>,

    /// Column holding employee names (default: inferred)
    #[arg(long)]
    pub name_col: Option<String>,

    /// Column holding civil ids (default: inferred)
    #[arg(long)]
    pub civil_col: Option<String>,

    /// Column holding local/overseas origin (default: inferred)
    #[arg(long)]
    pub origin_col: Option<String>,

    /// Add an employee by hand, as NAME or NAME:CIVIL_ID
    #[arg(long = "add", value_name = "NAME[:CIVIL]", value_parser = parse_manual_employee)]
    pub add: Vec<(String, String)>,

    /// Set an employee's civil id, as NAME=CIVIL_ID
    #[arg(long = "set-civil", value_name = "NAME=CIVIL", value_parser = parse_civil_assignment)]
    pub set_civil: Vec<(String, String)>,

    /// Set an employee's type, as NAME=local or NAME=overseas
    #[arg(long = "set-type", value_name = "NAME=TYPE", value_parser = parse_type_assignment)]
    pub set_type: Vec<(String, EmployeeType)>,

    /// Mark every employee as local
    #[arg(long, conflicts_with = "all_overseas")]
    pub all_local: bool,

    /// Mark every employee as overseas
    #[arg(long)]
    pub all_overseas: bool,

    /// Remove an employee by name
    #[arg(long = "remove", value_name = "NAME")]
    pub remove: Vec<String>,
}

impl RosterArgs {
    pub fn columns(&self) -> ColumnOverrides {
        ColumnOverrides {
            name: self.name_col.clone(),
            civil_id: self.civil_col.clone(),
            origin: self.origin_col.clone(),
        }
    }

    /// Import every CSV into the session, then apply manual edits in a fixed
    /// order: add, civil ids, bulk type, single types, removals
    pub async fn apply(&self, session: &mut Session) -> Result<()> {
        let columns = self.columns();
        for path in &self.csv {
            let stats = session.import_csv(path, &columns).await?;
            println!(
                "Imported {}: {} new, {} civil id(s) filled, {} type(s) applied",
                path.display().to_string().cyan(),
                stats.added,
                stats.civil_ids_filled,
                stats.types_applied
            );
        }

        self.apply_edits(&mut session.roster);
        Ok(())
    }

    fn apply_edits(&self, roster: &mut Roster) {
        for (name, civil_id) in &self.add {
            if !roster.add_manual(name, civil_id) {
                log::debug!("'{}' already in roster, merged", name);
            }
        }

        for (name, civil_id) in &self.set_civil {
            if !roster.set_civil_id(name, civil_id) {
                log::warn!("Cannot set civil id: '{}' is not in the roster", name);
            }
        }

        if self.all_local {
            roster.set_all(EmployeeType::Local);
        } else if self.all_overseas {
            roster.set_all(EmployeeType::Overseas);
        }

        for (name, kind) in &self.set_type {
            if !roster.set_type(name, *kind) {
                log::warn!("Cannot set type: '{}' is not in the roster", name);
            }
        }

        for name in &self.remove {
            if !roster.remove(name) {
                log::warn!("Cannot remove: '{}' is not in the roster", name);
            }
        }
    }
}

#[derive(Args, Debug)]
pub struct RosterCommand {
    #[command(flatten)]
    pub roster: RosterArgs,

    /// Only list employees of this type
    #[arg(long, value_enum, default_value_t = TypeFilter::All)]
    pub filter: TypeFilter,

    /// Only list employees whose name or civil id contains this text
    #[arg(long, default_value = "")]
    pub search: String,
}

pub async fn handle_roster_command(args: RosterCommand, session: &mut Session) -> Result<()> {
    args.roster.apply(session).await?;

    println!();
    print_roster(&session.roster, args.filter, &args.search);
    Ok(())
}

pub fn print_roster(roster: &Roster, filter: TypeFilter, search: &str) {
    let counts = roster.counts();
    println!(
        "{} employees ({} local, {} overseas)",
        counts.all.to_string().bold(),
        counts.local,
        counts.overseas
    );

    let listed = roster.filter(filter, search);
    if listed.is_empty() {
        println!("{}", "No employees match.".dimmed());
        return;
    }

    println!();
    println!("{:<30} {:<16} {}", "Name".bold(), "Civil ID".bold(), "Type".bold());
    for employee in listed {
        let civil_id = if employee.has_civil_id() {
            employee.civil_id.normal()
        } else {
            "missing".red()
        };
        let kind = match roster.type_of(&employee.name) {
            EmployeeType::Local => "local".green(),
            EmployeeType::Overseas => "overseas".yellow(),
        };
        println!("{:<30} {:<16} {}", employee.name, civil_id, kind);
    }

    let missing = roster.missing_civil_ids().len();
    if missing > 0 {
        println!();
        println!(
            "{}",
            format!("{} employee(s) missing Civil ID", missing).red()
        );
    }
}

fn parse_manual_employee(s: &str) -> Result<(String, String), String> {
    let (name, civil_id) = s.split_once(':').unwrap_or((s, ""));
    let name = name.trim();
    if name.is_empty() {
        return Err("employee name must not be empty".to_string());
    }
    Ok((name.to_string(), civil_id.trim().to_string()))
}

fn parse_civil_assignment(s: &str) -> Result<(String, String), String> {
    let (name, civil_id) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=CIVIL_ID, got '{}'", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err("employee name must not be empty".to_string());
    }
    Ok((name.to_string(), civil_id.trim().to_string()))
}

fn parse_type_assignment(s: &str) -> Result<(String, EmployeeType), String> {
    let (name, kind) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=TYPE, got '{}'", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err("employee name must not be empty".to_string());
    }
    Ok((name.to_string(), kind.parse()?))
}
