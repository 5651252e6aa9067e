//! Command-line interface

pub mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::{Config, token_from_env};
use crate::session::Session;
use commands::export::{ExportArgs, handle_export_command};
use commands::generate::{GenerateArgs, handle_generate_command};
use commands::inspect::{InspectArgs, handle_inspect_command};
use commands::login::{LoginArgs, handle_login_command};
use commands::roster::{RosterCommand, handle_roster_command};

#[derive(Parser, Debug)]
#[command(name = "schedule-cli")]
#[command(about = "Build driver rosters and generate monthly schedules")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (default: ~/.config/schedule-cli/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Scheduling service base URL (overrides config and SCHEDULE_API_BASE)
    #[arg(long, global = true, value_name = "URL")]
    pub api_base: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show headers, row count and inferred columns of a CSV file
    Inspect(InspectArgs),
    /// Build and list the reconciled roster
    Roster(RosterCommand),
    /// Obtain a bearer token from the scheduling service
    Login(LoginArgs),
    /// Generate a schedule and export it to Excel
    Generate(GenerateArgs),
    /// Export a saved schedule JSON to Excel
    Export(ExportArgs),
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(api_base) = &self.api_base {
            config.set_api_base(api_base);
        }
        Ok(config)
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = cli.load_config()?;
    log::debug!("API base: {}", config.api_base.as_deref().unwrap_or("(unset)"));

    match cli.command {
        Commands::Inspect(args) => handle_inspect_command(args).await,
        Commands::Roster(args) => {
            let mut session = Session::new(config, None);
            handle_roster_command(args, &mut session).await
        }
        Commands::Login(args) => handle_login_command(args, &config).await,
        Commands::Generate(args) => {
            let mut session = Session::new(config, token_from_env());
            handle_generate_command(args, &mut session).await
        }
        Commands::Export(args) => handle_export_command(args, &config).await,
    }
}
