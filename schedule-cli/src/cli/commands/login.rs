//! `login` - exchange credentials for a bearer token

use anyhow::{Context, Result};
use clap::Args;
use colored::*;

use crate::config::{Config, ENV_TOKEN};
use crate::schedule::{ScheduleClient, ServiceError};

#[derive(Args, Debug)]
pub struct LoginArgs {
    #[arg(short, long)]
    pub username: String,

    /// Password (prompted for when omitted)
    #[arg(short, long)]
    pub password: Option<String>,
}

pub async fn handle_login_command(args: LoginArgs, config: &Config) -> Result<()> {
    let api_base = config.api_base.as_deref().ok_or(ServiceError::MissingApiBase)?;
    let client = ScheduleClient::new(api_base, config.timeout())?;

    let password = match args.password {
        Some(password) => password,
        None => rpassword::prompt_password(format!("Password for {}: ", args.username))
            .context("Failed to read password")?,
    };

    if args.username.trim().is_empty() || password.is_empty() {
        anyhow::bail!("Username and password are required");
    }

    log::info!("Logging in to {} as {}", client.base_url(), args.username);
    let token = client.login(args.username.trim(), &password).await?;

    eprintln!("{}", "Login successful".green().bold());
    eprintln!(
        "Pass it with --token or export it as {} for later commands:",
        ENV_TOKEN.cyan()
    );
    println!("{}", token);
    Ok(())
}
