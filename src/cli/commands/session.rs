//! `shop login` / `shop logout` / `shop whoami` - Session token management

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::load_config;
use crate::cli::GlobalOpts;
use crate::core::session::{Session, SessionStore};

#[derive(clap::Args, Debug)]
pub struct LoginArgs {
    /// Bearer token (prompted when omitted)
    pub token: Option<String>,
}

fn store() -> Result<SessionStore> {
    SessionStore::default_location().map_err(|e| miette::miette!("{}", e))
}

pub fn run_login(args: LoginArgs, global: &GlobalOpts) -> Result<()> {
    let token = match args.token {
        Some(token) => token,
        None => dialoguer::Password::new()
            .with_prompt("Token")
            .interact()
            .into_diagnostic()?,
    };
    let session = Session::with_token(token).map_err(|e| miette::miette!("{}", e))?;

    let store = store()?;
    store.save(&session).map_err(|e| miette::miette!("{}", e))?;

    if !global.quiet {
        println!(
            "{} Token saved to {}",
            style("✓").green(),
            style(store.path().display()).dim()
        );
    }
    Ok(())
}

pub fn run_logout(global: &GlobalOpts) -> Result<()> {
    let removed = store()?.clear().map_err(|e| miette::miette!("{}", e))?;
    if !global.quiet {
        if removed {
            println!("{} Logged out", style("✓").green());
        } else {
            println!("{}", style("No stored session").dim());
        }
    }
    Ok(())
}

/// Show the effective API URL, mechanic and whether a token is present
pub fn run_whoami(global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let session = match global.token.as_deref() {
        Some(token) => Session::with_token(token).map_err(|e| miette::miette!("{}", e))?,
        None => store()?.load().map_err(|e| miette::miette!("{}", e))?,
    };

    let api_url = config.api_url().ok();
    print_field("api_url", api_url.as_deref());
    print_field(
        "mechanic_id",
        config.mechanic_id.map(|m| m.to_string()).as_deref(),
    );
    print_field("author", Some(&config.author()));
    println!(
        "  {}: {}",
        style("token").cyan(),
        if session.is_authenticated() {
            style("present").green()
        } else {
            style("none").dim()
        }
    );
    Ok(())
}

fn print_field(key: &str, value: Option<&str>) {
    match value {
        Some(v) => println!("  {}: {}", style(key).cyan(), style(v).yellow()),
        None => println!("  {}: {}", style(key).cyan(), style("(not set)").dim()),
    }
}
