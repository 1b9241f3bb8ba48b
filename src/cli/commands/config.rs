//! `shop config` command - Configuration management
//!
//! Values live in a single user config file; environment variables and
//! command-line flags override it per invocation.

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::GlobalOpts;
use crate::core::config::{typed_value, VALID_KEYS};
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration values
    Show(ShowArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// Unset (remove) a configuration value
    Unset(UnsetArgs),

    /// Show the path to the configuration file
    Path,

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,

    /// Show the file contents instead of the effective values
    #[arg(long = "file")]
    pub file: bool,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Configuration key (e.g., api_url, mechanic_id)
    pub key: String,

    /// Value to set
    pub value: String,
}

#[derive(clap::Args, Debug)]
pub struct UnsetArgs {
    /// Configuration key to remove
    pub key: String,
}

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args, global),
        ConfigCommands::Set(args) => run_set(args, global),
        ConfigCommands::Unset(args) => run_unset(args, global),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let config = crate::cli::helpers::load_config(global);

    if let Some(key) = &args.key {
        return match config.get(key).map_err(|e| miette::miette!("{}", e))? {
            Some(v) => {
                println!("{}", v);
                Ok(())
            }
            None => Err(miette::miette!("Key '{}' is not set", key)),
        };
    }

    if args.file {
        let path = config_path()?;
        println!("{} {}", style("Config file:").bold(), style(path.display()).dim());
        println!();
        if path.exists() {
            print!("{}", fs::read_to_string(&path).into_diagnostic()?);
        } else {
            println!("{}", style("(not created)").dim());
        }
        return Ok(());
    }

    println!("{}", style("Effective Configuration").bold().underlined());
    println!();
    for (key, _) in VALID_KEYS {
        let value = config.get(key).map_err(|e| miette::miette!("{}", e))?;
        print_config_value(key, value.as_deref());
    }

    println!();
    println!("{}", style("Config Sources (in priority order):").dim());
    println!("  1. Command-line flags (--api-url, --mechanic)");
    println!("  2. Environment variables (SHOP_API_URL, SHOP_MECHANIC_ID, SHOP_AUTHOR, SHOP_TIMEOUT_SECS)");
    println!("  3. Config file (shop config path)");

    Ok(())
}

fn run_set(args: SetArgs, global: &GlobalOpts) -> Result<()> {
    let value = typed_value(&args.key, &args.value).map_err(|e| miette::miette!("{}", e))?;

    let path = config_path()?;
    let mut config_map = read_mapping(&path)?;
    config_map.insert(serde_yml::Value::String(args.key.clone()), value);
    write_mapping(&path, &config_map)?;

    if !global.quiet {
        println!(
            "{} Set {} {} {}",
            style("✓").green(),
            style(&args.key).cyan(),
            style("→").dim(),
            style(&args.value).yellow(),
        );
    }
    Ok(())
}

fn run_unset(args: UnsetArgs, global: &GlobalOpts) -> Result<()> {
    let path = config_path()?;
    if !path.exists() {
        return Err(miette::miette!(
            "Config file does not exist: {}",
            path.display()
        ));
    }

    let mut config_map = read_mapping(&path)?;
    if config_map.remove(args.key.as_str()).is_none() {
        return Err(miette::miette!("Key '{}' not found in config", args.key));
    }
    write_mapping(&path, &config_map)?;

    if !global.quiet {
        println!("{} Removed {}", style("✓").green(), style(&args.key).cyan());
    }
    Ok(())
}

fn run_path() -> Result<()> {
    let path = config_path()?;
    println!("{}", path.display());
    Ok(())
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();

    for (key, description) in VALID_KEYS {
        println!("  {:<20} {}", style(key).cyan(), style(description).dim());
    }

    println!();
    println!(
        "{}",
        style("Use 'shop config set <key> <value>' to set a value.").dim()
    );
    Ok(())
}

// Helper functions

fn config_path() -> Result<PathBuf> {
    Config::global_config_path()
        .ok_or_else(|| miette::miette!("Could not determine config directory"))
}

fn read_mapping(path: &Path) -> Result<serde_yml::Mapping> {
    if !path.exists() {
        return Ok(serde_yml::Mapping::new());
    }
    let content = fs::read_to_string(path).into_diagnostic()?;
    match serde_yml::from_str::<serde_yml::Value>(&content) {
        Ok(serde_yml::Value::Mapping(map)) => Ok(map),
        Ok(serde_yml::Value::Null) => Ok(serde_yml::Mapping::new()),
        Ok(_) => Err(miette::miette!("{} is not a YAML mapping", path.display())),
        Err(e) => Err(miette::miette!("Failed to parse {}: {}", path.display(), e)),
    }
}

fn write_mapping(path: &Path, map: &serde_yml::Mapping) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).into_diagnostic()?;
    }
    let yaml = serde_yml::to_string(map).into_diagnostic()?;
    fs::write(path, yaml).into_diagnostic()?;
    tracing::debug!(path = %path.display(), "config written");
    Ok(())
}

fn print_config_value(key: &str, value: Option<&str>) {
    if let Some(v) = value {
        println!("  {}: {}", style(key).cyan(), style(v).yellow());
    } else {
        println!("  {}: {}", style(key).cyan(), style("(not set)").dim());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_mapping_roundtrip_keeps_types() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.yaml");

        let mut map = read_mapping(&path).unwrap();
        assert!(map.is_empty());
        map.insert(
            serde_yml::Value::String("mechanic_id".to_string()),
            typed_value("mechanic_id", "3").unwrap(),
        );
        write_mapping(&path, &map).unwrap();

        let config: Config = serde_yml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(config.mechanic_id, Some(3));
    }

    #[test]
    fn test_read_mapping_rejects_scalar() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        fs::write(&path, "just a string").unwrap();
        assert!(read_mapping(&path).is_err());

        fs::write(&path, "").unwrap();
        assert!(read_mapping(&path).unwrap().is_empty());
    }
}
