//! `shop mechanics` command - Mechanic roster

use clap::Subcommand;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{api_client, load_config, resolve_format};
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::store::{QueryState, Store};
use crate::core::Transport;
use crate::views::catalog::{self, MechanicRow};
use crate::views::ViewState;

#[derive(Subcommand, Debug)]
pub enum MechanicsCommands {
    /// List mechanics
    List,
}

pub const MECHANIC_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("name", "NAME", 24),
    ColumnDef::new("email", "EMAIL", 28),
    ColumnDef::new("status", "STATUS", 12),
    ColumnDef::new("rate", "RATE", 10),
];

/// Run a mechanics subcommand
pub fn run(cmd: MechanicsCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        MechanicsCommands::List => {
            let config = load_config(global);
            let client = api_client(global, &config)?;
            let mut store = Store::new(&client);
            let format = resolve_format(global, &config, OutputFormat::Tsv);
            print_mechanics(&mut store, format, global.quiet)
        }
    }
}

/// Print the mechanics page; a failed load is an error
pub fn print_mechanics<T: Transport>(
    store: &mut Store<'_, T>,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let state = store.mechanics();
    if matches!(format, OutputFormat::Json | OutputFormat::Yaml) {
        let QueryState::Ready(mechanics) = state else {
            return Err(miette::miette!(
                "{}",
                catalog::mechanics(state).message().unwrap_or_default()
            ));
        };
        if format == OutputFormat::Json {
            println!("{}", serde_json::to_string_pretty(mechanics).into_diagnostic()?);
        } else {
            print!("{}", serde_yml::to_string(mechanics).into_diagnostic()?);
        }
        return Ok(());
    }

    match catalog::mechanics(state) {
        ViewState::Failed(message) => Err(miette::miette!("{}", message)),
        ViewState::Ready(rows) => {
            let config = if quiet { TableConfig::for_pipe() } else { TableConfig::default() };
            TableFormatter::new(MECHANIC_COLUMNS, "mechanic", "ID")
                .with_config(config)
                .output(rows.iter().map(mechanic_to_row), format);
            Ok(())
        }
        other => {
            if format != OutputFormat::Id {
                println!("{}", other.message().unwrap_or_default());
            }
            Ok(())
        }
    }
}

fn mechanic_to_row(mechanic: &MechanicRow) -> TableRow {
    TableRow::new(mechanic.id.to_string())
        .cell("name", CellValue::Text(mechanic.name.clone()))
        .cell("email", CellValue::Text(mechanic.email.clone()))
        .cell("status", CellValue::Text(mechanic.status.clone()))
        .cell("rate", CellValue::Money(mechanic.hourly_rate))
}
