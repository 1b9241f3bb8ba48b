//! `shop units` command - Fleet unit listing and registration

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{api_client, load_config, resolve_format};
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::store::{QueryState, Store};
use crate::core::Transport;
use crate::entities::UnitType;
use crate::views::catalog::{self, UnitRow};
use crate::views::form::UnitDraft;
use crate::views::ViewState;

#[derive(Subcommand, Debug)]
pub enum UnitsCommands {
    /// List units
    List,

    /// Register a new unit
    New(NewArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Unit number as painted on the vehicle (e.g. T-104)
    #[arg(long, short = 'n')]
    pub number: Option<String>,

    /// Unit type
    #[arg(long, short = 't', default_value = "truck")]
    pub r#type: String,

    /// Current odometer in km
    #[arg(long)]
    pub odometer: Option<u64>,

    /// Interactive mode (prompt for fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

pub const UNIT_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("unit", "UNIT #", 14),
    ColumnDef::new("type", "TYPE", 8),
    ColumnDef::new("odometer", "ODOMETER", 14),
    ColumnDef::new("status", "STATUS", 14),
];

/// Run a units subcommand
pub fn run(cmd: UnitsCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        UnitsCommands::List => run_list(global),
        UnitsCommands::New(args) => run_new(args, global),
    }
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let client = api_client(global, &config)?;
    let mut store = Store::new(&client);
    let format = resolve_format(global, &config, OutputFormat::Tsv);
    print_units(&mut store, format, global.quiet)
}

/// Print the units page; a failed load is an error
pub fn print_units<T: Transport>(store: &mut Store<'_, T>, format: OutputFormat, quiet: bool) -> Result<()> {
    let state = store.units();
    match format {
        OutputFormat::Json | OutputFormat::Yaml => {
            let units = match state {
                QueryState::Ready(units) => units,
                _ => return Err(miette::miette!("{}", catalog::units(state).message().unwrap_or_default())),
            };
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(units).into_diagnostic()?);
            } else {
                print!("{}", serde_yml::to_string(units).into_diagnostic()?);
            }
            Ok(())
        }
        _ => render_rows(catalog::units(state), format, quiet),
    }
}

fn render_rows(view: ViewState<UnitRow>, format: OutputFormat, quiet: bool) -> Result<()> {
    match view {
        ViewState::Failed(message) => Err(miette::miette!("{}", message)),
        ViewState::Ready(rows) => {
            let config = if quiet { TableConfig::for_pipe() } else { TableConfig::default() };
            TableFormatter::new(UNIT_COLUMNS, "unit", "ID")
                .with_config(config)
                .output(rows.iter().map(unit_to_row), format);
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

fn unit_to_row(unit: &UnitRow) -> TableRow {
    TableRow::new(unit.id.to_string())
        .cell("unit", CellValue::Text(unit.unit_number.clone()))
        .cell("type", CellValue::Text(unit.unit_type.clone()))
        .cell("odometer", CellValue::Text(unit.odometer.clone()))
        .cell("status", CellValue::Text(unit.status.clone()))
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);

    // Without a terminal a missing number fails validation instead of prompting
    let interactive = args.interactive || (args.number.is_none() && console::user_attended());

    let mut draft = if interactive {
        use dialoguer::{Input, Select};

        let unit_number: String = Input::new()
            .with_prompt("Unit number")
            .interact_text()
            .into_diagnostic()?;

        let type_options = ["truck", "reefer"];
        let type_idx = Select::new()
            .with_prompt("Type")
            .items(&type_options)
            .default(0)
            .interact()
            .into_diagnostic()?;

        let odometer: String = Input::new()
            .with_prompt("Odometer (km, blank to skip)")
            .allow_empty(true)
            .interact_text()
            .into_diagnostic()?;
        let odometer = match odometer.trim() {
            "" => None,
            raw => Some(raw.parse::<u64>().map_err(|e| miette::miette!("Invalid odometer '{}': {}", raw, e))?),
        };

        UnitDraft {
            unit_number,
            unit_type: type_options[type_idx]
                .parse::<UnitType>()
                .map_err(|e| miette::miette!("{}", e))?,
            odometer,
        }
    } else {
        UnitDraft {
            unit_number: args.number.unwrap_or_default(),
            unit_type: args.r#type.parse::<UnitType>().map_err(|e| miette::miette!("{}", e))?,
            odometer: args.odometer,
        }
    };

    // Validate before touching the network
    let body = draft.validate().map_err(|e| miette::miette!("{}", e))?;

    let client = api_client(global, &config)?;
    let mut store = Store::new(&client);
    draft.submit(&mut store).map_err(|e| miette::miette!("{}", e))?;

    if !global.quiet {
        println!(
            "{} Created unit {} ({})",
            style("✓").green(),
            style(&body.unit_number).cyan(),
            body.unit_type
        );
    }
    Ok(())
}
