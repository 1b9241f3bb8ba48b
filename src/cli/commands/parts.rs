//! `shop parts` command - Parts catalog search

use clap::Subcommand;
use console::style;
use miette::Result;
use std::time::Instant;

use crate::cli::helpers::{api_client, find_work_order, load_config, resolve_format};
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::store::Store;
use crate::core::Transport;
use crate::views::panels::{attach_label, PartRow, PartsPanel};
use crate::views::ViewState;

#[derive(Subcommand, Debug)]
pub enum PartsCommands {
    /// Search the parts catalog by number or name
    Search(SearchArgs),
}

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Search text (blank shows nothing)
    #[arg(default_value = "")]
    pub query: String,

    /// Show whether parts can be attached to this work order
    #[arg(long)]
    pub wo: Option<String>,
}

pub const PART_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("number", "PART #", 14),
    ColumnDef::new("name", "NAME", 30),
    ColumnDef::new("stock", "STOCK", 7),
    ColumnDef::new("cost", "COST", 10),
];

/// Run a parts subcommand
pub fn run(cmd: PartsCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        PartsCommands::Search(args) => {
            let config = load_config(global);
            let client = api_client(global, &config)?;
            let mut store = Store::new(&client);
            let format = resolve_format(global, &config, OutputFormat::Tsv);

            if let Some(reference) = args.wo.as_deref() {
                let wo = find_work_order(&mut store, reference)?;
                if !global.quiet {
                    println!(
                        "{} {}: {}",
                        style(wo.number()).cyan(),
                        wo.lifecycle_status(),
                        attach_label(wo.lifecycle_status())
                    );
                }
            }

            let mut panel = PartsPanel::new();
            search(&mut panel, &store, &args.query);
            print_parts(&panel, format, global.quiet)
        }
    }
}

/// Type the whole query and press Enter; a blank query sends nothing
pub fn search<T: Transport>(panel: &mut PartsPanel, store: &Store<'_, T>, query: &str) -> bool {
    panel.set_query(query, Instant::now());
    panel.submit(store)
}

/// Print the panel's results; a failed search is an error
pub fn print_parts(panel: &PartsPanel, format: OutputFormat, quiet: bool) -> Result<()> {
    match panel.results() {
        ViewState::Failed(message) => Err(miette::miette!("{}", message)),
        ViewState::Ready(rows) => {
            let config = if quiet { TableConfig::for_pipe() } else { TableConfig::default() };
            TableFormatter::new(PART_COLUMNS, "part", "ID")
                .with_config(config)
                .output(rows.iter().map(part_to_row), format);
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

fn part_to_row(part: &PartRow) -> TableRow {
    TableRow::new(part.id.to_string())
        .cell("number", CellValue::Text(part.part_number.clone()))
        .cell("name", CellValue::Text(part.part_name.clone()))
        .cell("stock", CellValue::Number(part.stock_qty))
        .cell("cost", CellValue::Text(part.cost.clone()))
}
