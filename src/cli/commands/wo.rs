//! `shop wo` command - Work order management
//!
//! Listing by status tab, creation, detail panels (notes, parts, timeline,
//! summary) and the lifecycle actions assign/start/pause/resume/complete.

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{api_client, find_work_order, lifecycle, load_config, resolve_format};
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::lifecycle::{
    parse_odometer, Action, Lifecycle, LifecycleError, TransitionInput, SUGGESTED_PAUSE_REASON,
};
use crate::core::store::{QueryState, Store};
use crate::core::Transport;
use crate::entities::{Bay, Category, Priority, Unit, UnitId, WorkOrder};
use crate::views::form::{FormError, NoteDraft, WorkOrderDraft};
use crate::views::panels::{self, attach_label, PartsError};
use crate::views::work_orders::{self, unit_index, Tab, WorkOrderRow};
use crate::views::{ViewState, DASH};

#[derive(Subcommand, Debug)]
pub enum WoCommands {
    /// List work orders in a status tab
    List(ListArgs),

    /// Create a new work order
    New(NewArgs),

    /// Show a work order with its summary
    Show(RefArgs),

    /// List notes on a work order
    Notes(RefArgs),

    /// Add a note to a work order
    Note(NoteArgs),

    /// Attach a part to an in-progress work order
    Attach(AttachArgs),

    /// Show a work order's event timeline
    Timeline(RefArgs),

    /// Show parts, labor and notes totals for a work order
    Summary(RefArgs),

    /// Assign a pending work order to the current mechanic
    Assign(RefArgs),

    /// Start work on a pending work order
    Start(StartArgs),

    /// Put an in-progress work order on hold
    Pause(PauseArgs),

    /// Resume an on-hold work order
    Resume(RefArgs),

    /// Complete an in-progress work order
    Complete(RefArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Status tab to show
    #[arg(long, short = 't', default_value = "pending")]
    pub tab: Tab,

    /// Wrap text columns at this width instead of truncating
    #[arg(long, short = 'w')]
    pub wrap: Option<usize>,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Unit id or unit number (e.g. 7 or T-104)
    #[arg(long, short = 'u')]
    pub unit: Option<String>,

    /// Short title (required)
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// Driver complaint / problem description (required)
    #[arg(long, short = 'c')]
    pub complaint: Option<String>,

    /// Priority
    #[arg(long, short = 'p', default_value = "medium")]
    pub priority: String,

    /// Category (PM, Brakes, Engine, Electrical, Tires, Body, Other)
    #[arg(long, default_value = "Other")]
    pub category: String,

    /// Service bay (A-L)
    #[arg(long, short = 'b')]
    pub bay: Option<String>,

    /// Interactive mode (prompt for fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct RefArgs {
    /// Work order number (42 or WO-00042)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct NoteArgs {
    /// Work order number (42 or WO-00042)
    pub id: String,

    /// Note text (prompted when omitted)
    pub text: Option<String>,

    /// Author recorded on the note (default: configured author)
    #[arg(long)]
    pub author: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct AttachArgs {
    /// Work order number (42 or WO-00042)
    pub id: String,

    /// Part id from `shop parts search`
    #[arg(long)]
    pub part: i64,

    /// Quantity
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub qty: u32,
}

#[derive(clap::Args, Debug)]
pub struct StartArgs {
    /// Work order number (42 or WO-00042)
    pub id: String,

    /// Odometer reading in km (prompted when omitted)
    #[arg(long)]
    pub odometer: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct PauseArgs {
    /// Work order number (42 or WO-00042)
    pub id: String,

    /// Hold reason (blank sends "Pause")
    #[arg(long, short = 'r')]
    pub reason: Option<String>,
}

pub const WO_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("unit", "UNIT", 10),
    ColumnDef::new("title", "TITLE", 26),
    ColumnDef::new("complaint", "COMPLAINT", 34),
    ColumnDef::new("priority", "PRIORITY", 10),
    ColumnDef::new("status", "STATUS", 12),
    ColumnDef::new("bay", "BAY", 5),
    ColumnDef::new("opened", "OPENED", 18),
    ColumnDef::new("actions", "ACTIONS", 18),
];

/// Run a work order subcommand
pub fn run(cmd: WoCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        // Creation validates locally before any client is built
        WoCommands::New(args) => run_new(args, global),
        other => run_against_api(other, global),
    }
}

fn run_against_api(cmd: WoCommands, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let lifecycle = lifecycle(&config);
    let client = api_client(global, &config)?;
    let mut store = Store::new(&client);

    match cmd {
        WoCommands::List(args) => {
            let format = resolve_format(global, &config, OutputFormat::Tsv);
            let table = match (args.wrap, global.quiet) {
                (Some(width), _) => TableConfig::with_wrap(width),
                (None, true) => TableConfig::for_pipe(),
                (None, false) => TableConfig::default(),
            };
            print_work_orders(&mut store, args.tab, &lifecycle, format, table)
        }
        WoCommands::New(args) => run_new(args, global),
        WoCommands::Show(args) => {
            let format = resolve_format(global, &config, OutputFormat::Auto);
            run_show(&mut store, &args.id, &lifecycle, format)
        }
        WoCommands::Notes(args) => run_notes(&mut store, &args.id),
        WoCommands::Note(args) => {
            let author = args.author.clone().unwrap_or_else(|| config.author());
            run_note(&mut store, args, &author, global.quiet)
        }
        WoCommands::Attach(args) => run_attach(&mut store, args, global.quiet),
        WoCommands::Timeline(args) => run_timeline(&mut store, &args.id),
        WoCommands::Summary(args) => run_summary(&mut store, &args.id),
        WoCommands::Assign(args) => transition(
            &mut store,
            &lifecycle,
            &args.id,
            Action::Assign,
            || Ok(TransitionInput::Assign),
            global,
        ),
        WoCommands::Start(args) => transition(
            &mut store,
            &lifecycle,
            &args.id,
            Action::Start,
            || prompt_odometer(args.odometer.as_deref()),
            global,
        ),
        WoCommands::Pause(args) => transition(
            &mut store,
            &lifecycle,
            &args.id,
            Action::Pause,
            || prompt_pause_reason(args.reason.as_deref()),
            global,
        ),
        WoCommands::Resume(args) => transition(
            &mut store,
            &lifecycle,
            &args.id,
            Action::Resume,
            || Ok(TransitionInput::Resume),
            global,
        ),
        WoCommands::Complete(args) => transition(
            &mut store,
            &lifecycle,
            &args.id,
            Action::Complete,
            || Ok(TransitionInput::Complete),
            global,
        ),
    }
}

// Listing

/// Print one tab of the work order list; a failed load is an error
pub fn print_work_orders<T: Transport>(
    store: &mut Store<'_, T>,
    tab: Tab,
    lifecycle: &Lifecycle,
    format: OutputFormat,
    table: TableConfig,
) -> Result<()> {
    let view = work_orders_view(store, tab, lifecycle);

    if matches!(format, OutputFormat::Json | OutputFormat::Yaml) {
        let orders: Vec<WorkOrder> = match store.work_orders() {
            QueryState::Ready(list) => list.iter().filter(|wo| tab.contains(wo)).cloned().collect(),
            _ => return Err(miette::miette!("{}", view.message().unwrap_or_default())),
        };
        if format == OutputFormat::Json {
            println!("{}", serde_json::to_string_pretty(&orders).into_diagnostic()?);
        } else {
            print!("{}", serde_yml::to_string(&orders).into_diagnostic()?);
        }
        return Ok(());
    }

    match view {
        ViewState::Failed(message) => Err(miette::miette!("{}", message)),
        ViewState::Ready(rows) => {
            TableFormatter::new(WO_COLUMNS, "work order", "WO")
                .with_config(table)
                .output(rows.iter().map(wo_to_row), format);
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

/// Current rows for a tab, from whatever the store has loaded
pub fn work_orders_view<T: Transport>(
    store: &mut Store<'_, T>,
    tab: Tab,
    lifecycle: &Lifecycle,
) -> ViewState<WorkOrderRow> {
    let units = store.units().clone();
    work_orders::list(store.work_orders(), &units, tab, lifecycle)
}

pub fn wo_to_row(row: &WorkOrderRow) -> TableRow {
    TableRow::new(row.number.clone())
        .cell("unit", CellValue::Text(row.unit.clone()))
        .cell("title", CellValue::Text(row.title.clone()))
        .cell("complaint", CellValue::Text(row.complaint.clone()))
        .cell("priority", CellValue::Priority(row.priority))
        .cell("status", CellValue::Status(row.status))
        .cell("bay", CellValue::Text(row.bay_display()))
        .cell("opened", CellValue::DateTime(row.opened_at))
        .cell("actions", CellValue::Actions(row.actions.clone()))
}

// Creation

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);
    let interactive = args.interactive || (args.title.is_none() && console::user_attended());

    let mut draft = WorkOrderDraft {
        priority: args
            .priority
            .parse::<Priority>()
            .map_err(|e| miette::miette!("{}", e))?,
        category: args
            .category
            .parse::<Category>()
            .map_err(|e| miette::miette!("{}", e))?,
        bay: args
            .bay
            .as_deref()
            .map(str::parse::<Bay>)
            .transpose()
            .map_err(|e| miette::miette!("{}", e))?,
        title: args.title.clone().unwrap_or_default(),
        complaint: args.complaint.clone().unwrap_or_default(),
        unit_id: args.unit.as_deref().and_then(|u| u.trim().parse::<UnitId>().ok()),
    };

    if !interactive {
        // Required fields are checked before any request is made
        if args.unit.is_none() {
            return Err(miette::miette!("{}", FormError::MissingUnit));
        }
        if draft.title.trim().is_empty() {
            return Err(miette::miette!("{}", FormError::MissingTitle));
        }
        if draft.complaint.trim().is_empty() {
            return Err(miette::miette!("{}", FormError::MissingComplaint));
        }
    }

    let client = api_client(global, &config)?;
    let mut store = Store::new(&client);

    if interactive {
        fill_draft_interactive(&mut store, &mut draft)?;
    } else if draft.unit_id.is_none() {
        // Unit given by number rather than id
        let wanted = args.unit.as_deref().unwrap_or_default().trim();
        draft.unit_id = Some(resolve_unit(&mut store, wanted)?);
    }

    let title = draft.title.trim().to_string();
    let created = draft.submit(&mut store).map_err(|e| miette::miette!("{}", e))?;

    if !global.quiet {
        let number = created
            .get("id")
            .and_then(|id| id.as_i64())
            .map(crate::entities::wo_number)
            .unwrap_or_else(|| "work order".to_string());
        println!(
            "{} Created {} {}",
            style("✓").green(),
            style(number).cyan(),
            style(title).white()
        );
    }
    Ok(())
}

fn resolve_unit<T: Transport>(store: &mut Store<'_, T>, wanted: &str) -> Result<UnitId> {
    match store.units() {
        QueryState::Ready(units) => units
            .iter()
            .find(|u| u.unit_number.eq_ignore_ascii_case(wanted))
            .map(|u| u.id)
            .ok_or_else(|| miette::miette!("No unit found matching '{}'", wanted)),
        QueryState::Failed(message) => Err(miette::miette!("Failed to load units: {}", message)),
        QueryState::Idle => Err(miette::miette!("Units are not loaded")),
    }
}

/// Prompt for every field of the creation form, offering units from the API
pub fn fill_draft_interactive<T: Transport>(
    store: &mut Store<'_, T>,
    draft: &mut WorkOrderDraft,
) -> Result<()> {
    use dialoguer::{Input, Select};

    let units: Vec<Unit> = match store.units() {
        QueryState::Ready(units) if !units.is_empty() => units.clone(),
        QueryState::Ready(_) => return Err(miette::miette!("No units found. Create one with 'shop units new'")),
        QueryState::Failed(message) => return Err(miette::miette!("Failed to load units: {}", message)),
        QueryState::Idle => return Err(miette::miette!("Units are not loaded")),
    };
    let unit_labels: Vec<&str> = units.iter().map(|u| u.unit_number.as_str()).collect();
    let default_unit = draft
        .unit_id
        .and_then(|id| units.iter().position(|u| u.id == id))
        .unwrap_or(0);
    let unit_idx = Select::new()
        .with_prompt("Unit")
        .items(&unit_labels)
        .default(default_unit)
        .interact()
        .into_diagnostic()?;
    draft.unit_id = Some(units[unit_idx].id);

    draft.title = Input::new()
        .with_prompt("Title")
        .with_initial_text(draft.title.clone())
        .interact_text()
        .into_diagnostic()?;

    draft.complaint = Input::new()
        .with_prompt("Complaint")
        .with_initial_text(draft.complaint.clone())
        .interact_text()
        .into_diagnostic()?;

    let priority_labels: Vec<String> = Priority::ALL.iter().map(|p| p.to_string()).collect();
    let priority_idx = Select::new()
        .with_prompt("Priority")
        .items(&priority_labels)
        .default(Priority::ALL.iter().position(|p| *p == draft.priority).unwrap_or(2))
        .interact()
        .into_diagnostic()?;
    draft.priority = Priority::ALL[priority_idx];

    let category_labels: Vec<String> = Category::ALL.iter().map(|c| c.to_string()).collect();
    let category_idx = Select::new()
        .with_prompt("Category")
        .items(&category_labels)
        .default(Category::ALL.iter().position(|c| *c == draft.category).unwrap_or(6))
        .interact()
        .into_diagnostic()?;
    draft.category = Category::ALL[category_idx];

    let mut bay_labels = vec!["(none)".to_string()];
    bay_labels.extend(Bay::all().iter().map(|b| format!("Bay {}", b)));
    let bay_idx = Select::new()
        .with_prompt("Bay")
        .items(&bay_labels)
        .default(0)
        .interact()
        .into_diagnostic()?;
    draft.bay = bay_idx.checked_sub(1).map(|i| Bay::all()[i]);

    Ok(())
}

// Detail panels

fn run_show<T: Transport>(
    store: &mut Store<'_, T>,
    reference: &str,
    lifecycle: &Lifecycle,
    format: OutputFormat,
) -> Result<()> {
    let wo = find_work_order(store, reference)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&wo).into_diagnostic()?);
            return Ok(());
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&wo).into_diagnostic()?);
            return Ok(());
        }
        _ => {}
    }

    let units = match store.units() {
        QueryState::Ready(units) => unit_index(units),
        _ => Default::default(),
    };
    let row = work_orders::row(&wo, &units, lifecycle);

    println!(
        "{} {}",
        style(&row.number).cyan().bold(),
        style(&wo.title).bold()
    );
    print!("{}", detail_card(&wo, &row));

    println!();
    print_summary_panel(store, &wo);
    Ok(())
}

/// Key/value card for one work order
pub fn detail_card(wo: &WorkOrder, row: &WorkOrderRow) -> String {
    let mut fields: Vec<(&str, String)> = vec![
        ("Unit", row.unit.clone()),
        ("Status", row.status.label().to_string()),
        ("Priority", row.priority.to_string()),
        ("Category", wo.category.to_string()),
        ("Bay", row.bay_display()),
        ("Mechanic", row.mechanic.clone().unwrap_or_else(|| DASH.to_string())),
    ];
    if let Some(reason) = wo.hold_reason.as_deref() {
        fields.push(("Hold reason", reason.to_string()));
    }
    fields.push(("Complaint", wo.complaint.clone()));
    fields.push(("Parts", attach_label(row.status).to_string()));
    fields.push(("Actions", row.actions_display()));

    let mut builder = Builder::default();
    builder.push_record(["Field".to_string(), "Value".to_string()]);
    for (field, value) in fields {
        builder.push_record([field.to_string(), value]);
    }
    format!("{}\n", builder.build().with(Style::markdown()))
}

fn print_summary_panel<T: Transport>(store: &mut Store<'_, T>, wo: &WorkOrder) {
    match panels::summary(store.summary(wo.id)) {
        Ok(Some(card)) => {
            println!(
                "{} {}   {} {}   {} {}",
                style("Parts:").dim(),
                card.parts,
                style("Labor hrs:").dim(),
                card.labor_hours,
                style("Notes:").dim(),
                card.notes
            );
        }
        Ok(None) => println!("{}", style("Loading…").dim()),
        Err(message) => println!("{}", style(message).red()),
    }
}

fn run_notes<T: Transport>(store: &mut Store<'_, T>, reference: &str) -> Result<()> {
    let wo = find_work_order(store, reference)?;
    print_notes_panel(store, &wo)
}

/// Print the notes panel; a failed load is an error
pub fn print_notes_panel<T: Transport>(store: &mut Store<'_, T>, wo: &WorkOrder) -> Result<()> {
    match panels::notes(store.notes(wo.id)) {
        ViewState::Failed(message) => Err(miette::miette!("{}", message)),
        ViewState::Ready(lines) => {
            for line in lines {
                println!("{}", style(line.header).dim());
                println!("  {}", line.message);
            }
            Ok(())
        }
        other => {
            println!("{}", other.message().unwrap_or_default());
            Ok(())
        }
    }
}

fn run_note<T: Transport>(store: &mut Store<'_, T>, args: NoteArgs, author: &str, quiet: bool) -> Result<()> {
    let wo = find_work_order(store, &args.id)?;
    let text = match args.text {
        Some(text) => text,
        None => dialoguer::Input::<String>::new()
            .with_prompt("Add a note")
            .allow_empty(true)
            .interact_text()
            .into_diagnostic()?,
    };

    let mut draft = NoteDraft::new(text);
    draft
        .submit(store, wo.id, author)
        .map_err(|e| miette::miette!("{}", e))?;

    if !quiet {
        println!("{} Note added to {}", style("✓").green(), style(wo.number()).cyan());
    }
    Ok(())
}

fn run_attach<T: Transport>(store: &mut Store<'_, T>, args: AttachArgs, quiet: bool) -> Result<()> {
    let wo = find_work_order(store, &args.id)?;
    panels::attach_part(store, &wo, args.part, args.qty).map_err(|e| match e {
        PartsError::NotInProgress(_) => miette::miette!(
            help = "Start or resume the work order first",
            "{}: {}",
            attach_label(wo.lifecycle_status()),
            e
        ),
        other => miette::miette!("{}", other),
    })?;

    if !quiet {
        println!(
            "{} Attached {} x part {} to {}",
            style("✓").green(),
            args.qty,
            args.part,
            style(wo.number()).cyan()
        );
    }
    Ok(())
}

fn run_timeline<T: Transport>(store: &mut Store<'_, T>, reference: &str) -> Result<()> {
    let wo = find_work_order(store, reference)?;
    print_timeline_panel(store, &wo)
}

/// Print the timeline panel; a failed load is an error
pub fn print_timeline_panel<T: Transport>(store: &mut Store<'_, T>, wo: &WorkOrder) -> Result<()> {
    match panels::timeline(store.timeline(wo.id)) {
        ViewState::Failed(message) => Err(miette::miette!("{}", message)),
        ViewState::Ready(lines) => {
            for line in lines {
                println!("{}", line);
            }
            Ok(())
        }
        other => {
            println!("{}", other.message().unwrap_or_default());
            Ok(())
        }
    }
}

fn run_summary<T: Transport>(store: &mut Store<'_, T>, reference: &str) -> Result<()> {
    let wo = find_work_order(store, reference)?;
    match panels::summary(store.summary(wo.id)) {
        Ok(Some(card)) => {
            let mut builder = Builder::default();
            builder.push_record(["Parts", "Labor hrs", "Notes"]);
            builder.push_record([
                card.parts.to_string(),
                card.labor_hours,
                card.notes.to_string(),
            ]);
            println!("{}", builder.build().with(Style::markdown()));
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(message) => Err(miette::miette!("{}", message)),
    }
}

// Lifecycle

/// Odometer from the flag, or prompted when attended
pub fn prompt_odometer(flag: Option<&str>) -> Result<TransitionInput> {
    let raw = match flag {
        Some(raw) => raw.to_string(),
        None if console::user_attended() => dialoguer::Input::<String>::new()
            .with_prompt("Odometer (km)")
            .interact_text()
            .into_diagnostic()?,
        None => String::new(),
    };
    let odometer = parse_odometer(&raw).map_err(|e| miette::miette!("{}", e))?;
    Ok(TransitionInput::Start { odometer })
}

/// Hold reason from the flag, or prompted when attended
pub fn prompt_pause_reason(flag: Option<&str>) -> Result<TransitionInput> {
    if flag.is_some() || !console::user_attended() {
        return Ok(TransitionInput::pause(flag));
    }
    let reason: String = dialoguer::Input::new()
        .with_prompt("Reason")
        .with_initial_text(SUGGESTED_PAUSE_REASON)
        .allow_empty(true)
        .interact_text()
        .into_diagnostic()?;
    Ok(TransitionInput::pause(Some(&reason)))
}

/// Check the guard, collect input, post the action, then report where the order landed
pub fn transition<T, F>(
    store: &mut Store<'_, T>,
    lifecycle: &Lifecycle,
    reference: &str,
    action: Action,
    input: F,
    global: &GlobalOpts,
) -> Result<()>
where
    T: Transport,
    F: FnOnce() -> Result<TransitionInput>,
{
    let wo = find_work_order(store, reference)?;

    // Refuse before prompting for odometer or reason
    lifecycle.check(&wo, action).map_err(lifecycle_error)?;
    let input = input()?;

    let outcome = store
        .transition(lifecycle, &wo, &input)
        .map_err(lifecycle_error)?;

    if global.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&outcome).into_diagnostic()?);
        return Ok(());
    }
    if global.quiet {
        return Ok(());
    }

    // The list is refetched so the reported status is the server's
    let landed = match store.find_work_order(wo.id) {
        Ok(Some(updated)) => updated.lifecycle_status().to_string(),
        Ok(None) => DASH.to_string(),
        Err(message) => format!("{} (refresh failed: {})", outcome.expected, message),
    };
    println!(
        "{} {} {} {} {}",
        style("✓").green(),
        action.label(),
        style(wo.number()).cyan(),
        style("→").dim(),
        style(landed).yellow()
    );
    Ok(())
}

fn lifecycle_error(e: LifecycleError) -> miette::Report {
    match e {
        LifecycleError::NoMechanic => miette::miette!(
            help = "Pass --mechanic <id>, set SHOP_MECHANIC_ID, or run 'shop config set mechanic_id <id>'",
            "{}",
            e
        ),
        other => miette::miette!("{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::testing::fake_client;
    use crate::core::client::Method;
    use serde_json::json;

    fn global() -> GlobalOpts {
        GlobalOpts {
            format: OutputFormat::Auto,
            quiet: true,
            verbose: false,
            api_url: None,
            token: None,
            mechanic: Some(3),
        }
    }

    #[test]
    fn test_detail_card_lists_actions() {
        let wo: WorkOrder = serde_json::from_value(json!({
            "id": 5,
            "unit_id": 7,
            "title": "Lights",
            "complaint": "Left marker out",
            "status": "in_progress",
            "bay": "C",
        }))
        .unwrap();
        let units = unit_index(&[]);
        let row = work_orders::row(&wo, &units, &Lifecycle::new(Some(3)));
        let card = detail_card(&wo, &row);
        assert!(card.contains("Left marker out"));
        assert!(card.contains("| Bay"));
        assert!(card.contains("pause complete"));
        assert!(card.contains("Attach"));
    }

    #[test]
    fn test_transition_refused_without_request() {
        let client = fake_client();
        client.transport().json(
            Method::Get,
            "/work-orders",
            json!([{"id": 1, "unit_id": 7, "title": "Brakes", "status": "completed"}]),
        );
        let mut store = Store::new(&client);
        let lc = Lifecycle::new(Some(3));

        let mut prompted = false;
        let result = transition(
            &mut store,
            &lc,
            "1",
            Action::Start,
            || {
                prompted = true;
                Ok(TransitionInput::Start { odometer: 1 })
            },
            &global(),
        );

        assert!(result.is_err());
        assert!(!prompted);
        assert_eq!(client.transport().count(Method::Post, "/work-orders/1/start"), 0);
    }

    #[test]
    fn test_transition_posts_and_refetches() {
        let client = fake_client();
        client.transport().json(
            Method::Get,
            "/work-orders",
            json!([{"id": 1, "unit_id": 7, "title": "Brakes", "status": "pending"}]),
        );
        client
            .transport()
            .json(Method::Post, "/work-orders/1/start", json!({"ok": true}));
        let mut store = Store::new(&client);
        let lc = Lifecycle::new(Some(3));

        transition(
            &mut store,
            &lc,
            "WO-00001",
            Action::Start,
            || Ok(TransitionInput::Start { odometer: 54000 }),
            &global(),
        )
        .unwrap();

        assert_eq!(client.transport().count(Method::Post, "/work-orders/1/start"), 1);
    }

    #[test]
    fn test_pause_reason_flag() {
        assert_eq!(
            prompt_pause_reason(Some("Waiting parts")).unwrap(),
            TransitionInput::Pause {
                reason: "Waiting parts".to_string()
            }
        );
        assert_eq!(
            prompt_odometer(Some("54,000")).unwrap(),
            TransitionInput::Start { odometer: 54000 }
        );
        assert!(prompt_odometer(Some("abc")).is_err());
    }
}
