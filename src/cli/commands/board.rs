//! `shop board` command - Interactive work order board
//!
//! A menu-driven loop over the status tabs. Opening a work order shows its
//! detail card and lets the current mechanic run the offered lifecycle
//! actions, read and add notes, attach parts, and view the timeline.

use console::style;
use dialoguer::{Input, Select};
use miette::{IntoDiagnostic, Result};
use std::time::Instant;

use crate::cli::commands::parts::print_parts;
use crate::cli::commands::wo::{
    detail_card, fill_draft_interactive, print_notes_panel, print_timeline_panel,
    print_work_orders, prompt_odometer, prompt_pause_reason, transition, work_orders_view,
};
use crate::cli::helpers::{api_client, lifecycle, load_config};
use crate::cli::table::TableConfig;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::lifecycle::{Action, Lifecycle, TransitionInput};
use crate::core::store::Store;
use crate::core::Transport;
use crate::entities::{WorkOrder, WorkOrderId};
use crate::views::form::{NoteDraft, WorkOrderDraft};
use crate::views::panels::{attach_enabled, PartsPanel};
use crate::views::work_orders::{self, tab_counts, unit_index, Tab, WorkOrderRow};
use crate::views::ViewState;

#[derive(clap::Args, Debug)]
pub struct BoardArgs {
    /// Tab to start on
    #[arg(long, short = 't', default_value = "pending")]
    pub tab: Tab,
}

/// Top-level board menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardChoice {
    Tab(Tab),
    Open,
    New,
    Refresh,
    Quit,
}

/// Work order detail menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailChoice {
    Action(Action),
    Notes,
    AddNote,
    Parts,
    Timeline,
    Back,
}

impl DetailChoice {
    fn label(&self) -> String {
        match self {
            DetailChoice::Action(action) => action.label().to_string(),
            DetailChoice::Notes => "Notes".to_string(),
            DetailChoice::AddNote => "Add note".to_string(),
            DetailChoice::Parts => "Parts".to_string(),
            DetailChoice::Timeline => "Timeline".to_string(),
            DetailChoice::Back => "Back".to_string(),
        }
    }
}

/// Board menu: one entry per tab (with counts once loaded), then commands
pub fn board_menu(counts: Option<&[(Tab, usize)]>, current: Tab) -> Vec<(BoardChoice, String)> {
    let mut menu: Vec<(BoardChoice, String)> = Tab::BOARD
        .iter()
        .map(|tab| {
            let count = counts
                .and_then(|c| c.iter().find(|(t, _)| t == tab))
                .map(|(_, n)| format!(" ({})", n))
                .unwrap_or_default();
            let marker = if *tab == current { "●" } else { " " };
            (BoardChoice::Tab(*tab), format!("{} {}{}", marker, tab.label(), count))
        })
        .collect();
    menu.push((BoardChoice::Open, "Open work order".to_string()));
    menu.push((BoardChoice::New, "New work order".to_string()));
    menu.push((BoardChoice::Refresh, "Refresh".to_string()));
    menu.push((BoardChoice::Quit, "Quit".to_string()));
    menu
}

/// Detail menu for a row: its offered actions first, then the panels
pub fn detail_menu(row: &WorkOrderRow) -> Vec<DetailChoice> {
    let mut menu: Vec<DetailChoice> = row.actions.iter().copied().map(DetailChoice::Action).collect();
    menu.extend([
        DetailChoice::Notes,
        DetailChoice::AddNote,
        DetailChoice::Parts,
        DetailChoice::Timeline,
        DetailChoice::Back,
    ]);
    menu
}

pub fn run(args: BoardArgs, global: &GlobalOpts) -> Result<()> {
    if !console::user_attended() {
        return Err(miette::miette!(
            help = "Use 'shop wo list' for non-interactive output",
            "The board needs an interactive terminal"
        ));
    }

    let config = load_config(global);
    let lifecycle = lifecycle(&config);
    let author = config.author();
    let client = api_client(global, &config)?;
    let mut store = Store::new(&client);
    let mut tab = args.tab;

    if lifecycle.mechanic().is_none() {
        println!(
            "{}",
            style("No mechanic selected; lifecycle actions are hidden (set mechanic_id).").yellow()
        );
    }

    loop {
        println!();
        println!("{} {}", style("Work Orders").bold(), style(format!("· {}", tab.label())).dim());
        if let Err(e) = print_work_orders(&mut store, tab, &lifecycle, OutputFormat::Tsv, TableConfig::default()) {
            println!("{}", style(e).red());
        }

        let counts = store.work_orders().data().map(|list| tab_counts(list));
        let menu = board_menu(counts.as_deref(), tab);
        let labels: Vec<&str> = menu.iter().map(|(_, label)| label.as_str()).collect();
        let picked = Select::new()
            .with_prompt("Board")
            .items(&labels)
            .default(0)
            .interact()
            .into_diagnostic()?;

        match menu[picked].0 {
            BoardChoice::Tab(next) => tab = next,
            BoardChoice::Open => {
                if let Some(id) = pick_work_order(&mut store, tab, &lifecycle)? {
                    detail_loop(&mut store, &lifecycle, id, &author, global)?;
                }
            }
            BoardChoice::New => {
                let mut draft = WorkOrderDraft::new();
                let created = fill_draft_interactive(&mut store, &mut draft).and_then(|_| {
                    let title = draft.title.trim().to_string();
                    draft
                        .submit(&mut store)
                        .map(|_| title)
                        .map_err(|e| miette::miette!("{}", e))
                });
                match created {
                    Ok(title) => println!("{} Created {}", style("✓").green(), style(title).cyan()),
                    Err(e) => println!("{}", style(e).red()),
                }
            }
            BoardChoice::Refresh => {
                store.refresh_work_orders();
                store.refresh_units();
            }
            BoardChoice::Quit => return Ok(()),
        }
    }
}

fn pick_work_order<T: Transport>(
    store: &mut Store<'_, T>,
    tab: Tab,
    lifecycle: &Lifecycle,
) -> Result<Option<WorkOrderId>> {
    let rows = match work_orders_view(store, tab, lifecycle) {
        ViewState::Ready(rows) => rows,
        other => {
            println!("{}", style(other.message().unwrap_or_default()).dim());
            return Ok(None);
        }
    };
    let labels: Vec<String> = rows
        .iter()
        .map(|r| format!("{}  {:<10} {}", r.number, r.unit, r.title))
        .collect();
    let picked = Select::new()
        .with_prompt("Work order")
        .items(&labels)
        .default(0)
        .interact_opt()
        .into_diagnostic()?;
    Ok(picked.map(|i| rows[i].id))
}

fn current<T: Transport>(store: &mut Store<'_, T>, id: WorkOrderId) -> Result<Option<WorkOrder>> {
    store.find_work_order(id).map_err(|e| miette::miette!("{}", e))
}

fn detail_loop<T: Transport>(
    store: &mut Store<'_, T>,
    lifecycle: &Lifecycle,
    id: WorkOrderId,
    author: &str,
    global: &GlobalOpts,
) -> Result<()> {
    loop {
        // Re-read after every step so guards see the refetched status
        let wo = match current(store, id) {
            Ok(Some(wo)) => wo,
            Ok(None) => {
                println!("{}", style("Work order no longer listed").dim());
                return Ok(());
            }
            Err(e) => {
                println!("{}", style(e).red());
                return Ok(());
            }
        };
        let units = store.units().data().map(|u| unit_index(u)).unwrap_or_default();
        let row = work_orders::row(&wo, &units, lifecycle);

        println!();
        println!("{} {}", style(&row.number).cyan().bold(), style(&wo.title).bold());
        print!("{}", detail_card(&wo, &row));

        let menu = detail_menu(&row);
        let labels: Vec<String> = menu.iter().map(DetailChoice::label).collect();
        let picked = Select::new()
            .with_prompt("Action")
            .items(&labels)
            .default(0)
            .interact()
            .into_diagnostic()?;

        let outcome = match menu[picked] {
            DetailChoice::Action(action) => {
                let reference = id.to_string();
                transition(
                    store,
                    lifecycle,
                    &reference,
                    action,
                    || match action {
                        Action::Start => prompt_odometer(None),
                        Action::Pause => prompt_pause_reason(None),
                        Action::Assign => Ok(TransitionInput::Assign),
                        Action::Resume => Ok(TransitionInput::Resume),
                        Action::Complete => Ok(TransitionInput::Complete),
                    },
                    global,
                )
            }
            DetailChoice::Notes => print_notes_panel(store, &wo),
            DetailChoice::AddNote => add_note(store, &wo, author),
            DetailChoice::Parts => parts_loop(store, &wo),
            DetailChoice::Timeline => print_timeline_panel(store, &wo),
            DetailChoice::Back => return Ok(()),
        };
        if let Err(e) = outcome {
            println!("{}", style(e).red());
        }
    }
}

fn add_note<T: Transport>(store: &mut Store<'_, T>, wo: &WorkOrder, author: &str) -> Result<()> {
    let text: String = Input::new()
        .with_prompt("Add a note")
        .allow_empty(true)
        .interact_text()
        .into_diagnostic()?;
    let mut draft = NoteDraft::new(text);
    draft
        .submit(store, wo.id, author)
        .map_err(|e| miette::miette!("{}", e))?;
    println!("{} Note added", style("✓").green());
    Ok(())
}

fn parts_loop<T: Transport>(store: &mut Store<'_, T>, wo: &WorkOrder) -> Result<()> {
    let mut panel = PartsPanel::new();
    loop {
        let query: String = Input::new()
            .with_prompt("Search parts (blank to go back)")
            .allow_empty(true)
            .interact_text()
            .into_diagnostic()?;
        if query.trim().is_empty() {
            return Ok(());
        }
        panel.set_query(&query, Instant::now());
        panel.submit(store);
        if let Err(e) = print_parts(&panel, OutputFormat::Tsv, false) {
            println!("{}", style(e).red());
            continue;
        }

        let rows = panel.results().rows().to_vec();
        if rows.is_empty() {
            continue;
        }
        if !attach_enabled(wo.lifecycle_status()) {
            println!(
                "{}",
                style(format!("Only in progress (work order is {})", wo.lifecycle_status())).dim()
            );
            continue;
        }

        let mut labels: Vec<String> = rows
            .iter()
            .map(|p| format!("{}  {}", p.part_number, p.part_name))
            .collect();
        labels.push("Search again".to_string());
        let picked = Select::new()
            .with_prompt("Attach")
            .items(&labels)
            .default(0)
            .interact()
            .into_diagnostic()?;
        let Some(part) = rows.get(picked) else {
            continue;
        };

        let qty: u32 = Input::new()
            .with_prompt("Qty")
            .default(panel.quantity(part.id))
            .interact_text()
            .into_diagnostic()?;
        panel.set_quantity(part.id, qty);
        panel
            .attach(store, wo, part.id)
            .map_err(|e| miette::miette!("{}", e))?;
        println!(
            "{} Attached {} x {}",
            style("✓").green(),
            panel.quantity(part.id),
            part.part_number
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Priority;
    use crate::entities::WorkOrderStatus;

    fn row(actions: Vec<Action>) -> WorkOrderRow {
        WorkOrderRow {
            id: 1,
            number: "WO-00001".to_string(),
            unit: "T-104".to_string(),
            title: "Brakes".to_string(),
            complaint: String::new(),
            priority: Priority::High,
            status: WorkOrderStatus::Pending,
            bay: None,
            opened_at: None,
            mechanic: None,
            actions,
        }
    }

    #[test]
    fn test_board_menu_counts() {
        let counts = vec![
            (Tab::Pending, 2),
            (Tab::InProgress, 1),
            (Tab::OnHold, 0),
            (Tab::Completed, 5),
        ];
        let menu = board_menu(Some(counts.as_slice()), Tab::InProgress);
        assert_eq!(menu.len(), 8);
        assert_eq!(menu[0].1, "  Pending (2)");
        assert_eq!(menu[1].1, "● In Progress (1)");
        assert_eq!(menu[7].0, BoardChoice::Quit);

        let loading = board_menu(None, Tab::Pending);
        assert_eq!(loading[0].1, "● Pending");
    }

    #[test]
    fn test_detail_menu_offers_row_actions_first() {
        let menu = detail_menu(&row(vec![Action::Assign, Action::Start]));
        assert_eq!(menu[0], DetailChoice::Action(Action::Assign));
        assert_eq!(menu[1], DetailChoice::Action(Action::Start));
        assert_eq!(menu.last(), Some(&DetailChoice::Back));

        let none = detail_menu(&row(vec![]));
        assert_eq!(none[0], DetailChoice::Notes);
        assert_eq!(DetailChoice::Action(Action::Assign).label(), "Assign to me");
    }
}
