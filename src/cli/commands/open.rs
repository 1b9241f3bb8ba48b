//! `shop open` command - Navigate to a page by path or role

use console::style;
use miette::Result;

use crate::cli::commands::mechanics::print_mechanics;
use crate::cli::commands::units::print_units;
use crate::cli::commands::wo::print_work_orders;
use crate::cli::helpers::{api_client, lifecycle, load_config, resolve_format};
use crate::cli::table::TableConfig;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::router::{Role, Route};
use crate::core::store::Store;
use crate::views::dashboards::{self, Page};
use crate::views::work_orders::Tab;

#[derive(clap::Args, Debug)]
pub struct OpenArgs {
    /// Page path (/, /owner, /owner/units, /owner/mechanics, /dispatch, /mechanic, /work-orders)
    #[arg(default_value = "/")]
    pub path: String,

    /// Open the dashboard for a role instead of a path
    #[arg(long, short = 'r', conflicts_with = "path")]
    pub role: Option<Role>,

    /// Status tab when opening /work-orders
    #[arg(long, short = 't', default_value = "pending")]
    pub tab: Tab,
}

pub fn run(args: OpenArgs, global: &GlobalOpts) -> Result<()> {
    let route = match args.role {
        Some(role) => role.home(),
        None => args.path.parse::<Route>().map_err(|e| {
            miette::miette!(help = "Run 'shop open /' to see the dashboards", "{}", e)
        })?,
    };
    tracing::debug!(route = %route, "open");

    if let Some(page) = dashboards::page(route) {
        print!("{}", render_page(&page));
        return Ok(());
    }

    let config = load_config(global);
    let client = api_client(global, &config)?;
    let mut store = Store::new(&client);
    let format = resolve_format(global, &config, OutputFormat::Tsv);

    if !global.quiet && matches!(format, OutputFormat::Tsv | OutputFormat::Auto) {
        println!("{}", style(route.title()).bold());
        println!();
    }

    match route {
        Route::Units => print_units(&mut store, format, global.quiet),
        Route::Mechanics => print_mechanics(&mut store, format, global.quiet),
        Route::WorkOrders => print_work_orders(
            &mut store,
            args.tab,
            &lifecycle(&config),
            format,
            TableConfig::default(),
        ),
        Route::Home | Route::Owner | Route::Dispatch | Route::Mechanic => Ok(()),
    }
}

/// Plain-text rendering of a static page
pub fn render_page(page: &Page) -> String {
    let mut out = format!("{}\n", style(page.title).bold());
    for line in &page.lines {
        out.push_str(&format!("{}\n", line));
    }
    if !page.cards.is_empty() {
        out.push('\n');
        for card in &page.cards {
            out.push_str(&format!("  [ {} ]\n", card));
        }
    }
    if !page.links.is_empty() {
        out.push('\n');
        for link in &page.links {
            out.push_str(&format!(
                "  {} {:<18} {}\n",
                style("→").dim(),
                style(link.path()).cyan(),
                link.title()
            ));
        }
    }
    out
}
