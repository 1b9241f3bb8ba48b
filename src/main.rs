use clap::Parser;
use miette::Result;
use shopdesk::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

/// Log filter variable; `-v` raises the default from `warn` to `debug`
const LOG_ENV: &str = "SHOP_LOG";

fn init_logging(verbose: bool) {
    let default = if verbose { "shopdesk=debug" } else { "warn" };
    let filter = EnvFilter::builder()
        .with_env_var(LOG_ENV)
        .try_from_env()
        .unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    init_logging(global.verbose);

    match cli.command {
        Commands::Open(args) => shopdesk::cli::commands::open::run(args, &global),
        Commands::Wo(cmd) => shopdesk::cli::commands::wo::run(cmd, &global),
        Commands::Units(cmd) => shopdesk::cli::commands::units::run(cmd, &global),
        Commands::Mechanics(cmd) => shopdesk::cli::commands::mechanics::run(cmd, &global),
        Commands::Parts(cmd) => shopdesk::cli::commands::parts::run(cmd, &global),
        Commands::Board(args) => shopdesk::cli::commands::board::run(args, &global),
        Commands::Login(args) => shopdesk::cli::commands::session::run_login(args, &global),
        Commands::Logout => shopdesk::cli::commands::session::run_logout(&global),
        Commands::Whoami => shopdesk::cli::commands::session::run_whoami(&global),
        Commands::Config(cmd) => shopdesk::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => shopdesk::cli::commands::completions::run(args),
    }
}
