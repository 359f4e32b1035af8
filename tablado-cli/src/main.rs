//! tablado CLI
//!
//! Keeps a local archive holding the best-ranked performance of every
//! carnival group for every year.

mod cli_types;
mod commands;
mod error;
mod logging;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use cli_types::{Cli, Commands, ConfigAction, DeferredAction};
use error::CliError;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose, cli.quiet, cli.logfile.as_deref()) {
        eprintln!("Could not set up logging: {e}");
        std::process::exit(2);
    }

    if let Err(e) = run(cli) {
        log::error!(
            "{} {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            e,
        );
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Sync {
            channel,
            year,
            dry_run,
            paths,
            output_dir,
            min_duration,
            threshold,
            no_log,
        } => commands::sync::run_sync(
            commands::sync::SyncArgs {
                channel,
                year,
                dry_run,
                catalog: paths.catalog,
                state_dir: paths.state_dir,
                output_dir,
                min_duration,
                threshold,
                no_log,
            },
            cli.quiet || cli.verbose,
        ),
        Commands::Parse {
            titles,
            year,
            catalog,
            threshold,
        } => commands::parse::run_parse(&titles, year.as_deref(), catalog, threshold),
        Commands::Deferred { action, state_dir } => match action {
            DeferredAction::List => commands::deferred::run_deferred_list(state_dir),
            DeferredAction::Accept { ids } => commands::deferred::run_deferred_accept(state_dir, &ids),
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(),
            ConfigAction::Path => {
                commands::config::run_config_path();
                Ok(())
            }
            ConfigAction::Init => commands::config::run_config_init(),
        },
    }
}
