use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use tablado_state::StateStore;

use crate::commands::{diagnostics, load_settings, state_dir};
use crate::error::CliError;

fn open_state(flag: Option<PathBuf>) -> Result<StateStore, CliError> {
    let settings = load_settings()?;
    Ok(StateStore::open(state_dir(flag, &settings), diagnostics()))
}

/// Show every entry in the review queue.
pub(crate) fn run_deferred_list(state_dir: Option<PathBuf>) -> Result<(), CliError> {
    let state = open_state(state_dir)?;
    let entries = state.deferred.entries();

    if entries.is_empty() {
        log::info!("No videos awaiting review.");
        return Ok(());
    }

    log::info!(
        "{} ({})",
        "Awaiting review".if_supports_color(Stdout, |t| t.bold()),
        state.paths.deferred().display().if_supports_color(Stdout, |t| t.dimmed()),
    );
    for entry in &entries {
        let marker = if entry.accepted == Some(true) {
            format!("{}", "accepted".if_supports_color(Stdout, |t| t.green()))
        } else {
            format!("{}", "pending".if_supports_color(Stdout, |t| t.yellow()))
        };
        log::info!(
            "  {} {} [{}]",
            entry.id.if_supports_color(Stdout, |t| t.cyan()),
            entry.title,
            marker,
        );
        log::info!("      {}", entry.reason.if_supports_color(Stdout, |t| t.dimmed()));
    }
    Ok(())
}

/// Mark entries as accepted so the next sync processes them.
pub(crate) fn run_deferred_accept(state_dir: Option<PathBuf>, ids: &[String]) -> Result<(), CliError> {
    let state = open_state(state_dir)?;
    let found = state.deferred.accept(ids)?;

    for id in ids {
        if found.contains(id) {
            log::info!(
                "{} Accepted {}",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                id.if_supports_color(Stdout, |t| t.cyan()),
            );
        } else {
            log::warn!(
                "{} {} is not in the review queue",
                "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                id,
            );
        }
    }
    if !found.is_empty() {
        log::info!("They will be downloaded on the next sync.");
    }
    Ok(())
}
