use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use tablado_lib::Settings;
use tablado_lib::settings::settings_path;

use crate::commands::load_settings;
use crate::error::CliError;

/// Show the settings file status and the resolved values.
pub(crate) fn run_config_show() -> Result<(), CliError> {
    let path = settings_path();
    let settings = load_settings()?;

    log::info!(
        "{}",
        "tablado Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");
    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found, using defaults)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log::info!("");

    let rendered = settings
        .to_toml_string()
        .ok_or_else(|| CliError::config("could not render settings"))?;
    for line in rendered.lines() {
        log::info!("  {line}");
    }

    if settings.sync.channel_url.is_none() {
        log::info!("");
        log::info!(
            "  {}",
            "No channel_url set; pass --channel to sync.".if_supports_color(Stdout, |t| t.yellow()),
        );
    }
    if !settings.paths.catalog.exists() {
        log::info!(
            "  {} {}",
            "Catalog not found:".if_supports_color(Stdout, |t| t.yellow()),
            settings.paths.catalog.display(),
        );
    }
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path() {
    log::info!("{}", settings_path().display());
}

/// Write a default settings file unless one already exists.
pub(crate) fn run_config_init() -> Result<(), CliError> {
    let path = settings_path();
    if Settings::default().write_if_missing(&path)? {
        log::info!(
            "{} Wrote default settings to {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            path.display().if_supports_color(Stdout, |t| t.cyan()),
        );
    } else {
        log::info!(
            "Settings file already exists: {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
        );
    }
    Ok(())
}
