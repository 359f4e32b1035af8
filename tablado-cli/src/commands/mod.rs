pub(crate) mod config;
pub(crate) mod deferred;
pub(crate) mod parse;
pub(crate) mod sync;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use tablado_catalog::Catalog;
use tablado_core::{Diagnostics, LogDiagnostics};
use tablado_lib::Settings;

use crate::error::CliError;

/// Diagnostics handed to the library crates.
pub(crate) fn diagnostics() -> Arc<dyn Diagnostics> {
    Arc::new(LogDiagnostics)
}

pub(crate) fn load_settings() -> Result<Settings, CliError> {
    let settings = Settings::load()?;
    log::debug!(
        "Settings from {}",
        tablado_lib::settings::settings_path().display()
    );
    Ok(settings)
}

/// Load the group catalog, explaining how to create one if it is missing.
pub(crate) fn load_catalog(path: &Path, diag: &dyn Diagnostics) -> Result<Catalog, CliError> {
    if !path.exists() {
        return Err(CliError::config(format!(
            "no catalog at {}; create a YAML file mapping each category to its group names, \
             or pass --catalog",
            path.display()
        )));
    }
    let catalog = Catalog::load(path, diag)?;
    if catalog.is_empty() {
        log::warn!(
            "{} Catalog {} has no groups; no title will match",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            path.display(),
        );
    } else {
        log::debug!(
            "Loaded {} groups in {} categories from {}",
            catalog.len(),
            catalog.categories().len(),
            path.display()
        );
    }
    Ok(catalog)
}

/// State directory from the flag or the settings file.
pub(crate) fn state_dir(flag: Option<PathBuf>, settings: &Settings) -> PathBuf {
    tablado_lib::settings::resolve(flag, settings.paths.state_dir.clone())
}
