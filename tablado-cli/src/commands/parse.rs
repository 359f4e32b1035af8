use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use tablado_catalog::TitleParser;
use tablado_core::Round;
use tablado_lib::settings::resolve;

use crate::commands::{diagnostics, load_catalog, load_settings};
use crate::error::CliError;

/// Parse each title and print what the cascade made of it.
pub(crate) fn run_parse(
    titles: &[String],
    year: Option<&str>,
    catalog: Option<PathBuf>,
    threshold: Option<f64>,
) -> Result<(), CliError> {
    let settings = load_settings()?;
    let diag = diagnostics();
    let catalog_path = resolve(catalog, settings.paths.catalog.clone());
    let parser = TitleParser::standard(load_catalog(&catalog_path, diag.as_ref())?)
        .with_threshold(resolve(threshold, settings.matching.threshold));

    for (i, title) in titles.iter().enumerate() {
        if i > 0 {
            log::info!("");
        }
        log::info!("{}", title.if_supports_color(Stdout, |t| t.bold()));

        let outcome = parser.parse_traced(title, diag.as_ref());
        if outcome.excluded {
            log::info!(
                "  {}",
                "excluded (not a competition performance)".if_supports_color(Stdout, |t| t.dimmed()),
            );
            continue;
        }

        let record = &outcome.record;
        let shown_year = match (record.year.as_deref(), year) {
            (_, Some(forced)) => Some(format!("{forced} (forced)")),
            (Some(parsed), None) => Some(parsed.to_string()),
            (None, None) => None,
        };
        print_field("year", shown_year);
        print_field(
            "group",
            record
                .group
                .as_ref()
                .map(|g| format!("{} ({})", g.name, g.category)),
        );
        let priority = Round::priority_of(record.round.as_deref());
        print_field(
            "round",
            record
                .round
                .as_ref()
                .map(|r| format!("{r} (priority {priority})")),
        );
        if record.is_alternative_format {
            print_field("format", Some("etapa layout".to_string()));
        }
        match outcome.stage {
            Some(stage) => log::info!(
                "  {} {}",
                "stage:".if_supports_color(Stdout, |t| t.cyan()),
                stage.if_supports_color(Stdout, |t| t.dimmed()),
            ),
            None => log::info!(
                "  {} {}",
                "stage:".if_supports_color(Stdout, |t| t.cyan()),
                "no recognizer matched".if_supports_color(Stdout, |t| t.yellow()),
            ),
        }
    }
    Ok(())
}

fn print_field(name: &str, value: Option<String>) {
    let label = format!("{name}:");
    match value {
        Some(v) => log::info!("  {} {}", label.if_supports_color(Stdout, |t| t.cyan()), v),
        None => log::info!(
            "  {} {}",
            label.if_supports_color(Stdout, |t| t.cyan()),
            "unresolved".if_supports_color(Stdout, |t| t.yellow()),
        ),
    }
}
