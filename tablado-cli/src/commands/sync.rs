use std::path::PathBuf;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use tablado_catalog::TitleParser;
use tablado_lib::settings::resolve;
use tablado_lib::{
    Disposition, Orchestrator, RunReport, StateStore, SyncEvent, SyncOptions, YtDlp,
    run_with_events,
};

use crate::commands::{diagnostics, load_catalog, load_settings, state_dir};
use crate::error::CliError;

/// Flags of `tablado sync`.
pub(crate) struct SyncArgs {
    pub channel: Option<String>,
    pub year: Option<String>,
    pub dry_run: bool,
    pub catalog: Option<PathBuf>,
    pub state_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub min_duration: Option<u64>,
    pub threshold: Option<f64>,
    pub no_log: bool,
}

fn spinner(hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .expect("static pattern")
            .tick_chars("/-\\|"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub(crate) fn run_sync(args: SyncArgs, hide_progress: bool) -> Result<(), CliError> {
    let settings = load_settings()?;
    let diag = diagnostics();

    let source_url = args
        .channel
        .or_else(|| settings.sync.channel_url.clone())
        .ok_or_else(|| {
            CliError::config("no channel to sync; pass --channel or set [sync] channel_url")
        })?;
    let state_dir = state_dir(args.state_dir, &settings);
    let output_dir = resolve(args.output_dir, settings.paths.output_dir.clone());
    let catalog_path = resolve(args.catalog, settings.paths.catalog.clone());

    let parser = TitleParser::standard(load_catalog(&catalog_path, diag.as_ref())?)
        .with_threshold(resolve(args.threshold, settings.matching.threshold));
    let state = StateStore::open(&state_dir, diag.clone());
    let ytdlp = YtDlp::new(&settings.sync.ytdlp, &output_dir, diag.clone());

    let mut options = SyncOptions::new(&source_url);
    options.forced_year = args.year;
    options.dry_run = args.dry_run;
    options.min_duration_secs = resolve(args.min_duration, settings.sync.min_duration_secs);

    log::info!(
        "Syncing from: {}",
        source_url.if_supports_color(Stdout, |t| t.cyan()),
    );
    if let Some(year) = &options.forced_year {
        log::info!(
            "{}",
            format!("Forcing year {year} for every title").if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    if options.dry_run {
        log::info!(
            "{}",
            "Dry run: nothing will be downloaded or recorded".if_supports_color(Stdout, |t| t.dimmed()),
        );
    } else {
        std::fs::create_dir_all(&state_dir)?;
    }
    log::info!(
        "State:     {}",
        state_dir.display().if_supports_color(Stdout, |t| t.dimmed()),
    );
    log::info!(
        "Downloads: {}",
        output_dir.display().if_supports_color(Stdout, |t| t.dimmed()),
    );
    log::info!("");

    let rt = tokio::runtime::Runtime::new().map_err(|e| CliError::runtime(e.to_string()))?;
    let report = rt.block_on(async {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let orchestrator =
            Orchestrator::new(&parser, &state, &ytdlp, &ytdlp, diag.as_ref()).with_events(tx);
        let options = &options;
        // The orchestrator owns the sender; moving it in closes the channel
        // as soon as the run returns.
        let task = async move { orchestrator.run(options).await };

        let pb = spinner(hide_progress);
        let result = run_with_events(
            task,
            rx,
            |event| match event {
                SyncEvent::Listing => pb.set_message("Listing videos..."),
                SyncEvent::Listed { total } => pb.set_message(format!("Parsing {total} titles...")),
                SyncEvent::Selected { winners } => {
                    pb.set_message(format!("{winners} videos to process"));
                }
                SyncEvent::Processing {
                    index,
                    total,
                    title,
                } => pb.set_message(format!("[{}/{}] {}", index + 1, total, title)),
                SyncEvent::Finished => pb.finish_and_clear(),
            },
            diag.as_ref(),
        )
        .await;
        pb.finish_and_clear();
        result
    })?;

    print_report(&report, options.dry_run);

    if !args.no_log && !options.dry_run {
        let log_path = state_dir.join(format!(
            "sync-log-{}.txt",
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        ));
        match report.write_to_file(&log_path) {
            Ok(()) => log::info!(
                "Log written to {}",
                log_path.display().if_supports_color(Stdout, |t| t.dimmed()),
            ),
            Err(e) => log::warn!(
                "{} Failed to write sync log: {}",
                "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                e,
            ),
        }
    }

    Ok(())
}

fn print_report(report: &RunReport, dry_run: bool) {
    let summary = report.summary();

    for entry in report.entries() {
        match &entry.disposition {
            Disposition::Downloaded => log::info!(
                "  {} {}",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                entry.title,
            ),
            Disposition::Deferred { reason } => log::warn!(
                "  {} {} ({}): {}",
                "\u{23F8}".if_supports_color(Stdout, |t| t.yellow()),
                entry.title,
                entry.id,
                reason,
            ),
            Disposition::Failed { message } => log::warn!(
                "  {} {} ({}): {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                entry.title,
                entry.id,
                message,
            ),
            Disposition::Pending { reason } if dry_run => log::info!(
                "  {} {}",
                "\u{2192}".if_supports_color(Stdout, |t| t.cyan()),
                reason,
            ),
            Disposition::Ignored { reason } => log::debug!("  ignored {}: {reason}", entry.title),
            Disposition::Superseded { winner_id } => {
                log::debug!("  {} superseded by {winner_id}", entry.title);
            }
            _ => {}
        }
    }

    for conflict in report.conflicts() {
        log::warn!(
            "  {} {} says {}, filed under {}",
            "?".if_supports_color(Stdout, |t| t.yellow()),
            conflict.title,
            conflict.parsed,
            conflict.forced,
        );
    }

    // In quiet mode, still say something when attention is needed
    if (summary.failed > 0 || summary.deferred > 0) && log::max_level() < LevelFilter::Info {
        log::warn!(
            "{} failed, {} deferred for review",
            summary.failed,
            summary.deferred,
        );
    }

    log::info!("");
    log::info!("{}", "Summary".if_supports_color(Stdout, |t| t.bold()));
    if dry_run {
        log::info!("  Would download:     {}", summary.pending);
    } else {
        log::info!("  Downloaded:         {}", summary.downloaded);
        log::info!("  Awaiting review:    {}", summary.deferred + summary.pending);
        log::info!("  Failed:             {}", summary.failed);
    }
    log::info!("  Already archived:   {}", summary.already_archived);
    log::info!("  Superseded:         {}", summary.superseded);
    log::info!("  Unresolved titles:  {}", summary.ignored);
    log::info!("  Excluded titles:    {}", summary.excluded);
    log::info!("  Previously ignored: {}", summary.previously_ignored);
    if summary.year_conflicts > 0 {
        log::info!("  Year conflicts:     {}", summary.year_conflicts);
    }
}
