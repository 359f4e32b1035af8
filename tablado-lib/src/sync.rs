//! One sync run, start to finish.
//!
//! The run is strictly sequential: each winner is refreshed, dispositioned
//! and downloaded before the next one starts, and every state change is
//! written as soon as it happens. A crash loses at most the item in flight.

use tablado_catalog::TitleParser;
use tablado_core::{CandidateVideo, Diagnostics};
use tablado_state::{DeferredStatus, StateError, StateStore, TrackingEntry};
use tokio::sync::mpsc;

use crate::collaborator::{DownloadRequest, Downloader, MetadataSource, VideoMetadata};
use crate::error::SyncError;
use crate::report::{Disposition, RunReport};
use crate::selection::{collect, select};
use crate::settings::DEFAULT_MIN_DURATION_SECS;

/// Options for one run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Channel or playlist to list.
    pub source_url: String,
    /// Year applied to every title, overriding what the title says.
    pub forced_year: Option<String>,
    /// Parse and select only; nothing is downloaded or written.
    pub dry_run: bool,
    /// Winners shorter than this are deferred for review.
    pub min_duration_secs: u64,
}

impl SyncOptions {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            forced_year: None,
            dry_run: false,
            min_duration_secs: DEFAULT_MIN_DURATION_SECS,
        }
    }
}

/// Progress events, consumed by the CLI.
#[derive(Debug, Clone)]
pub enum SyncEvent {
    Listing,
    Listed { total: usize },
    Selected { winners: usize },
    Processing { index: usize, total: usize, title: String },
    Finished,
}

/// Composes parser, state store and collaborators for a run.
pub struct Orchestrator<'a, M, D> {
    pub parser: &'a TitleParser,
    pub state: &'a StateStore,
    pub source: &'a M,
    pub downloader: &'a D,
    pub diag: &'a dyn Diagnostics,
    pub events: Option<mpsc::UnboundedSender<SyncEvent>>,
}

impl<'a, M: MetadataSource, D: Downloader> Orchestrator<'a, M, D> {
    pub fn new(
        parser: &'a TitleParser,
        state: &'a StateStore,
        source: &'a M,
        downloader: &'a D,
        diag: &'a dyn Diagnostics,
    ) -> Self {
        Self {
            parser,
            state,
            source,
            downloader,
            diag,
            events: None,
        }
    }

    pub fn with_events(mut self, tx: mpsc::UnboundedSender<SyncEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    fn emit(&self, event: SyncEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }

    /// Log a failed state write. The run goes on; the item will simply be
    /// seen again next time.
    fn persist(&self, what: &str, result: Result<impl Sized, StateError>) {
        if let Err(e) = result {
            self.diag.error(format!("Could not record {what}: {e}"));
        }
    }

    /// Run a full sync. Only failing to list the source or to read the
    /// archive aborts the run.
    pub async fn run(&self, options: &SyncOptions) -> Result<RunReport, SyncError> {
        let mut report = RunReport::new();

        self.emit(SyncEvent::Listing);
        let mut stubs = self
            .source
            .list(&options.source_url)
            .await
            .map_err(|e| SyncError::listing(&options.source_url, e))?;
        self.emit(SyncEvent::Listed { total: stubs.len() });
        self.diag
            .info(format!("Listed {} videos from {}", stubs.len(), options.source_url));

        let archive = self.state.archive()?;

        let ignored_ids = self.state.ignored.id_set();
        let before = stubs.len();
        stubs.retain(|s| !ignored_ids.contains(&s.id));
        report.set_previously_ignored(before - stubs.len());

        let collection = collect(
            &stubs,
            self.parser,
            options.forced_year.as_deref(),
            self.diag,
        );
        report.set_excluded(collection.excluded.len());

        for entry in &collection.ignored {
            report.add(
                &entry.id,
                &entry.title,
                Disposition::Ignored {
                    reason: entry.reason.clone(),
                },
            );
            if !options.dry_run {
                self.record_ignored(entry.clone());
            }
        }

        let selection = select(&collection.groups, &archive);
        report.set_conflicts(collection.conflicts);

        for rejection in &selection.rejections {
            let winner_id = rejection
                .detail("winner_id")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            report.add(
                &rejection.id,
                &rejection.title,
                Disposition::Superseded { winner_id },
            );
            if !options.dry_run {
                self.record_ignored(rejection.clone());
            }
        }

        for winner in &selection.archived {
            self.diag.debug(format!(
                "{} {} already archived as {}",
                winner.year, winner.group.name, winner.id
            ));
            report.add(&winner.id, &winner.title, Disposition::AlreadyArchived);
        }

        let total = selection.winners.len();
        self.emit(SyncEvent::Selected { winners: total });
        for (index, winner) in selection.winners.iter().enumerate() {
            self.emit(SyncEvent::Processing {
                index,
                total,
                title: winner.title.clone(),
            });
            let disposition = self.process_winner(winner, options).await;
            report.add(&winner.id, &winner.title, disposition);
        }

        self.emit(SyncEvent::Finished);
        Ok(report)
    }

    fn record_ignored(&self, entry: TrackingEntry) {
        let id = entry.id.clone();
        self.persist("ignored entry", self.state.ignored.append(entry));
        self.persist("deferred resolution", self.state.deferred.resolve(&id));
    }

    fn record_failure(&self, winner: &CandidateVideo, stage: &str, message: String) -> Disposition {
        self.diag
            .warn(format!("{stage} failed for {} ({}): {message}", winner.id, winner.title));
        let entry = TrackingEntry::for_stub(&winner.stub(), format!("{stage} failed: {message}"))
            .with_detail("stage", stage)
            .with_detail("year", winner.year.as_str())
            .with_detail("group", winner.group.name.as_str())
            .with_detail("failed_at", chrono::Local::now().to_rfc3339());
        self.persist("failure", self.state.failed.append(entry));
        self.persist("deferred resolution", self.state.deferred.resolve(&winner.id));
        Disposition::Failed {
            message: format!("{stage}: {message}"),
        }
    }

    async fn process_winner(&self, winner: &CandidateVideo, options: &SyncOptions) -> Disposition {
        let accepted = match self.state.deferred.status(&winner.id) {
            DeferredStatus::Pending => {
                return Disposition::Pending {
                    reason: "awaiting review".to_string(),
                };
            }
            DeferredStatus::Accepted => true,
            DeferredStatus::NotDeferred => false,
        };

        if options.dry_run {
            return Disposition::Pending {
                reason: format!(
                    "dry run: would download {} {} ({})",
                    winner.year,
                    winner.group.name,
                    winner.round_kind()
                ),
            };
        }

        let metadata = match self.source.fetch(&winner.url).await {
            Ok(m) => m,
            Err(e) => return self.record_failure(winner, "metadata", e.to_string()),
        };

        if !accepted {
            if let Some(reason) = review_reason(&metadata, options.min_duration_secs) {
                self.diag
                    .info(format!("Deferring {} ({}): {reason}", winner.id, winner.title));
                let mut entry = TrackingEntry::for_stub(&winner.stub(), reason.clone())
                    .with_detail("year", winner.year.as_str())
                    .with_detail("group", winner.group.name.as_str())
                    .with_detail("category", winner.group.category.as_str());
                if let Some(round) = &winner.round {
                    entry = entry.with_detail("round", round.as_str());
                }
                if let Some(d) = metadata.duration_seconds {
                    entry = entry.with_detail("duration_seconds", d);
                }
                self.persist("deferral", self.state.deferred.defer(entry));
                return Disposition::Deferred { reason };
            }
        }

        let archive_path = self.state.paths.archive();
        let request = DownloadRequest {
            candidate: winner,
            metadata: &metadata,
            archive: &archive_path,
        };
        match self.downloader.download(request).await {
            Ok(()) => {
                match self.state.failed.remove_by_id(&winner.id) {
                    Ok(0) => {}
                    Ok(n) => self
                        .diag
                        .info(format!("Retracted {n} earlier failure(s) for {}", winner.id)),
                    Err(e) => self.diag.error(format!(
                        "Could not retract earlier failures for {}: {e}",
                        winner.id
                    )),
                }
                self.persist("deferred resolution", self.state.deferred.resolve(&winner.id));
                Disposition::Downloaded
            }
            Err(e) => self.record_failure(winner, "download", e.to_string()),
        }
    }
}

/// Why a winner should wait for review, if it should.
fn review_reason(metadata: &VideoMetadata, min_duration_secs: u64) -> Option<String> {
    match metadata.duration_seconds {
        Some(d) if d < min_duration_secs => Some(format!(
            "duration {d}s is below the review minimum of {min_duration_secs}s"
        )),
        _ => None,
    }
}
