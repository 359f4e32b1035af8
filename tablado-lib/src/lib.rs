//! Run-level logic: candidate grouping and selection, the external
//! collaborators, and the sync orchestrator that ties them to the state
//! store.

pub mod collaborator;
pub mod error;
pub mod events;
pub mod report;
pub mod selection;
pub mod settings;
pub mod sync;
pub mod ytdlp;

pub use collaborator::{CollaboratorError, DownloadRequest, Downloader, MetadataSource, VideoMetadata};
pub use error::SyncError;
pub use events::run_with_events;
pub use report::{Disposition, ReportEntry, RunReport, RunSummary};
pub use selection::{Collection, GroupedCandidates, Selection, YearConflict, collect, select};
pub use settings::Settings;
pub use sync::{Orchestrator, SyncEvent, SyncOptions};
pub use ytdlp::YtDlp;

pub use tablado_catalog::{Catalog, TitleParser};
pub use tablado_core::{CandidateVideo, Diagnostics, GroupRef, LogDiagnostics, ParsedRecord, Round, TitleStub};
pub use tablado_state::{StateStore, TrackingEntry};
