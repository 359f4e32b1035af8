//! Persistent bookkeeping shared across sync runs.
//!
//! All state lives in one directory:
//! ```text
//! state_dir/
//!   archive.txt     ids already downloaded (written by the downloader only)
//!   ignored.json    permanently ignored titles
//!   failed.json     transient failures, retried on later runs
//!   deferred.json   winners waiting for operator review
//! ```
//! Every collection is read, modified and rewritten as a whole. Access from
//! more than one process at a time is not supported.

pub mod archive;
pub mod deferred;
pub mod error;
pub mod store;
pub mod tracking;

pub use archive::ArchiveSet;
pub use deferred::{DeferredQueue, DeferredStatus};
pub use error::StateError;
pub use store::{StatePaths, StateStore};
pub use tracking::{TrackingCollection, TrackingEntry};
