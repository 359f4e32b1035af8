//! The state directory and the collections inside it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tablado_core::Diagnostics;

use crate::archive::ArchiveSet;
use crate::deferred::DeferredQueue;
use crate::error::StateError;
use crate::tracking::TrackingCollection;

/// File locations inside a state directory.
#[derive(Debug, Clone)]
pub struct StatePaths {
    dir: PathBuf,
}

impl StatePaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn archive(&self) -> PathBuf {
        self.dir.join("archive.txt")
    }

    pub fn ignored(&self) -> PathBuf {
        self.dir.join("ignored.json")
    }

    pub fn failed(&self) -> PathBuf {
        self.dir.join("failed.json")
    }

    pub fn deferred(&self) -> PathBuf {
        self.dir.join("deferred.json")
    }
}

/// All persistent collections for one state directory.
#[derive(Debug, Clone)]
pub struct StateStore {
    pub paths: StatePaths,
    pub ignored: TrackingCollection,
    pub failed: TrackingCollection,
    pub deferred: DeferredQueue,
}

impl StateStore {
    pub fn open(dir: impl Into<PathBuf>, diag: Arc<dyn Diagnostics>) -> Self {
        let paths = StatePaths::new(dir);
        Self {
            ignored: TrackingCollection::new(paths.ignored(), diag.clone()),
            failed: TrackingCollection::new(paths.failed(), diag.clone()),
            deferred: DeferredQueue::new(TrackingCollection::new(paths.deferred(), diag)),
            paths,
        }
    }

    /// Load the downloader's archive as it is right now.
    pub fn archive(&self) -> Result<ArchiveSet, StateError> {
        ArchiveSet::load(&self.paths.archive())
    }
}
