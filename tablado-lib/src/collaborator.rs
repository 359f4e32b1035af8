//! Interfaces to the external metadata source and downloader.

use std::future::Future;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tablado_core::{CandidateVideo, TitleStub};

/// Errors reported by an external collaborator.
#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    #[error("could not start {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("unexpected output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl CollaboratorError {
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

/// Fresh metadata for a single video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub id: String,
    pub title: String,
    pub duration_seconds: Option<u64>,
    pub description: Option<String>,
}

/// Lists and describes videos.
pub trait MetadataSource {
    /// All videos behind a channel or playlist URL, oldest first.
    fn list(&self, url: &str) -> impl Future<Output = Result<Vec<TitleStub>, CollaboratorError>>;

    /// Current metadata for one video.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<VideoMetadata, CollaboratorError>>;
}

/// Everything the downloader needs for one winner.
#[derive(Debug, Clone, Copy)]
pub struct DownloadRequest<'a> {
    pub candidate: &'a CandidateVideo,
    pub metadata: &'a VideoMetadata,
    /// Archive file the downloader appends the id to on success.
    pub archive: &'a Path,
}

/// Transfers a winning video.
pub trait Downloader {
    fn download(&self, request: DownloadRequest<'_>) -> impl Future<Output = Result<(), CollaboratorError>>;
}
