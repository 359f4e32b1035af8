//! Metadata source and downloader backed by the `yt-dlp` executable.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tablado_core::{CandidateVideo, Diagnostics, TitleStub};
use tokio::process::Command;

use crate::collaborator::{
    CollaboratorError, DownloadRequest, Downloader, MetadataSource, VideoMetadata,
};

/// Drives `yt-dlp` as a child process.
#[derive(Clone)]
pub struct YtDlp {
    program: PathBuf,
    output_dir: PathBuf,
    diag: Arc<dyn Diagnostics>,
}

impl std::fmt::Debug for YtDlp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YtDlp")
            .field("program", &self.program)
            .field("output_dir", &self.output_dir)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct FlatPlaylist {
    #[serde(default)]
    entries: Vec<FlatEntry>,
}

#[derive(Debug, Deserialize)]
struct FlatEntry {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoInfo {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    description: Option<String>,
}

impl YtDlp {
    pub fn new(
        program: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        diag: Arc<dyn Diagnostics>,
    ) -> Self {
        Self {
            program: program.into(),
            output_dir: output_dir.into(),
            diag,
        }
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }

    async fn run(&self, args: &[&str]) -> Result<Vec<u8>, CollaboratorError> {
        self.diag
            .debug(format!("Running {} {}", self.program_name(), args.join(" ")));
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .await
            .map_err(|e| CollaboratorError::Spawn {
                program: self.program_name(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(CollaboratorError::Failed {
                program: self.program_name(),
                status: output.status.to_string(),
                stderr: last_error_line(&String::from_utf8_lossy(&output.stderr)),
            });
        }
        Ok(output.stdout)
    }

    async fn run_json<T: DeserializeOwned>(&self, args: &[&str]) -> Result<T, CollaboratorError> {
        let stdout = self.run(args).await?;
        Ok(serde_json::from_slice(&stdout)?)
    }
}

/// The most useful line of yt-dlp's stderr: the last `ERROR:` line, or the
/// last non-empty line.
fn last_error_line(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    lines
        .iter()
        .rev()
        .find(|l| l.starts_with("ERROR:"))
        .or_else(|| lines.last())
        .map(|l| l.to_string())
        .unwrap_or_default()
}

fn watch_url(id: &str) -> String {
    format!("https://www.youtube.com/watch?v={id}")
}

/// Replace characters that are unsafe in a path component or meaningful to
/// yt-dlp's template syntax.
fn sanitize_component(s: &str) -> String {
    let cleaned: String = s
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    cleaned.trim().trim_end_matches('.').replace('%', "%%")
}

/// Output template: `<out>/<year>/<category>/<group>/<year> - <group> - <round>.%(ext)s`.
pub fn output_template(output_dir: &Path, candidate: &CandidateVideo) -> PathBuf {
    let year = sanitize_component(&candidate.year);
    let category = sanitize_component(&candidate.group.category);
    let group = sanitize_component(&candidate.group.name);
    let round = sanitize_component(&candidate.round_kind().to_string());
    output_dir
        .join(&year)
        .join(category)
        .join(&group)
        .join(format!("{year} - {group} - {round}.%(ext)s"))
}

impl MetadataSource for YtDlp {
    async fn list(&self, url: &str) -> Result<Vec<TitleStub>, CollaboratorError> {
        let playlist: FlatPlaylist = self
            .run_json(&["--flat-playlist", "--playlist-reverse", "-J", url])
            .await?;
        Ok(playlist
            .entries
            .into_iter()
            .map(|e| {
                let url = e.url.unwrap_or_else(|| watch_url(&e.id));
                TitleStub::new(e.id, e.title.unwrap_or_default(), url)
            })
            .collect())
    }

    async fn fetch(&self, url: &str) -> Result<VideoMetadata, CollaboratorError> {
        let info: VideoInfo = self
            .run_json(&["-J", "--skip-download", "--no-playlist", url])
            .await?;
        Ok(VideoMetadata {
            id: info.id,
            title: info.title,
            duration_seconds: info.duration.map(|d| d.max(0.0).round() as u64),
            description: info.description,
        })
    }
}

impl Downloader for YtDlp {
    async fn download(&self, request: DownloadRequest<'_>) -> Result<(), CollaboratorError> {
        let template = output_template(&self.output_dir, request.candidate);
        let template = template.to_string_lossy().into_owned();
        let archive = request.archive.to_string_lossy().into_owned();
        self.run(&[
            "--download-archive",
            archive.as_str(),
            "--no-playlist",
            "--embed-metadata",
            "-o",
            template.as_str(),
            request.candidate.url.as_str(),
        ])
        .await?;
        Ok(())
    }
}
