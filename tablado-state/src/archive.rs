//! Read-only view of the downloader's archive file.
//!
//! Each line holds whitespace-separated tokens and the last token is the id
//! (`youtube dQw4w9WgXcQ`). Blank lines are ignored.

use std::collections::HashSet;
use std::path::Path;

use crate::error::StateError;

/// Ids that have been fully handled.
#[derive(Debug, Clone, Default)]
pub struct ArchiveSet {
    ids: HashSet<String>,
}

impl ArchiveSet {
    /// Load the archive file. A missing file is an empty archive.
    pub fn load(path: &Path) -> Result<Self, StateError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(Self::parse(&contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(StateError::io(path, e)),
        }
    }

    pub fn parse(contents: &str) -> Self {
        let ids = contents
            .lines()
            .filter_map(|line| line.split_whitespace().last())
            .map(str::to_string)
            .collect();
        Self { ids }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<String> for ArchiveSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_token_is_id() {
        let archive = ArchiveSet::parse("youtube abc123\nyoutube   def456  \n\n   \nbare\n");
        assert_eq!(archive.len(), 3);
        assert!(archive.contains("abc123"));
        assert!(archive.contains("def456"));
        assert!(archive.contains("bare"));
        assert!(!archive.contains("youtube"));
    }

    #[test]
    fn missing_file_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = ArchiveSet::load(&tmp.path().join("archive.txt")).unwrap();
        assert!(archive.is_empty());
    }
}
