use std::path::Path;

use crate::selection::YearConflict;

/// What happened to one item during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum Disposition {
    Downloaded,
    Superseded { winner_id: String },
    Ignored { reason: String },
    Deferred { reason: String },
    Failed { message: String },
    AlreadyArchived,
    /// Left for later: awaiting review, or a dry run.
    Pending { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    pub id: String,
    pub title: String,
    pub disposition: Disposition,
}

/// Collects every disposition of a sync run and writes a log file.
#[derive(Debug, Default)]
pub struct RunReport {
    entries: Vec<ReportEntry>,
    conflicts: Vec<YearConflict>,
    excluded: usize,
    previously_ignored: usize,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: impl Into<String>, title: impl Into<String>, disposition: Disposition) {
        self.entries.push(ReportEntry {
            id: id.into(),
            title: title.into(),
            disposition,
        });
    }

    pub fn set_conflicts(&mut self, conflicts: Vec<YearConflict>) {
        self.conflicts = conflicts;
    }

    pub fn set_excluded(&mut self, count: usize) {
        self.excluded = count;
    }

    pub fn set_previously_ignored(&mut self, count: usize) {
        self.previously_ignored = count;
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn conflicts(&self) -> &[YearConflict] {
        &self.conflicts
    }

    /// Disposition recorded for an id, if any.
    pub fn disposition_of(&self, id: &str) -> Option<&Disposition> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.disposition)
    }

    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary {
            excluded: self.excluded,
            previously_ignored: self.previously_ignored,
            year_conflicts: self.conflicts.len(),
            ..Default::default()
        };
        for entry in &self.entries {
            match entry.disposition {
                Disposition::Downloaded => summary.downloaded += 1,
                Disposition::Superseded { .. } => summary.superseded += 1,
                Disposition::Ignored { .. } => summary.ignored += 1,
                Disposition::Deferred { .. } => summary.deferred += 1,
                Disposition::Failed { .. } => summary.failed += 1,
                Disposition::AlreadyArchived => summary.already_archived += 1,
                Disposition::Pending { .. } => summary.pending += 1,
            }
        }
        summary
    }

    /// Write the report to a text file.
    pub fn write_to_file(&self, path: &Path) -> std::io::Result<()> {
        use std::io::Write;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::File::create(path)?;
        let summary = self.summary();

        writeln!(file, "=== Sync Log ===")?;
        writeln!(
            file,
            "Date: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(file)?;
        writeln!(file, "--- Summary ---")?;
        writeln!(file, "Downloaded: {}", summary.downloaded)?;
        writeln!(file, "Already archived: {}", summary.already_archived)?;
        writeln!(file, "Superseded: {}", summary.superseded)?;
        writeln!(file, "Ignored: {}", summary.ignored)?;
        writeln!(file, "Deferred: {}", summary.deferred)?;
        writeln!(file, "Failed: {}", summary.failed)?;
        writeln!(file, "Pending: {}", summary.pending)?;
        writeln!(file, "Excluded titles: {}", summary.excluded)?;
        writeln!(file, "Previously ignored: {}", summary.previously_ignored)?;
        writeln!(file, "Year conflicts: {}", summary.year_conflicts)?;
        writeln!(file)?;

        if !self.conflicts.is_empty() {
            writeln!(file, "--- Year conflicts ---")?;
            for c in &self.conflicts {
                writeln!(
                    file,
                    "{} \"{}\": title says {}, used {}",
                    c.id, c.title, c.parsed, c.forced
                )?;
            }
            writeln!(file)?;
        }

        writeln!(file, "--- Details ---")?;
        writeln!(file)?;
        for entry in &self.entries {
            match &entry.disposition {
                Disposition::Downloaded => {
                    writeln!(file, "[OK] {} \"{}\"", entry.id, entry.title)?;
                }
                Disposition::AlreadyArchived => {
                    writeln!(file, "[ARCHIVED] {} \"{}\"", entry.id, entry.title)?;
                }
                Disposition::Superseded { winner_id } => {
                    writeln!(
                        file,
                        "[SUPERSEDED] {} \"{}\" (kept {})",
                        entry.id, entry.title, winner_id
                    )?;
                }
                Disposition::Ignored { reason } => {
                    writeln!(file, "[IGNORED] {} \"{}\": {}", entry.id, entry.title, reason)?;
                }
                Disposition::Deferred { reason } => {
                    writeln!(file, "[DEFERRED] {} \"{}\": {}", entry.id, entry.title, reason)?;
                }
                Disposition::Failed { message } => {
                    writeln!(file, "[FAILED] {} \"{}\"", entry.id, entry.title)?;
                    writeln!(file, "     Error: {}", message)?;
                }
                Disposition::Pending { reason } => {
                    writeln!(file, "[PENDING] {} \"{}\": {}", entry.id, entry.title, reason)?;
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub downloaded: usize,
    pub already_archived: usize,
    pub superseded: usize,
    pub ignored: usize,
    pub deferred: usize,
    pub failed: usize,
    pub pending: usize,
    pub excluded: usize,
    pub previously_ignored: usize,
    pub year_conflicts: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_each_disposition() {
        let mut report = RunReport::new();
        report.add("a", "A", Disposition::Downloaded);
        report.add("b", "B", Disposition::Superseded { winner_id: "a".into() });
        report.add("c", "C", Disposition::Failed { message: "boom".into() });
        report.add("d", "D", Disposition::Failed { message: "boom".into() });
        report.set_excluded(4);

        let s = report.summary();
        assert_eq!(s.downloaded, 1);
        assert_eq!(s.superseded, 1);
        assert_eq!(s.failed, 2);
        assert_eq!(s.excluded, 4);
        assert_eq!(report.disposition_of("a"), Some(&Disposition::Downloaded));
        assert_eq!(report.disposition_of("zz"), None);
    }

    #[test]
    fn writes_log_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("logs").join("sync.txt");
        let mut report = RunReport::new();
        report.add("a", "Agarrate Catalina 2019", Disposition::Downloaded);
        report.add("b", "Resumen", Disposition::Ignored { reason: "unresolved: year, group".into() });
        report.write_to_file(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Downloaded: 1"));
        assert!(text.contains("[IGNORED] b \"Resumen\": unresolved: year, group"));
    }
}
