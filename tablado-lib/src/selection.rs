//! Grouping parsed candidates by `(year, group)` and picking one winner per
//! group.
//!
//! Several uploads usually cover the same performance: one per round, plus
//! re-uploads. Only the best-ranked one is kept; the rest are recorded as
//! superseded so a later run never reconsiders them.

use indexmap::IndexMap;
use tablado_catalog::{TitleParser, is_excluded};
use tablado_core::{CandidateVideo, Diagnostics, TitleStub};
use tablado_state::{ArchiveSet, TrackingEntry};

/// `year -> group name -> candidates in input order`. Years and groups keep
/// the order in which they were first seen in the listing, so winners come
/// out oldest first.
pub type GroupedCandidates = IndexMap<String, IndexMap<String, Vec<CandidateVideo>>>;

/// A parsed year overridden by the forced year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearConflict {
    pub id: String,
    pub title: String,
    pub parsed: String,
    pub forced: String,
}

/// Output of [`collect`].
#[derive(Debug, Default)]
pub struct Collection {
    pub groups: GroupedCandidates,
    /// Stubs whose year or group could not be resolved.
    pub ignored: Vec<TrackingEntry>,
    pub conflicts: Vec<YearConflict>,
    /// Titles skipped outright (placeholders, parades, admission trials).
    pub excluded: Vec<TitleStub>,
}

impl Collection {
    pub fn candidate_count(&self) -> usize {
        self.groups.values().flat_map(|g| g.values()).map(Vec::len).sum()
    }
}

/// Parse every stub and group the resolved ones.
///
/// `forced_year` fills in a missing year and overrides a conflicting one;
/// each override of a parsed year is reported in `conflicts`.
pub fn collect(
    stubs: &[TitleStub],
    parser: &TitleParser,
    forced_year: Option<&str>,
    diag: &dyn Diagnostics,
) -> Collection {
    let mut collection = Collection::default();

    for stub in stubs {
        if is_excluded(&stub.title) {
            diag.debug(format!("Skipping excluded title {:?} ({})", stub.title, stub.id));
            collection.excluded.push(stub.clone());
            continue;
        }

        let parsed = parser.parse(&stub.title, diag);

        if let (Some(parsed_year), Some(forced)) = (parsed.year.as_deref(), forced_year) {
            if parsed_year != forced {
                diag.info(format!(
                    "Year conflict for {}: title says {parsed_year}, using {forced}",
                    stub.id
                ));
                collection.conflicts.push(YearConflict {
                    id: stub.id.clone(),
                    title: stub.title.clone(),
                    parsed: parsed_year.to_string(),
                    forced: forced.to_string(),
                });
            }
        }

        match CandidateVideo::from_parts(stub, &parsed, forced_year) {
            Some(candidate) => {
                collection
                    .groups
                    .entry(candidate.year.clone())
                    .or_default()
                    .entry(candidate.group.name.clone())
                    .or_default()
                    .push(candidate);
            }
            None => {
                let mut missing = Vec::new();
                if forced_year.is_none() && parsed.year.is_none() {
                    missing.push("year");
                }
                if parsed.group.is_none() {
                    missing.push("group");
                }
                let mut entry =
                    TrackingEntry::for_stub(stub, format!("unresolved: {}", missing.join(", ")));
                if let Some(year) = &parsed.year {
                    entry = entry.with_detail("parsed_year", year.as_str());
                }
                if let Some(round) = &parsed.round {
                    entry = entry.with_detail("parsed_round", round.as_str());
                }
                collection.ignored.push(entry);
            }
        }
    }

    collection
}

/// Output of [`select`].
#[derive(Debug, Default)]
pub struct Selection {
    /// One candidate per group that still needs work.
    pub winners: Vec<CandidateVideo>,
    /// Every non-winning candidate, referencing its group's winner.
    pub rejections: Vec<TrackingEntry>,
    /// Winners already in the archive; their groups yield no work.
    pub archived: Vec<CandidateVideo>,
}

/// Pick the highest-priority candidate of each group.
///
/// Ties go to the first candidate seen. If the chosen winner is already
/// archived the group is finished: lower-ranked siblings are never
/// substituted in, even when they are not archived themselves.
pub fn select(groups: &GroupedCandidates, archive: &ArchiveSet) -> Selection {
    let mut selection = Selection::default();

    for (year, by_group) in groups {
        for (group, candidates) in by_group {
            let Some(winner) = pick_winner(candidates) else {
                continue;
            };

            for loser in candidates.iter().filter(|c| c.id != winner.id) {
                selection.rejections.push(
                    TrackingEntry::new(
                        &loser.id,
                        &loser.title,
                        &loser.url,
                        format!(
                            "superseded by {} ({}) for {year} {group}",
                            winner.id,
                            winner.round_kind()
                        ),
                    )
                    .with_detail("winner_id", winner.id.as_str())
                    .with_detail("year", year.as_str())
                    .with_detail("group", group.as_str())
                    .with_detail("round_priority", loser.round_priority)
                    .with_detail("winner_round_priority", winner.round_priority),
                );
            }

            if archive.contains(&winner.id) {
                selection.archived.push(winner.clone());
            } else {
                selection.winners.push(winner.clone());
            }
        }
    }

    selection
}

/// Maximum round priority, first seen on ties.
fn pick_winner(candidates: &[CandidateVideo]) -> Option<&CandidateVideo> {
    candidates.iter().fold(None, |best: Option<&CandidateVideo>, c| match best {
        Some(b) if b.round_priority >= c.round_priority => Some(b),
        _ => Some(c),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablado_catalog::Catalog;
    use tablado_core::{GroupRef, MemoryDiagnostics};

    fn candidate(id: &str, year: &str, group: &str, round: Option<&str>, priority: u8) -> CandidateVideo {
        CandidateVideo {
            id: id.into(),
            title: format!("{group} {year} {}", round.unwrap_or("")),
            url: format!("https://example.test/{id}"),
            year: year.into(),
            group: GroupRef::new(group, "Murgas"),
            round: round.map(str::to_string),
            is_alternative_format: false,
            round_priority: priority,
        }
    }

    fn grouped(candidates: Vec<CandidateVideo>) -> GroupedCandidates {
        let mut groups = GroupedCandidates::new();
        for c in candidates {
            groups
                .entry(c.year.clone())
                .or_default()
                .entry(c.group.name.clone())
                .or_default()
                .push(c);
        }
        groups
    }

    fn three_rounds() -> GroupedCandidates {
        grouped(vec![
            candidate("p1", "2019", "Agarrate Catalina", Some("Primera Rueda"), 1),
            candidate("p2", "2019", "Agarrate Catalina", Some("Segunda Rueda"), 2),
            candidate("p3", "2019", "Agarrate Catalina", Some("Liguilla"), 3),
        ])
    }

    #[test]
    fn highest_priority_wins() {
        let selection = select(&three_rounds(), &ArchiveSet::default());
        assert_eq!(selection.winners.len(), 1);
        assert_eq!(selection.winners[0].id, "p3");

        assert_eq!(selection.rejections.len(), 2);
        for r in &selection.rejections {
            assert_eq!(r.detail("winner_id").and_then(|v| v.as_str()), Some("p3"));
            assert!(r.reason.contains("p3"));
        }
        let ids: Vec<_> = selection.rejections.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
    }

    #[test]
    fn archived_winner_blocks_group() {
        let archive: ArchiveSet = ["p3".to_string()].into_iter().collect();
        let selection = select(&three_rounds(), &archive);
        assert!(selection.winners.is_empty());
        assert_eq!(selection.archived.len(), 1);
        assert_eq!(selection.archived[0].id, "p3");
        assert_eq!(selection.rejections.len(), 2);
    }

    #[test]
    fn archived_loser_does_not_matter() {
        let archive: ArchiveSet = ["p1".to_string()].into_iter().collect();
        let selection = select(&three_rounds(), &archive);
        assert_eq!(selection.winners[0].id, "p3");
    }

    #[test]
    fn ties_keep_first_seen() {
        let groups = grouped(vec![
            candidate("a", "2020", "Falta y Resto", None, 0),
            candidate("b", "2020", "Falta y Resto", None, 0),
            candidate("c", "2020", "Falta y Resto", Some("Liguilla"), 3),
            candidate("d", "2020", "Falta y Resto", Some("Liguilla"), 3),
        ]);
        let selection = select(&groups, &ArchiveSet::default());
        assert_eq!(selection.winners[0].id, "c");
        assert_eq!(selection.rejections.len(), 3);
    }

    #[test]
    fn groups_are_independent() {
        let groups = grouped(vec![
            candidate("a", "2019", "Agarrate Catalina", Some("Liguilla"), 3),
            candidate("b", "2020", "Agarrate Catalina", Some("Primera Rueda"), 1),
            candidate("c", "2019", "Falta y Resto", None, 0),
        ]);
        let selection = select(&groups, &ArchiveSet::default());
        let mut ids: Vec<_> = selection.winners.iter().map(|w| w.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(selection.rejections.is_empty());
    }

    #[test]
    fn winners_follow_listing_order() {
        let groups = grouped(vec![
            candidate("z", "2021", "Falta y Resto", Some("Liguilla"), 3),
            candidate("m", "2019", "Agarrate Catalina", Some("Liguilla"), 3),
            candidate("a", "2021", "Agarrate Catalina", None, 0),
        ]);
        let selection = select(&groups, &ArchiveSet::default());
        let ids: Vec<_> = selection.winners.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "a", "m"]);
    }

    fn parser() -> TitleParser {
        TitleParser::standard(Catalog::from_pairs([(
            "Murgas",
            vec!["Agarrate Catalina", "Falta y Resto"],
        )]))
    }

    #[test]
    fn collect_groups_and_ignores() {
        let diag = MemoryDiagnostics::new();
        let stubs = vec![
            TitleStub::new("1", "Agarrate Catalina 2019 Primera Rueda", "u1"),
            TitleStub::new("2", "Agarrate Catalina 2019 Liguilla", "u2"),
            TitleStub::new("3", "Falta y Resto - Carnaval", "u3"),
            TitleStub::new("4", "Resumen 2019", "u4"),
            TitleStub::new("5", "[Private video]", "u5"),
        ];
        let collection = collect(&stubs, &parser(), None, &diag);

        assert_eq!(collection.candidate_count(), 2);
        assert_eq!(collection.groups["2019"]["Agarrate Catalina"].len(), 2);
        assert_eq!(collection.excluded.len(), 1);

        let reasons: Vec<_> = collection
            .ignored
            .iter()
            .map(|e| (e.id.as_str(), e.reason.as_str()))
            .collect();
        assert_eq!(
            reasons,
            vec![("3", "unresolved: year, group"), ("4", "unresolved: year, group")]
        );
    }

    #[test]
    fn forced_year_fills_and_overrides() {
        let diag = MemoryDiagnostics::new();
        let stubs = vec![
            TitleStub::new("1", "2da Etapa - Falta y Resto - Liguilla", "u1"),
            TitleStub::new("2", "Agarrate Catalina 2018 Liguilla", "u2"),
            TitleStub::new("3", "Agarrate Catalina 2020 Primera Rueda", "u3"),
        ];
        let collection = collect(&stubs, &parser(), Some("2020"), &diag);

        assert_eq!(collection.groups.len(), 1);
        let year = &collection.groups["2020"];
        assert_eq!(year["Falta y Resto"].len(), 1);
        assert_eq!(year["Agarrate Catalina"].len(), 2);

        assert_eq!(collection.conflicts.len(), 1);
        assert_eq!(collection.conflicts[0].id, "2");
        assert_eq!(collection.conflicts[0].parsed, "2018");
        assert!(diag.contains("Year conflict"));
    }

    #[test]
    fn undated_without_forced_year_is_ignored() {
        let diag = MemoryDiagnostics::new();
        let stubs = vec![TitleStub::new("1", "2da Etapa - Falta y Resto - Liguilla", "u1")];
        let collection = collect(&stubs, &parser(), None, &diag);
        assert_eq!(collection.candidate_count(), 0);
        assert_eq!(collection.ignored[0].reason, "unresolved: year");
        assert_eq!(
            collection.ignored[0].detail("parsed_round").and_then(|v| v.as_str()),
            Some("Liguilla")
        );
    }
}
