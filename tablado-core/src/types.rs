//! Records flowing through one sync run.

use serde::{Deserialize, Serialize};

use crate::round::Round;

/// One raw item from the source listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleStub {
    pub id: String,
    pub title: String,
    pub url: String,
}

impl TitleStub {
    pub fn new(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
        }
    }
}

/// A resolved catalog group: the name as it appears in the catalog plus its
/// category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupRef {
    pub name: String,
    pub category: String,
}

impl GroupRef {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
        }
    }
}

/// Structured facts extracted from a title.
///
/// Only records with both `year` and `group` resolved are usable; anything
/// else is treated as a parse failure by the collector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRecord {
    pub year: Option<String>,
    pub group: Option<GroupRef>,
    /// Round label as written in the title (or a canonical label when the
    /// round was recovered from keywords).
    pub round: Option<String>,
    /// True when the title followed one of the explicit "Etapa" layouts.
    pub is_alternative_format: bool,
}

impl ParsedRecord {
    /// The record every failed parse produces.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_complete(&self) -> bool {
        self.year.is_some() && self.group.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.year.is_none() && self.group.is_none() && self.round.is_none()
    }

    /// Names of the unresolved fields required for a usable record.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.year.is_none() {
            missing.push("year");
        }
        if self.group.is_none() {
            missing.push("group");
        }
        missing
    }

    pub fn round_kind(&self) -> Round {
        self.round.as_deref().map(Round::classify).unwrap_or_default()
    }
}

/// A fully resolved video competing with its `(year, group)` siblings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateVideo {
    pub id: String,
    pub title: String,
    pub url: String,
    pub year: String,
    pub group: GroupRef,
    pub round: Option<String>,
    pub is_alternative_format: bool,
    pub round_priority: u8,
}

impl CandidateVideo {
    /// Build a candidate from a stub and its parse. Returns `None` unless a
    /// year (parsed or supplied) and a group are both resolved.
    pub fn from_parts(stub: &TitleStub, parsed: &ParsedRecord, year: Option<&str>) -> Option<Self> {
        let year = year.or(parsed.year.as_deref())?;
        let group = parsed.group.clone()?;
        Some(Self {
            id: stub.id.clone(),
            title: stub.title.clone(),
            url: stub.url.clone(),
            year: year.to_string(),
            group,
            round: parsed.round.clone(),
            is_alternative_format: parsed.is_alternative_format,
            round_priority: Round::priority_of(parsed.round.as_deref()),
        })
    }

    pub fn round_kind(&self) -> Round {
        self.round.as_deref().map(Round::classify).unwrap_or_default()
    }

    pub fn stub(&self) -> TitleStub {
        TitleStub::new(&self.id, &self.title, &self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: Option<&str>, group: Option<&str>, round: Option<&str>) -> ParsedRecord {
        ParsedRecord {
            year: year.map(str::to_string),
            group: group.map(|g| GroupRef::new(g, "Murgas")),
            round: round.map(str::to_string),
            is_alternative_format: false,
        }
    }

    #[test]
    fn missing_fields_reports_each() {
        assert_eq!(record(None, None, None).missing_fields(), vec!["year", "group"]);
        assert_eq!(record(Some("2019"), None, None).missing_fields(), vec!["group"]);
        assert_eq!(record(None, Some("X"), None).missing_fields(), vec!["year"]);
        assert!(record(Some("2019"), Some("X"), None).missing_fields().is_empty());
    }

    #[test]
    fn candidate_requires_year_and_group() {
        let stub = TitleStub::new("a1", "t", "u");
        assert!(CandidateVideo::from_parts(&stub, &record(None, Some("X"), None), None).is_none());
        assert!(CandidateVideo::from_parts(&stub, &record(Some("2019"), None, None), None).is_none());

        let c = CandidateVideo::from_parts(
            &stub,
            &record(Some("2019"), Some("X"), Some("Liguilla")),
            None,
        )
        .unwrap();
        assert_eq!(c.year, "2019");
        assert_eq!(c.round_priority, 3);
    }

    #[test]
    fn supplied_year_overrides_parsed() {
        let stub = TitleStub::new("a1", "t", "u");
        let c = CandidateVideo::from_parts(&stub, &record(Some("2018"), Some("X"), None), Some("2019"))
            .unwrap();
        assert_eq!(c.year, "2019");
        assert_eq!(c.round_priority, 0);

        let c = CandidateVideo::from_parts(&stub, &record(None, Some("X"), None), Some("2019")).unwrap();
        assert_eq!(c.year, "2019");
    }
}
