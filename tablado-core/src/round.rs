//! Competition rounds and their priority order.

use std::fmt;

use crate::normalize::normalize;

/// A round of the competition, ordered by priority.
///
/// `None < Primera < Segunda < Liguilla`. A later round is the better
/// recording of the same performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Round {
    #[default]
    None,
    Primera,
    Segunda,
    Liguilla,
}

/// Normalized keyword variants for each round, checked highest priority first.
const ROUND_KEYWORDS: &[(Round, &[&str])] = &[
    (Round::Liguilla, &["liguilla"]),
    (Round::Segunda, &["segundarueda", "2darueda"]),
    (Round::Primera, &["primerarueda", "1rarueda", "1erarueda"]),
];

impl Round {
    /// Classify free text by normalized substring containment.
    ///
    /// Prefixed or suffixed labels still classify ("Liguilla 2019 - Final"
    /// is `Liguilla`). Unrecognized text is `Round::None`.
    pub fn classify(text: &str) -> Self {
        let norm = normalize(text);
        Self::classify_normalized(&norm)
    }

    /// Same as [`Round::classify`] for already-normalized text.
    pub fn classify_normalized(norm: &str) -> Self {
        if norm.is_empty() {
            return Round::None;
        }
        ROUND_KEYWORDS
            .iter()
            .find(|(_, keys)| keys.iter().any(|k| norm.contains(k)))
            .map(|(round, _)| *round)
            .unwrap_or(Round::None)
    }

    /// Priority of an optional round label. Absent labels rank lowest.
    pub fn priority_of(label: Option<&str>) -> u8 {
        label.map(Self::classify).unwrap_or_default().priority()
    }

    pub fn priority(self) -> u8 {
        match self {
            Round::None => 0,
            Round::Primera => 1,
            Round::Segunda => 2,
            Round::Liguilla => 3,
        }
    }

    /// Display label used when a round is recovered from keywords alone.
    pub fn label(self) -> Option<&'static str> {
        match self {
            Round::None => None,
            Round::Primera => Some("Primera Rueda"),
            Round::Segunda => Some("Segunda Rueda"),
            Round::Liguilla => Some("Liguilla"),
        }
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().unwrap_or("Sin rueda"))
    }
}
