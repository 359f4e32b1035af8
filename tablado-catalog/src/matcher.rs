//! Best-match lookup of free text against the catalog.

use tablado_core::similarity::normalized_similarity;
use tablado_core::{Diagnostics, GroupRef, normalize};

use crate::catalog::Catalog;

/// Minimum similarity for a catalog match to be accepted.
pub const DEFAULT_THRESHOLD: f64 = 0.85;

/// Scores at or above this (but under the threshold) are reported as near
/// misses.
const NEAR_MISS_FLOOR: f64 = 0.6;

/// An accepted catalog match.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogMatch {
    pub group: GroupRef,
    pub score: f64,
}

/// Find the catalog entry most similar to `text`.
///
/// Every entry is scored; the first entry reaching the maximum wins ties.
/// The result is returned only when the maximum is at least `threshold`,
/// or when the normalized text equals an entry exactly. Near misses are
/// reported to `diag` and otherwise dropped.
pub fn find_best_match(
    text: &str,
    catalog: &Catalog,
    threshold: f64,
    diag: &dyn Diagnostics,
) -> Option<CatalogMatch> {
    let norm = normalize(text);
    if norm.is_empty() {
        return None;
    }

    let mut best: Option<(usize, f64)> = None;
    for (i, entry) in catalog.entries().iter().enumerate() {
        let score = normalized_similarity(&norm, &entry.normalized);
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((i, score));
        }
        if score >= 1.0 {
            // Nothing can beat a full match, and earlier entries win ties.
            break;
        }
    }

    let (index, score) = best?;
    let entry = &catalog.entries()[index];
    let exact = norm == entry.normalized;

    if score >= threshold || exact {
        return Some(CatalogMatch {
            group: entry.group_ref(),
            score,
        });
    }

    if score >= NEAR_MISS_FLOOR {
        diag.debug(format!(
            "Near miss: {text:?} ~ {:?} ({}) scored {score:.3}, below {threshold:.2}",
            entry.name, entry.category
        ));
    }
    None
}
