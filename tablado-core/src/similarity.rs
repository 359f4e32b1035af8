//! Edit-distance similarity over normalized text.

use crate::normalize::normalize;

/// Similarity of two strings in `[0, 1]`.
///
/// Both inputs are normalized first. If one normalized form contains the
/// other, the score is 1: short group names embedded in long titles should
/// count as a full match. Otherwise the score is
/// `(max_len - levenshtein) / max_len`.
///
/// Two empty inputs score 1. A single empty input scores 0, since the empty
/// string would otherwise be "contained" in everything.
///
/// ```
/// use tablado_core::similarity;
///
/// assert_eq!(similarity("Cayó La Cabra", "cayo la cabra"), 1.0);
/// assert_eq!(similarity("4ta Etapa 2020 Cayo La Cabra", "Cayó La Cabra"), 1.0);
/// assert!(similarity("Agarrate Catalina", "Agarrate Catalna") > 0.9);
/// ```
pub fn similarity(a: &str, b: &str) -> f64 {
    normalized_similarity(&normalize(a), &normalize(b))
}

/// Same as [`similarity`] for inputs that are already normalized.
pub fn normalized_similarity(a: &str, b: &str) -> f64 {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        _ => {}
    }

    if a.contains(b) || b.contains(a) {
        return 1.0;
    }

    let max_len = a.chars().count().max(b.chars().count());
    let distance = strsim::levenshtein(a, b);
    (max_len - distance) as f64 / max_len as f64
}
