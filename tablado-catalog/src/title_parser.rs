//! Title parsing cascade.
//!
//! Video titles are freeform, but most follow one of a few layouts:
//! ```text
//! 4ta Etapa 2020 - Cayó La Cabra - Primera Rueda      (dated)
//! 2da Etapa - Falta y Resto - Liguilla                (undated)
//! 3A ETAPA LA GRAN MUÑECA LIGUILLA                    (legacy, 2015 only)
//! Agarrate Catalina 2019 | Liguilla | Carnaval        (anything else)
//! ```
//! Each layout is a [`Recognizer`]. The parser runs them in order and takes
//! the first complete record. A recognizer that matches structurally but
//! cannot resolve a field passes, so looser recognizers later in the chain
//! still get a chance.

use std::sync::LazyLock;

use regex::Regex;
use tablado_core::{Diagnostics, ParsedRecord, Round, normalize};

use crate::catalog::Catalog;
use crate::matcher::{DEFAULT_THRESHOLD, find_best_match};

/// Everything a recognizer needs besides the title.
pub struct ParseContext<'a> {
    pub catalog: &'a Catalog,
    pub threshold: f64,
    pub diag: &'a dyn Diagnostics,
}

/// Result of running one recognizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recognition {
    /// The title is fully handled; stop here.
    Complete(ParsedRecord),
    /// The title must not be parsed at all.
    Excluded,
    /// Try the next recognizer.
    Pass,
}

/// One stage of the cascade.
pub trait Recognizer: Send + Sync {
    /// Short stage name, shown by `tablado parse`.
    fn name(&self) -> &'static str;

    fn recognize(&self, title: &str, ctx: &ParseContext<'_>) -> Recognition;
}

/// A parse together with the stage that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    pub record: ParsedRecord,
    /// Name of the recognizer that completed, `None` if nothing did.
    pub stage: Option<&'static str>,
    pub excluded: bool,
}

/// Ordered cascade of recognizers bound to a catalog.
pub struct TitleParser {
    catalog: Catalog,
    threshold: f64,
    recognizers: Vec<Box<dyn Recognizer>>,
}

impl TitleParser {
    /// The standard five-stage cascade.
    pub fn standard(catalog: Catalog) -> Self {
        Self::with_recognizers(
            catalog,
            vec![
                Box::new(ExclusionFilter),
                Box::new(DatedEtapa),
                Box::new(UndatedEtapa),
                Box::new(LegacyLiguilla),
                Box::new(GeneralFallback),
            ],
        )
    }

    pub fn with_recognizers(catalog: Catalog, recognizers: Vec<Box<dyn Recognizer>>) -> Self {
        Self {
            catalog,
            threshold: DEFAULT_THRESHOLD,
            recognizers,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Parse a title. Never fails; unusable titles give the empty record.
    pub fn parse(&self, title: &str, diag: &dyn Diagnostics) -> ParsedRecord {
        self.parse_traced(title, diag).record
    }

    /// Parse a title and report which stage produced the result.
    pub fn parse_traced(&self, title: &str, diag: &dyn Diagnostics) -> ParseOutcome {
        let ctx = ParseContext {
            catalog: &self.catalog,
            threshold: self.threshold,
            diag,
        };

        for recognizer in &self.recognizers {
            match recognizer.recognize(title, &ctx) {
                Recognition::Complete(record) => {
                    return ParseOutcome {
                        record,
                        stage: Some(recognizer.name()),
                        excluded: false,
                    };
                }
                Recognition::Excluded => {
                    diag.debug(format!("Excluded by {}: {title:?}", recognizer.name()));
                    return ParseOutcome {
                        record: ParsedRecord::empty(),
                        stage: None,
                        excluded: true,
                    };
                }
                Recognition::Pass => {}
            }
        }

        ParseOutcome {
            record: ParsedRecord::empty(),
            stage: None,
            excluded: false,
        }
    }
}

// ── Exclusion ───────────────────────────────────────────────────────────────

/// Normalized keywords marking titles that are never competition performances:
/// admission trials, parades and roll-calls.
const EXCLUDED_KEYWORDS: &[&str] = &[
    "pruebadeadmision",
    "pruebasdeadmision",
    "desfile",
    "llamadas",
];

/// Normalized bodies of bracketed platform placeholders.
const PLACEHOLDERS: &[&str] = &["privatevideo", "deletedvideo", "videoprivado", "videoeliminado"];

/// True for empty titles, blacklisted event types and platform placeholders
/// such as `[Private video]`.
pub fn is_excluded(title: &str) -> bool {
    let trimmed = title.trim();
    let norm = normalize(trimmed);
    if norm.is_empty() {
        return true;
    }
    if EXCLUDED_KEYWORDS.iter().any(|k| norm.contains(k)) {
        return true;
    }
    trimmed.starts_with('[') && trimmed.ends_with(']') && PLACEHOLDERS.contains(&norm.as_str())
}

/// Stage 1: stop immediately on titles that must not be parsed.
pub struct ExclusionFilter;

impl Recognizer for ExclusionFilter {
    fn name(&self) -> &'static str {
        "exclusion"
    }

    fn recognize(&self, title: &str, _ctx: &ParseContext<'_>) -> Recognition {
        if is_excluded(title) {
            Recognition::Excluded
        } else {
            Recognition::Pass
        }
    }
}

// ── Explicit "Etapa" layouts ────────────────────────────────────────────────

/// `<ordinal> Etapa <year> - <name> - <round>`
static DATED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*\d{1,2}\s*[a-zºª°.]*\s*etapa\s+(\d{4})\s*[-–—]\s*(.+?)\s*[-–—]\s*(.+?)\s*$")
        .expect("static pattern")
});

/// `<ordinal> Etapa - <name> - <round>`
static UNDATED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*\d{1,2}\s*[a-zºª°.]*\s*etapa\s*[-–—]\s*(.+?)\s*[-–—]\s*(.+?)\s*$")
        .expect("static pattern")
});

/// `<1-6>[A] ETAPA <name> LIGUILLA`
static LEGACY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*[1-6]\s*a?\s+etapa\s+(.+?)\s+liguilla\s*$").expect("static pattern")
});

/// Year the legacy layout was used.
const LEGACY_YEAR: &str = "2015";

/// Resolve the name and round segments shared by both explicit layouts.
fn resolve_explicit(
    year: Option<&str>,
    name: &str,
    round_phrase: &str,
    ctx: &ParseContext<'_>,
) -> Recognition {
    if Round::classify(round_phrase) == Round::None {
        return Recognition::Pass;
    }
    let Some(found) = find_best_match(name, ctx.catalog, ctx.threshold, ctx.diag) else {
        ctx.diag
            .debug(format!("Explicit layout, but no catalog match for {name:?}"));
        return Recognition::Pass;
    };
    Recognition::Complete(ParsedRecord {
        year: year.map(str::to_string),
        group: Some(found.group),
        round: Some(round_phrase.trim().to_string()),
        is_alternative_format: true,
    })
}

/// Stage 2: explicit dated layout.
pub struct DatedEtapa;

impl Recognizer for DatedEtapa {
    fn name(&self) -> &'static str {
        "dated-etapa"
    }

    fn recognize(&self, title: &str, ctx: &ParseContext<'_>) -> Recognition {
        let Some(caps) = DATED_RE.captures(title) else {
            return Recognition::Pass;
        };
        resolve_explicit(Some(&caps[1]), &caps[2], &caps[3], ctx)
    }
}

/// Stage 3: explicit layout without a year. The caller supplies the year.
pub struct UndatedEtapa;

impl Recognizer for UndatedEtapa {
    fn name(&self) -> &'static str {
        "undated-etapa"
    }

    fn recognize(&self, title: &str, ctx: &ParseContext<'_>) -> Recognition {
        let Some(caps) = UNDATED_RE.captures(title) else {
            return Recognition::Pass;
        };
        resolve_explicit(None, &caps[1], &caps[2], ctx)
    }
}

/// Stage 4: the 2015 upload batch, which always named the Liguilla.
pub struct LegacyLiguilla;

impl Recognizer for LegacyLiguilla {
    fn name(&self) -> &'static str {
        "legacy-liguilla"
    }

    fn recognize(&self, title: &str, ctx: &ParseContext<'_>) -> Recognition {
        let Some(caps) = LEGACY_RE.captures(title) else {
            return Recognition::Pass;
        };
        match find_best_match(&caps[1], ctx.catalog, ctx.threshold, ctx.diag) {
            Some(found) => Recognition::Complete(ParsedRecord {
                year: Some(LEGACY_YEAR.to_string()),
                group: Some(found.group),
                round: Round::Liguilla.label().map(str::to_string),
                is_alternative_format: true,
            }),
            None => Recognition::Pass,
        }
    }
}

// ── Fallback ────────────────────────────────────────────────────────────────

/// A plausible performance year anywhere in the title, not part of a longer
/// number.
static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^0-9])(19[89][0-9]|20[0-9]{2})(?:[^0-9]|$)").expect("static pattern")
});

/// Extract the first year in 1980-2099 from a title.
pub fn extract_year(title: &str) -> Option<String> {
    YEAR_RE.captures(title).map(|caps| caps[1].to_string())
}

/// Stage 5: year, group and round found independently anywhere in the title.
pub struct GeneralFallback;

impl Recognizer for GeneralFallback {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn recognize(&self, title: &str, ctx: &ParseContext<'_>) -> Recognition {
        let year = extract_year(title);
        let group = find_best_match(title, ctx.catalog, ctx.threshold, ctx.diag).map(|m| m.group);
        if year.is_none() || group.is_none() {
            ctx.diag.debug(format!(
                "Fallback could not resolve {title:?} (year: {}, group: {})",
                year.as_deref().unwrap_or("-"),
                group.as_ref().map(|g| g.name.as_str()).unwrap_or("-"),
            ));
            return Recognition::Pass;
        }
        Recognition::Complete(ParsedRecord {
            year,
            group,
            round: Round::classify(title).label().map(str::to_string),
            is_alternative_format: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_extraction_bounds() {
        assert_eq!(extract_year("Carnaval 2019"), Some("2019".into()));
        assert_eq!(extract_year("1985 Agarrate"), Some("1985".into()));
        assert_eq!(extract_year("Catalina_2012_Liguilla"), Some("2012".into()));
        assert_eq!(extract_year("Año 1979"), None);
        assert_eq!(extract_year("Vista 21000"), None);
        assert_eq!(extract_year("3A ETAPA"), None);
    }

    #[test]
    fn exclusion_keywords() {
        assert!(is_excluded(""));
        assert!(is_excluded("   "));
        assert!(is_excluded("Prueba de Admisión 2020 - Murga X"));
        assert!(is_excluded("Desfile inaugural 2019"));
        assert!(is_excluded("Llamadas 2018 - Comparsa"));
        assert!(is_excluded("[Private video]"));
        assert!(is_excluded("[Deleted video]"));
        assert!(!is_excluded("Agarrate Catalina 2019"));
        assert!(!is_excluded("[Reupload] Agarrate Catalina 2019"));
    }

    #[test]
    fn dated_pattern_shape() {
        let caps = DATED_RE
            .captures("4ta Etapa 2020 - Cayo La Cabra - Primera Rueda")
            .unwrap();
        assert_eq!(&caps[1], "2020");
        assert_eq!(&caps[2], "Cayo La Cabra");
        assert_eq!(&caps[3], "Primera Rueda");
        assert!(DATED_RE.captures("4ta Etapa - Cayo La Cabra - Liguilla").is_none());
    }

    #[test]
    fn legacy_pattern_digit_range() {
        assert!(LEGACY_RE.is_match("3A ETAPA LA GRAN MUÑECA LIGUILLA"));
        assert!(LEGACY_RE.is_match("6 etapa Araca la Cana liguilla"));
        assert!(!LEGACY_RE.is_match("7A ETAPA LA GRAN MUÑECA LIGUILLA"));
    }
}
