//! Text canonicalization used for every fuzzy comparison.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Canonicalize text for comparison.
///
/// Lowercases, decomposes to NFD and drops combining marks, then keeps only
/// `[a-z0-9]`. Apostrophes, whitespace and punctuation all disappear.
///
/// ```
/// use tablado_core::normalize;
///
/// assert_eq!(normalize("Cayó La Cabra"), "cayolacabra");
/// assert_eq!(normalize("Don't  Stop!"), "dontstop");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_diacritics() {
        assert_eq!(normalize("Muñeca"), "muneca");
        assert_eq!(normalize("ÁÉÍÓÚ"), "aeiou");
        assert_eq!(normalize("Agárrate"), "agarrate");
    }

    #[test]
    fn drops_apostrophes_whitespace_and_symbols() {
        assert_eq!(normalize("  La  'Mojigata'  "), "lamojigata");
        assert_eq!(normalize("4ta Etapa 2020 - Primera Rueda"), "4taetapa2020primerarueda");
        assert_eq!(normalize("¡Hola! ¿Qué tal?"), "holaquetal");
    }

    #[test]
    fn non_latin_letters_are_removed() {
        assert_eq!(normalize("日本 abc"), "abc");
        assert_eq!(normalize("ß"), "");
    }

    #[test]
    fn idempotent() {
        for input in [
            "Cayó La Cabra",
            "3A ETAPA LA GRAN MUÑECA LIGUILLA",
            "[Private video]",
            "",
            "   ",
            "Ñandú 1999",
        ] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {input:?}");
        }
    }
}
