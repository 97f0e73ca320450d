//! Word normalization and the sorted-letter signature ("tirage").
//!
//! Both functions must be bit-reproducible: matching a learner's input against
//! a target, and looking words up in the anagram index, depend on them.

use std::cmp::Ordering;

/// The single apostrophe every apostrophe-like glyph is folded into.
pub const CANONICAL_APOSTROPHE: char = '\'';

const APOSTROPHE_VARIANTS: [char; 4] = ['\u{2019}', '\'', '`', '\u{00B4}'];

/// Normalizes a word for comparison.
///
/// Trims, uppercases, drops every whitespace character and folds apostrophe
/// variants into [`CANONICAL_APOSTROPHE`]. Applying it twice yields the same
/// string as applying it once.
#[must_use]
pub fn normalize_word(raw: &str) -> String {
    raw.trim()
        .to_uppercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| {
            if APOSTROPHE_VARIANTS.contains(&c) {
                CANONICAL_APOSTROPHE
            } else {
                c
            }
        })
        .collect()
}

/// Returns the letter bag of a word: its normalized characters in collation order.
///
/// Any two words made of the same multiset of characters share a tirage.
#[must_use]
pub fn tirage(word: &str) -> String {
    let mut letters: Vec<char> = normalize_word(word).chars().collect();
    letters.sort_by(|a, b| compare_chars(*a, *b));
    letters.into_iter().collect()
}

/// Orders two characters the way French dictionary collation does for
/// single uppercase glyphs: punctuation, then digits, then letters by base
/// letter with accented forms after the plain one.
#[must_use]
pub fn compare_chars(a: char, b: char) -> Ordering {
    collation_key(a).cmp(&collation_key(b))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum CharClass {
    Punctuation,
    Digit,
    Letter,
    Other,
}

fn collation_key(c: char) -> (CharClass, char, u8, char) {
    if let Some((base, accent)) = decompose_latin(c) {
        return (CharClass::Letter, base, accent, c);
    }
    let class = if c.is_alphabetic() {
        CharClass::Letter
    } else if c.is_numeric() {
        CharClass::Digit
    } else if c.is_ascii_punctuation() || c.is_whitespace() || c.is_control() {
        CharClass::Punctuation
    } else {
        CharClass::Other
    };
    (class, c, 0, c)
}

/// Maps an uppercase Latin letter to its base letter and an accent rank.
///
/// Ranks follow the secondary weights of the common collation tables:
/// none < acute < grave < circumflex < diaeresis < tilde < ring < cedilla,
/// with ligatures sorted after every single-letter variant of their first letter.
fn decompose_latin(c: char) -> Option<(char, u8)> {
    const NONE: u8 = 0;
    const ACUTE: u8 = 1;
    const GRAVE: u8 = 2;
    const CIRCUMFLEX: u8 = 3;
    const DIAERESIS: u8 = 4;
    const TILDE: u8 = 5;
    const RING: u8 = 6;
    const CEDILLA: u8 = 7;
    const LIGATURE: u8 = 8;

    let decomposed = match c {
        'A'..='Z' => (c, NONE),
        'Á' => ('A', ACUTE),
        'À' => ('A', GRAVE),
        'Â' => ('A', CIRCUMFLEX),
        'Ä' => ('A', DIAERESIS),
        'Ã' => ('A', TILDE),
        'Å' => ('A', RING),
        'Æ' => ('A', LIGATURE),
        'Ç' => ('C', CEDILLA),
        'É' => ('E', ACUTE),
        'È' => ('E', GRAVE),
        'Ê' => ('E', CIRCUMFLEX),
        'Ë' => ('E', DIAERESIS),
        'Í' => ('I', ACUTE),
        'Ì' => ('I', GRAVE),
        'Î' => ('I', CIRCUMFLEX),
        'Ï' => ('I', DIAERESIS),
        'Ñ' => ('N', TILDE),
        'Ó' => ('O', ACUTE),
        'Ò' => ('O', GRAVE),
        'Ô' => ('O', CIRCUMFLEX),
        'Ö' => ('O', DIAERESIS),
        'Õ' => ('O', TILDE),
        'Œ' => ('O', LIGATURE),
        'Ú' => ('U', ACUTE),
        'Ù' => ('U', GRAVE),
        'Û' => ('U', CIRCUMFLEX),
        'Ü' => ('U', DIAERESIS),
        'Ý' => ('Y', ACUTE),
        'Ÿ' => ('Y', DIAERESIS),
        _ => return None,
    };
    Some(decomposed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_uppercases_and_strips_spaces() {
        assert_eq!(normalize_word("  pomme de terre \t"), "POMMEDETERRE");
        assert_eq!(normalize_word("éléphant"), "ÉLÉPHANT");
        assert_eq!(normalize_word(""), "");
        assert_eq!(normalize_word(" \n "), "");
    }

    #[test]
    fn normalize_folds_apostrophes() {
        let expected = "AUJOURD'HUI";
        for raw in ["aujourd’hui", "aujourd'hui", "aujourd`hui", "aujourd´hui"] {
            assert_eq!(normalize_word(raw), expected, "input {raw:?}");
        }
    }

    #[test]
    fn normalize_handles_mixed_input_deterministically() {
        let once = normalize_word(" Ʊéléphant’s ");
        assert_eq!(once, "ƱÉLÉPHANT'S");
        assert_eq!(normalize_word(&once), once);
    }

    #[test]
    fn normalize_is_idempotent() {
        let samples = [
            "abc",
            " Straße ",
            "L’ÉTÉ indien",
            "ǆungla",
            "ﬁn",
            "naïve  café",
            "ÿ",
            "a\u{00A0}b",
        ];
        for raw in samples {
            let once = normalize_word(raw);
            assert_eq!(normalize_word(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn tirage_sorts_letters() {
        assert_eq!(tirage("chien"), "CEHIN");
        assert_eq!(tirage("niche"), "CEHIN");
        assert_eq!(tirage("chine"), tirage("chien"));
    }

    #[test]
    fn tirage_places_accents_after_base_letter() {
        assert_eq!(tirage("été"), "ÉÉT");
        assert_eq!(tirage("eéf"), "EÉF");
        assert_eq!(tirage("fée"), "EÉF");
        assert_eq!(tirage("çab"), "ABÇ");
        assert_eq!(tirage("cçd"), "CÇD");
    }

    #[test]
    fn tirage_places_punctuation_and_digits_first() {
        assert_eq!(tirage("l'a"), "'AL");
        assert_eq!(tirage("b2a"), "2AB");
        assert_eq!(tirage("porte-clé"), "-CEÉLOPRT");
    }

    #[test]
    fn tirage_is_permutation_invariant() {
        let words = ["ÉCRAN", "CRÂNE", "NACRE", "CARNE", "RANCE", "ANCRE"];
        let expected = tirage("ancre");
        for word in &words[2..] {
            assert_eq!(tirage(word), expected, "word {word}");
        }
        assert_ne!(tirage(words[0]), expected);
        assert_ne!(tirage(words[1]), expected);
    }
}
