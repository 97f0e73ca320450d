use std::collections::HashMap;

use thiserror::Error;

use crate::model::RowId;
use crate::normalize::{normalize_word, tirage};

/// Maximum number of anagrams listed next to a definition.
pub const ANAGRAM_DISPLAY_LIMIT: usize = 60;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WordStoreError {
    #[error("column `{column}` has {len} rows, expected {expected}")]
    Misaligned {
        column: &'static str,
        len: usize,
        expected: usize,
    },
}

/// One row of the word list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordRow {
    pub canonical: String,
    pub display: String,
    pub definition: Option<String>,
    pub extra: Option<String>,
}

impl WordRow {
    /// Row whose display form equals its canonical form and has no metadata.
    #[must_use]
    pub fn bare(canonical: impl Into<String>) -> Self {
        let canonical = canonical.into();
        Self {
            display: canonical.clone(),
            canonical,
            definition: None,
            extra: None,
        }
    }

    #[must_use]
    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = Some(definition.into());
        self
    }
}

/// Anagrams of a word, trimmed for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnagramList {
    pub shown: Vec<String>,
    /// How many further anagrams exist beyond `shown`.
    pub hidden: usize,
}

impl AnagramList {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }
}

/// Read-only word list: rows aligned by index plus an anagram index keyed by tirage.
#[derive(Debug, Clone, Default)]
pub struct WordStore {
    rows: Vec<WordRow>,
    anagrams: HashMap<String, Vec<String>>,
}

impl WordStore {
    /// Build a store from rows already assembled.
    #[must_use]
    pub fn from_rows(rows: Vec<WordRow>) -> Self {
        Self {
            rows,
            anagrams: HashMap::new(),
        }
    }

    /// Build a store from the parallel columns of the dataset.
    ///
    /// # Errors
    ///
    /// Returns `WordStoreError::Misaligned` if a column length differs from the
    /// canonical column.
    pub fn from_columns(
        canonical: Vec<String>,
        display: Vec<String>,
        definitions: Vec<Option<String>>,
        extra: Vec<Option<String>>,
    ) -> Result<Self, WordStoreError> {
        let expected = canonical.len();
        check_len("display", display.len(), expected)?;
        check_len("definitions", definitions.len(), expected)?;
        check_len("extra", extra.len(), expected)?;

        let rows = canonical
            .into_iter()
            .zip(display)
            .zip(definitions)
            .zip(extra)
            .map(|(((canonical, display), definition), extra)| WordRow {
                canonical,
                display,
                definition,
                extra,
            })
            .collect();

        Ok(Self::from_rows(rows))
    }

    /// Attach the anagram index (tirage → words).
    #[must_use]
    pub fn with_anagrams(mut self, anagrams: HashMap<String, Vec<String>>) -> Self {
        self.anagrams = anagrams;
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn row(&self, id: RowId) -> Option<&WordRow> {
        self.rows.get(id.value())
    }

    pub fn rows(&self) -> impl Iterator<Item = &WordRow> {
        self.rows.iter()
    }

    /// Anagrams of `word` other than the word itself.
    #[must_use]
    pub fn anagrams_of(&self, word: &str) -> AnagramList {
        let base = normalize_word(word);
        if base.is_empty() {
            return AnagramList::default();
        }
        let Some(candidates) = self.anagrams.get(&tirage(&base)) else {
            return AnagramList::default();
        };

        let others: Vec<&String> = candidates
            .iter()
            .filter(|candidate| normalize_word(candidate) != base)
            .collect();
        let hidden = others.len().saturating_sub(ANAGRAM_DISPLAY_LIMIT);
        let shown = others
            .into_iter()
            .take(ANAGRAM_DISPLAY_LIMIT)
            .cloned()
            .collect();

        AnagramList { shown, hidden }
    }
}

fn check_len(column: &'static str, len: usize, expected: usize) -> Result<(), WordStoreError> {
    if len == expected {
        Ok(())
    } else {
        Err(WordStoreError::Misaligned {
            column,
            len,
            expected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| (*w).to_string()).collect()
    }

    #[test]
    fn from_columns_aligns_rows() {
        let store = WordStore::from_columns(
            words(&["CHIEN", "CHAT"]),
            words(&["chien", "chat"]),
            vec![Some("animal qui aboie".into()), None],
            vec![None, Some("n.m.".into())],
        )
        .unwrap();

        assert_eq!(store.len(), 2);
        let chat = store.row(RowId::new(1)).unwrap();
        assert_eq!(chat.display, "chat");
        assert_eq!(chat.extra.as_deref(), Some("n.m."));
        assert!(store.row(RowId::new(2)).is_none());
    }

    #[test]
    fn from_columns_rejects_misaligned_columns() {
        let err = WordStore::from_columns(
            words(&["A", "B"]),
            words(&["a"]),
            vec![None, None],
            vec![None, None],
        )
        .unwrap_err();

        assert_eq!(
            err,
            WordStoreError::Misaligned {
                column: "display",
                len: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn anagrams_exclude_the_word_itself() {
        let mut index = HashMap::new();
        index.insert(tirage("CHIEN"), words(&["CHIEN", "CHINE", "NICHE"]));
        let store = WordStore::default().with_anagrams(index);

        let list = store.anagrams_of("chien");
        assert_eq!(list.shown, words(&["CHINE", "NICHE"]));
        assert_eq!(list.hidden, 0);

        assert!(store.anagrams_of("zèbre").is_empty());
        assert!(store.anagrams_of("   ").is_empty());
    }

    #[test]
    fn anagrams_are_capped_for_display() {
        let many: Vec<String> = (0..ANAGRAM_DISPLAY_LIMIT + 5)
            .map(|i| format!("W{i}"))
            .collect();
        let mut index = HashMap::new();
        index.insert(tirage("AB"), many);
        let store = WordStore::default().with_anagrams(index);

        let list = store.anagrams_of("BA");
        assert_eq!(list.shown.len(), ANAGRAM_DISPLAY_LIMIT);
        assert_eq!(list.hidden, 5);
    }
}
