//! Loader for the word list file.
//!
//! The file holds parallel columns keyed by short names:
//! ```text
//! { "c": [canonical…], "e": [display…], "f": [definition…], "g": [extra…],
//!   "a": { "<tirage>": [word…] } }
//! ```
//! `e`, `f`, `g` and `a` may be omitted; empty strings in `f`/`g` mean "absent".

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use drill_core::model::{WordStore, WordStoreError};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WordSourceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] WordStoreError),
}

#[derive(Debug, Deserialize)]
struct WordListFile {
    c: Vec<String>,
    #[serde(default)]
    e: Vec<String>,
    #[serde(default)]
    f: Vec<Option<String>>,
    #[serde(default)]
    g: Vec<Option<String>>,
    #[serde(default)]
    a: HashMap<String, Vec<String>>,
}

/// Read a word list file into a `WordStore`.
///
/// # Errors
///
/// Returns `WordSourceError` if the file cannot be read, is not valid JSON, or
/// its columns are misaligned.
pub fn load_word_store(path: &Path) -> Result<WordStore, WordSourceError> {
    let contents = fs::read_to_string(path)?;
    let store = parse_word_store(&contents)?;
    tracing::info!(rows = store.len(), path = %path.display(), "loaded word list");
    Ok(store)
}

/// Parse word list JSON into a `WordStore`.
///
/// # Errors
///
/// Returns `WordSourceError` if the JSON is invalid or columns are misaligned.
pub fn parse_word_store(json: &str) -> Result<WordStore, WordSourceError> {
    let file: WordListFile = serde_json::from_str(json)?;
    let rows = file.c.len();

    let display = if file.e.is_empty() {
        file.c.clone()
    } else {
        file.e
    };
    let definitions = optional_column(file.f, rows);
    let extra = optional_column(file.g, rows);

    let store = WordStore::from_columns(file.c, display, definitions, extra)?;
    Ok(store.with_anagrams(file.a))
}

fn optional_column(values: Vec<Option<String>>, rows: usize) -> Vec<Option<String>> {
    if values.is_empty() {
        return vec![None; rows];
    }
    values
        .into_iter()
        .map(|value| value.filter(|text| !text.trim().is_empty()))
        .collect()
}
