use crate::model::WordRow;
use crate::normalize::{normalize_word, tirage};

/// A word the learner must find, derived from a block's interior row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub canonical: String,
    pub display: String,
    pub definition: Option<String>,
    pub extra: Option<String>,
    /// Normalized form used for matching submissions.
    pub normalized: String,
    /// Number of characters in the normalized form.
    pub length: usize,
    pub tirage: String,
}

impl Target {
    #[must_use]
    pub fn from_row(row: &WordRow) -> Self {
        let normalized = normalize_word(&row.canonical);
        Self {
            canonical: row.canonical.clone(),
            display: row.display.clone(),
            definition: row.definition.clone(),
            extra: row.extra.clone(),
            length: normalized.chars().count(),
            tirage: tirage(&normalized),
            normalized,
        }
    }
}

/// Kind of hint a learner can ask for on a hidden slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintKind {
    /// Number of letters.
    Length,
    /// The letters in sorted order.
    LetterBag,
}

/// Hint currently displayed on a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HintMode {
    #[default]
    None,
    Length,
    LetterBag,
}

impl HintMode {
    /// Toggle towards `kind`: asking for the hint already shown hides it.
    #[must_use]
    pub fn toggled(self, kind: HintKind) -> Self {
        let requested = HintMode::from(kind);
        if self == requested {
            HintMode::None
        } else {
            requested
        }
    }

    /// Text shown for this hint on `target`, if any.
    #[must_use]
    pub fn render(self, target: &Target) -> Option<String> {
        match self {
            HintMode::None => None,
            HintMode::Length => Some(target.length.to_string()),
            HintMode::LetterBag => Some(target.tirage.clone()),
        }
    }
}

impl From<HintKind> for HintMode {
    fn from(kind: HintKind) -> Self {
        match kind {
            HintKind::Length => HintMode::Length,
            HintKind::LetterBag => HintMode::LetterBag,
        }
    }
}
