use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Position of a block in the sequence index (0-based).
///
/// The persisted progress map is keyed by the decimal form of this value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(u32);

impl BlockId {
    /// Creates a new `BlockId`
    #[must_use]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the underlying u32 value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Returns the id as a slice index.
    #[must_use]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Row position inside the word store.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowId(usize);

impl RowId {
    /// Creates a new `RowId`
    #[must_use]
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    /// Returns the underlying row index
    #[must_use]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockId({})", self.0)
    }
}

impl fmt::Debug for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RowId({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

/// Error type for parsing ID from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for BlockId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u32>()
            .map(BlockId::new)
            .map_err(|_| ParseIdError {
                kind: "BlockId".to_string(),
            })
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_id_display() {
        let id = BlockId::new(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(format!("{id:?}"), "BlockId(42)");
    }

    #[test]
    fn test_block_id_from_str() {
        let id: BlockId = "123".parse().unwrap();
        assert_eq!(id, BlockId::new(123));
        assert_eq!(id.index(), 123);
    }

    #[test]
    fn test_block_id_from_str_invalid() {
        assert!("not-a-number".parse::<BlockId>().is_err());
        assert!("-1".parse::<BlockId>().is_err());
        assert!("".parse::<BlockId>().is_err());
    }

    #[test]
    fn test_row_id_display() {
        let id = RowId::new(7);
        assert_eq!(id.to_string(), "7");
        assert_eq!(format!("{id:?}"), "RowId(7)");
    }

    #[test]
    fn test_id_roundtrip() {
        let original = BlockId::new(42);
        let serialized = original.to_string();
        let deserialized: BlockId = serialized.parse().unwrap();
        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_block_id_serializes_as_number() {
        assert_eq!(serde_json::to_string(&BlockId::new(9)).unwrap(), "9");
        let id: BlockId = serde_json::from_str("9").unwrap();
        assert_eq!(id, BlockId::new(9));
    }
}
