use crate::model::{BlockId, RowId, Target, WordRow, WordStore};

/// Rows in one block: a leading boundary, the targets, a trailing boundary.
pub const BLOCK_LEN: usize = 12;

/// Interior rows the learner has to find in each block.
pub const TARGETS_PER_BLOCK: usize = BLOCK_LEN - 2;

/// A contiguous run of `BLOCK_LEN` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    start: RowId,
}

impl Block {
    #[must_use]
    pub fn start(&self) -> RowId {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> RowId {
        RowId::new(self.start.value() + BLOCK_LEN - 1)
    }

    /// Rows strictly between the two boundaries.
    pub fn target_rows(&self) -> impl Iterator<Item = RowId> {
        let first = self.start.value() + 1;
        (first..first + TARGETS_PER_BLOCK).map(RowId::new)
    }
}

/// Which boundary of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Start,
    End,
}

/// Partition of the word store into complete blocks.
///
/// Trailing rows that do not fill a whole block are left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceIndex {
    blocks: Vec<Block>,
}

impl SequenceIndex {
    /// Partition `row_count` rows into blocks.
    #[must_use]
    pub fn new(row_count: usize) -> Self {
        let blocks = (0..row_count / BLOCK_LEN)
            .map(|i| Block {
                start: RowId::new(i * BLOCK_LEN),
            })
            .collect();
        Self { blocks }
    }

    #[must_use]
    pub fn for_store(store: &WordStore) -> Self {
        Self::new(store.len())
    }

    /// Number of blocks (`TOTAL`).
    #[must_use]
    pub fn total(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: BlockId) -> Option<Block> {
        self.blocks.get(id.index()).copied()
    }

    pub fn ids(&self) -> impl Iterator<Item = BlockId> + '_ {
        (0..self.blocks.len()).filter_map(|i| u32::try_from(i).ok().map(BlockId::new))
    }

    /// Derive the targets of a block from the store.
    ///
    /// Returns `None` if the block id is unknown or the store is shorter than
    /// the index it was built from.
    #[must_use]
    pub fn targets(&self, id: BlockId, store: &WordStore) -> Option<Vec<Target>> {
        let block = self.get(id)?;
        block
            .target_rows()
            .map(|row| store.row(row).map(Target::from_row))
            .collect()
    }

    /// Row shown as a boundary of a block.
    #[must_use]
    pub fn boundary<'a>(
        &self,
        id: BlockId,
        side: Boundary,
        store: &'a WordStore,
    ) -> Option<&'a WordRow> {
        let block = self.get(id)?;
        let row = match side {
            Boundary::Start => block.start(),
            Boundary::End => block.end(),
        };
        store.row(row)
    }
}
