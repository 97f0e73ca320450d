mod block;
mod ids;
mod progress;
mod target;
mod word_store;

pub use ids::{BlockId, ParseIdError, RowId};

pub use block::{BLOCK_LEN, Block, Boundary, SequenceIndex, TARGETS_PER_BLOCK};
pub use progress::{BlockProgress, ProgressBook, ProgressStats};
pub use target::{HintKind, HintMode, Target};
pub use word_store::{ANAGRAM_DISPLAY_LIMIT, AnagramList, WordRow, WordStore, WordStoreError};
