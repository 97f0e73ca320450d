use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::model::BlockId;

/// Persisted progress of a single block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockProgress {
    /// The block has been presented at least once.
    pub seen: bool,
    /// Local calendar day of the most recent presentation.
    pub last_seen: Option<NaiveDate>,
    /// Completed in a session that used no aid. Never reset once set.
    pub validated: bool,
    /// The latest run on this block used no aid so far.
    pub no_help: bool,
}

impl Default for BlockProgress {
    fn default() -> Self {
        Self {
            seen: false,
            last_seen: None,
            validated: false,
            no_help: true,
        }
    }
}

impl BlockProgress {
    /// Record a presentation on `day`.
    pub fn mark_presented(&mut self, day: NaiveDate) {
        self.seen = true;
        self.last_seen = Some(day);
    }

    /// Record that an aid was used on the current run.
    pub fn mark_aided(&mut self) {
        self.no_help = false;
    }

    /// Record a completed run. A validated block stays validated.
    pub fn mark_completed(&mut self, clean: bool) {
        self.no_help = clean;
        self.validated = self.validated || clean;
    }
}

/// Seen/validated counters over the whole sequence index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressStats {
    pub total: usize,
    pub seen: usize,
    pub validated: usize,
}

impl ProgressStats {
    /// Share of seen blocks, rounded to the nearest whole percent.
    #[must_use]
    pub fn seen_percent(&self) -> u32 {
        percent(self.seen, self.total)
    }

    /// Share of validated blocks, rounded to the nearest whole percent.
    #[must_use]
    pub fn validated_percent(&self) -> u32 {
        percent(self.validated, self.total)
    }

    #[must_use]
    pub fn all_validated(&self) -> bool {
        self.validated >= self.total
    }
}

fn percent(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let rounded = (count.saturating_mul(200) + total) / (2 * total);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

/// Progress of every block that has a record, keyed by block id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressBook {
    entries: BTreeMap<BlockId, BlockProgress>,
}

impl ProgressBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: BlockId) -> Option<&BlockProgress> {
        self.entries.get(&id)
    }

    /// Record for `id`, created with defaults when absent.
    pub fn entry(&mut self, id: BlockId) -> &mut BlockProgress {
        self.entries.entry(id).or_default()
    }

    pub fn insert(&mut self, id: BlockId, progress: BlockProgress) {
        self.entries.insert(id, progress);
    }

    pub fn iter(&self) -> impl Iterator<Item = (BlockId, &BlockProgress)> {
        self.entries.iter().map(|(id, progress)| (*id, progress))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Counters over blocks `0..total`; records for ids past `total` are ignored.
    #[must_use]
    pub fn stats(&self, total: usize) -> ProgressStats {
        let mut stats = ProgressStats {
            total,
            ..ProgressStats::default()
        };
        let known = self
            .iter()
            .filter(|(id, _)| id.index() < total)
            .map(|(_, progress)| progress);
        for progress in known {
            if progress.seen {
                stats.seen += 1;
            }
            if progress.validated {
                stats.validated += 1;
            }
        }
        stats
    }

    #[must_use]
    pub fn all_validated(&self, total: usize) -> bool {
        self.stats(total).all_validated()
    }
}

impl FromIterator<(BlockId, BlockProgress)> for ProgressBook {
    fn from_iter<I: IntoIterator<Item = (BlockId, BlockProgress)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
