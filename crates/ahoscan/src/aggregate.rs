//! Merging per-worker results
//!
//! Worker slots are concatenated in chunk order, each keeping its own
//! discovery order. Chunks own disjoint, ascending ranges of start offsets,
//! so every match of chunk `i` starts before every match of chunk `i + 1`.

use ahoscan_ac::MatchRecord;

use crate::scan::MatchSlot;

/// Final ordering applied to merged results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchOrder {
    /// Chunk order, then discovery order inside each chunk (no sorting)
    #[default]
    Discovery,
    /// Stable sort by `(start, pattern_id)`
    ByStart,
}

/// Concatenate worker slots in chunk order and apply `order`
pub fn aggregate(slots: Vec<MatchSlot>, order: MatchOrder) -> Vec<MatchRecord> {
    let total = slots.iter().map(|slot| slot.len()).sum();
    let mut matches = Vec::with_capacity(total);

    for slot in slots {
        matches.extend(slot.into_inner());
    }

    if order == MatchOrder::ByStart {
        sort_by_start(&mut matches);
    }
    matches
}

/// Stable sort by `(start, pattern_id)`
pub fn sort_by_start(matches: &mut [MatchRecord]) {
    matches.sort_by_key(|record| (record.start, record.pattern_id));
}
