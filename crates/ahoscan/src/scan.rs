//! Chunked parallel scanning
//!
//! The encoded text is split into `k` contiguous chunks of `ceil(L / k)`
//! symbols. Each worker owns one chunk but replays the automaton over a
//! window that extends `max_pattern_len - 1` symbols past the chunk end, so
//! a pattern that starts inside the chunk is always completed by its owner.
//!
//! Every worker starts at the root. That is exact, not an approximation: a
//! match is only kept when its start lies in the worker's own chunk, and
//! recognizing a pattern that starts at or after the window start never
//! depends on symbols before it.
//!
//! ```text
//! text     |---- chunk 0 ----|---- chunk 1 ----|---- chunk 2 --|
//! worker 0 [=================+~~~~)
//! worker 1                   [=================+~~~~)
//! worker 2                                     [===============)
//!                            owned = [===]   overlap = ~~~~
//! ```
//!
//! Each worker pushes into its own cache-line padded slot, so neighbouring
//! workers never contend for the same line while the scan runs.

use std::thread;

use ahoscan_ac::{check_worker_count, ACAutomaton, ACError, MatchRecord};
use crossbeam_utils::CachePadded;
use log::{debug, trace};

/// Per-worker result buffer, padded to its own cache line
pub type MatchSlot = CachePadded<Vec<MatchRecord>>;

/// Text region assigned to one worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// Worker / chunk index
    pub index: usize,
    /// First owned offset (also the replay start)
    pub start: usize,
    /// One past the last owned offset
    pub owned_end: usize,
    /// One past the last replayed offset
    pub window_end: usize,
}

impl Chunk {
    /// Whether a match starting at `offset` belongs to this chunk
    #[inline]
    pub fn owns(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.owned_end
    }

    /// Number of owned symbols
    pub fn owned_len(&self) -> usize {
        self.owned_end - self.start
    }

    /// Number of replayed symbols
    pub fn window_len(&self) -> usize {
        self.window_end - self.start
    }
}

/// Split `text_len` symbols across `workers` chunks
///
/// Chunks that would start at or past the end of the text are omitted, so
/// fewer than `workers` chunks come back for short texts and none for an
/// empty one. `workers` must be at least 1.
pub fn plan_chunks(text_len: usize, workers: usize, max_pattern_len: usize) -> Vec<Chunk> {
    if text_len == 0 || workers == 0 {
        return Vec::new();
    }

    let chunk_size = text_len.div_ceil(workers);
    let overlap = max_pattern_len.saturating_sub(1);

    (0..workers)
        .map(|index| (index, index * chunk_size))
        .take_while(|&(_, start)| start < text_len)
        .map(|(index, start)| Chunk {
            index,
            start,
            owned_end: (start + chunk_size).min(text_len),
            window_end: (start + chunk_size + overlap).min(text_len),
        })
        .collect()
}

/// Replay the automaton over one chunk's window, keeping owned matches
pub fn scan_chunk(ac: &ACAutomaton, symbols: &[u8], chunk: &Chunk, slot: &mut Vec<MatchRecord>) {
    let window = &symbols[chunk.start..chunk.window_end];

    ac.for_each_match(window, chunk.start, |end, pattern_id| {
        let record = ac.record(end, pattern_id);
        if chunk.owns(record.start) {
            slot.push(record);
        }
    });

    trace!(
        "Chunk {} [{}, {}) window end {}: {} matches",
        chunk.index,
        chunk.start,
        chunk.owned_end,
        chunk.window_end,
        slot.len()
    );
}

/// Scan encoded text with up to `workers` threads
///
/// Returns one slot per planned chunk, in chunk order. A single chunk runs on
/// the calling thread.
///
/// # Errors
///
/// [`ACError::InvalidWorkerCount`] when `workers` is zero.
pub fn scan_chunked(
    ac: &ACAutomaton,
    symbols: &[u8],
    workers: usize,
) -> Result<Vec<MatchSlot>, ACError> {
    let workers = check_worker_count(workers)?;
    let chunks = plan_chunks(symbols.len(), workers, ac.max_pattern_len());
    let mut slots: Vec<MatchSlot> = chunks
        .iter()
        .map(|_| CachePadded::new(Vec::new()))
        .collect();

    debug!(
        "Scanning {} symbols in {} chunks (requested {} workers, overlap {})",
        symbols.len(),
        chunks.len(),
        workers,
        ac.max_pattern_len().saturating_sub(1)
    );

    if chunks.len() <= 1 {
        for (chunk, slot) in chunks.iter().zip(slots.iter_mut()) {
            scan_chunk(ac, symbols, chunk, slot);
        }
        return Ok(slots);
    }

    // Every slot is written by exactly one worker; the scope joins them all
    thread::scope(|scope| {
        for (chunk, slot) in chunks.iter().zip(slots.iter_mut()) {
            scope.spawn(move || scan_chunk(ac, symbols, chunk, slot));
        }
    });

    Ok(slots)
}
