//! Failure-link propagation
//!
//! Resolves every node's failure link, appends the outputs inherited through
//! it, and replaces every missing transition so the goto function is total.
//!
//! Nodes are resolved strictly in level order: a node's failure chain only
//! ever points at shallower nodes, so once a level is done every node the
//! next level can reach through a failure walk is final.
//!
//! Two variants produce byte-identical arenas:
//! - [`propagate_sequential`] drains a FIFO queue and mutates in place
//! - [`propagate_parallel`] splits each level across scoped worker threads.
//!   Workers only read the arena and record their writes in a private
//!   [`LevelBuffer`]; once every worker has joined, the buffers are applied in
//!   worker order and their discovered children become the next level.

use std::collections::VecDeque;
use std::thread;

use log::trace;

use crate::trie::{NodeArena, NO_STATE};
use crate::{PatternId, StateId, ROOT};

/// Frontier slices smaller than this are not worth a thread
const MIN_NODES_PER_WORKER: usize = 64;

/// Resolve the root and collect the first level.
///
/// Depth-1 nodes fail to the root and every missing root transition becomes
/// a self-loop, which is what terminates all later failure walks.
fn seed_root(arena: &mut NodeArena) -> Vec<StateId> {
    arena.failure[ROOT as usize] = ROOT;

    let mut level = Vec::new();
    for entry in arena.row_mut(ROOT) {
        if *entry == NO_STATE {
            *entry = ROOT;
        } else {
            level.push(*entry);
        }
    }

    for &child in &level {
        arena.failure[child as usize] = ROOT;
    }
    level
}

/// Walk the failure chain from `state` to the first node with a transition
/// on `symbol` and return that transition's target
#[inline]
fn follow_failure(arena: &NodeArena, mut state: StateId, symbol: usize) -> StateId {
    loop {
        let next = arena.transition(state, symbol);
        if next != NO_STATE {
            return next;
        }
        state = arena.failure[state as usize];
    }
}

/// Append the outputs of `from` to those of `child`
fn inherit_outputs(outputs: &mut [Vec<PatternId>], child: StateId, from: StateId) {
    let (child, from) = (child as usize, from as usize);
    debug_assert_ne!(child, from);

    if outputs[from].is_empty() {
        return;
    }

    if child < from {
        let (low, high) = outputs.split_at_mut(from);
        low[child].extend_from_slice(&high[0]);
    } else {
        let (low, high) = outputs.split_at_mut(child);
        high[0].extend_from_slice(&low[from]);
    }
}

/// Classic breadth-first propagation on the calling thread
pub(crate) fn propagate_sequential(arena: &mut NodeArena) {
    let mut queue: VecDeque<StateId> = seed_root(arena).into();

    while let Some(state) = queue.pop_front() {
        let fail = arena.failure[state as usize];

        for symbol in 0..arena.width {
            let child = arena.transition(state, symbol);

            if child == NO_STATE {
                // fail is shallower, so its row is already total
                let fallback = follow_failure(arena, fail, symbol);
                arena.row_mut(state)[symbol] = fallback;
                continue;
            }

            let child_fail = follow_failure(arena, fail, symbol);
            arena.failure[child as usize] = child_fail;
            inherit_outputs(&mut arena.outputs, child, child_fail);
            queue.push_back(child);
        }
    }
}

/// Writes produced by one worker for its slice of a level
#[derive(Debug, Default)]
struct LevelBuffer {
    /// Processed nodes, in slice order
    nodes: Vec<StateId>,
    /// Totalized rows for `nodes`, `width` entries each
    rows: Vec<StateId>,
    /// (child, failure target) for every explicit child, in discovery order
    links: Vec<(StateId, StateId)>,
    /// Outputs each child inherits, concatenated
    inherited: Vec<PatternId>,
    /// End offset in `inherited` for each entry of `links`
    inherited_ends: Vec<usize>,
}

impl LevelBuffer {
    fn with_capacity(nodes: usize, width: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            rows: Vec::with_capacity(nodes * width),
            links: Vec::new(),
            inherited: Vec::new(),
            inherited_ends: Vec::new(),
        }
    }
}

/// Resolve one slice of a level against a read-only arena
fn process_slice(arena: &NodeArena, slice: &[StateId]) -> LevelBuffer {
    let width = arena.width;
    let mut buffer = LevelBuffer::with_capacity(slice.len(), width);

    for &state in slice {
        let fail = arena.failure[state as usize];
        let row_start = buffer.rows.len();
        buffer.nodes.push(state);
        buffer.rows.extend_from_slice(arena.row(state));

        for symbol in 0..width {
            let child = buffer.rows[row_start + symbol];

            if child == NO_STATE {
                buffer.rows[row_start + symbol] = follow_failure(arena, fail, symbol);
                continue;
            }

            let child_fail = follow_failure(arena, fail, symbol);
            buffer.links.push((child, child_fail));
            buffer
                .inherited
                .extend_from_slice(&arena.outputs[child_fail as usize]);
            buffer.inherited_ends.push(buffer.inherited.len());
        }
    }

    buffer
}

/// Apply one worker's buffer and append its children to the next level
fn apply_buffer(arena: &mut NodeArena, buffer: LevelBuffer, next_level: &mut Vec<StateId>) {
    let width = arena.width;

    for (state, row) in buffer.nodes.iter().zip(buffer.rows.chunks_exact(width.max(1))) {
        arena.row_mut(*state).copy_from_slice(row);
    }

    let mut start = 0;
    for (&(child, child_fail), &end) in buffer.links.iter().zip(&buffer.inherited_ends) {
        arena.failure[child as usize] = child_fail;
        arena.outputs[child as usize].extend_from_slice(&buffer.inherited[start..end]);
        next_level.push(child);
        start = end;
    }
}

/// Split a level across up to `workers` scoped threads
fn process_level(
    arena: &NodeArena,
    level: &[StateId],
    workers: usize,
    min_nodes_per_worker: usize,
) -> Vec<LevelBuffer> {
    let workers = workers
        .min(level.len().div_ceil(min_nodes_per_worker.max(1)))
        .max(1);

    if workers == 1 {
        return vec![process_slice(arena, level)];
    }

    let per_worker = level.len().div_ceil(workers);
    thread::scope(|scope| {
        let handles: Vec<_> = level
            .chunks(per_worker)
            .map(|slice| scope.spawn(move || process_slice(arena, slice)))
            .collect();

        // Joining every handle is the barrier between levels
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
            })
            .collect()
    })
}

/// Level-synchronous propagation over `workers` threads
pub(crate) fn propagate_parallel(arena: &mut NodeArena, workers: usize) {
    propagate_parallel_with_grain(arena, workers, MIN_NODES_PER_WORKER);
}

pub(crate) fn propagate_parallel_with_grain(
    arena: &mut NodeArena,
    workers: usize,
    min_nodes_per_worker: usize,
) {
    let mut level = seed_root(arena);
    let mut depth = 1;

    while !level.is_empty() {
        let buffers = process_level(arena, &level, workers, min_nodes_per_worker);
        trace!(
            "Resolved level {}: {} nodes across {} buffers",
            depth,
            level.len(),
            buffers.len()
        );

        let mut next_level = Vec::with_capacity(level.len());
        for buffer in buffers {
            apply_buffer(arena, buffer, &mut next_level);
        }

        level = next_level;
        depth += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::{encode_pattern, TrieBuilder};
    use crate::Alphabet;

    fn trie(patterns: &[&str]) -> NodeArena {
        let alphabet = Alphabet::lowercase_ascii();
        let mut builder = TrieBuilder::new(alphabet.len());
        for (id, pattern) in patterns.iter().enumerate() {
            let symbols = encode_pattern(&alphabet, id as PatternId, pattern.as_bytes()).unwrap();
            builder.add_pattern(&symbols).unwrap();
        }
        builder.finish().0
    }

    fn state_of(arena: &NodeArena, word: &str) -> StateId {
        word.bytes()
            .fold(ROOT, |state, byte| arena.transition(state, (byte - b'a') as usize))
    }

    const CLASSIC: &[&str] = &["he", "she", "his", "hers"];

    #[test]
    fn test_sequential_failure_links() {
        let mut arena = trie(CLASSIC);
        propagate_sequential(&mut arena);

        assert_eq!(arena.failure[ROOT as usize], ROOT);
        assert_eq!(arena.failure[state_of(&arena, "h") as usize], ROOT);
        assert_eq!(arena.failure[state_of(&arena, "s") as usize], ROOT);
        assert_eq!(
            arena.failure[state_of(&arena, "sh") as usize],
            state_of(&arena, "h")
        );
        assert_eq!(
            arena.failure[state_of(&arena, "she") as usize],
            state_of(&arena, "he")
        );
        assert_eq!(
            arena.failure[state_of(&arena, "his") as usize],
            state_of(&arena, "s")
        );
    }

    #[test]
    fn test_outputs_inherited_through_failure() {
        let mut arena = trie(CLASSIC);
        propagate_sequential(&mut arena);

        let she = state_of(&arena, "she") as usize;
        // local "she" first, then inherited "he"
        assert_eq!(arena.outputs[she], vec![1, 0]);
        assert_eq!(arena.outputs[state_of(&arena, "hers") as usize], vec![3]);
    }

    #[test]
    fn test_goto_is_total() {
        let mut arena = trie(CLASSIC);
        propagate_sequential(&mut arena);
        assert!(arena.goto.iter().all(|&target| target != NO_STATE));

        // "x" loops back to root, "sx" falls back through root as well
        assert_eq!(arena.transition(ROOT, (b'x' - b'a') as usize), ROOT);
        let she = state_of(&arena, "she");
        assert_eq!(
            arena.transition(she, (b'r' - b'a') as usize),
            state_of(&arena, "her")
        );
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let patterns = [
            "a", "ab", "bc", "abcab", "bca", "cab", "caba", "aaaa", "baba", "abab", "cc", "ccc",
        ];

        let mut expected = trie(&patterns);
        propagate_sequential(&mut expected);

        for workers in [1, 2, 3, 8] {
            let mut actual = trie(&patterns);
            propagate_parallel_with_grain(&mut actual, workers, 1);
            assert_eq!(actual.goto, expected.goto, "goto differs with {} workers", workers);
            assert_eq!(actual.failure, expected.failure);
            assert_eq!(actual.outputs, expected.outputs);
        }
    }

    #[test]
    fn test_parallel_default_grain() {
        let mut expected = trie(CLASSIC);
        propagate_sequential(&mut expected);

        let mut actual = trie(CLASSIC);
        propagate_parallel(&mut actual, 4);
        assert_eq!(actual.goto, expected.goto);
        assert_eq!(actual.outputs, expected.outputs);
    }

    #[test]
    fn test_root_only() {
        let mut arena = trie(&[]);
        propagate_parallel_with_grain(&mut arena, 4, 1);
        assert!(arena.goto.iter().all(|&target| target == ROOT));
    }
}
