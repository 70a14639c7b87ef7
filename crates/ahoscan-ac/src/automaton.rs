//! The finished automaton
//!
//! [`ACAutomaton`] freezes the propagated arena into flat, read-only tables:
//! one transition row per node, one failure link per node and a single
//! pattern id array sliced per node by offset.

use std::fmt;
use std::time::Instant;

use log::debug;

use crate::failure::{propagate_parallel, propagate_sequential};
use crate::trie::{encode_pattern, NodeArena, TrieBuilder};
use crate::{
    check_worker_count, ACError, Alphabet, MatchRecord, PatternId, StateId, SymbolSource, ROOT,
};

/// Aho-Corasick automaton with a total goto function
///
/// Built once and never mutated afterwards. The type is `Send + Sync`, so a
/// shared reference can be handed to any number of scanning threads.
#[derive(Clone, PartialEq, Eq)]
pub struct ACAutomaton {
    alphabet: Alphabet,
    /// Row width (alphabet size)
    width: usize,
    /// Total transition table, `width` entries per node
    goto: Box<[StateId]>,
    /// Failure link per node
    failure: Box<[StateId]>,
    /// Distance from root per node
    depth: Box<[u32]>,
    /// Node `n` outputs are `output_ids[output_offsets[n]..output_offsets[n + 1]]`
    output_offsets: Box<[usize]>,
    /// Number of local ids at the front of each node's output slice
    local_counts: Box<[u32]>,
    /// Effective outputs of every node, concatenated
    output_ids: Box<[PatternId]>,
    /// Symbol count of every pattern, indexed by id
    pattern_lens: Box<[u32]>,
    max_pattern_len: usize,
    max_depth: u32,
}

impl ACAutomaton {
    /// Build the automaton on the calling thread
    ///
    /// Pattern ids are positions in `patterns`.
    ///
    /// # Errors
    ///
    /// - [`ACError::EmptyPattern`] for a zero-length pattern
    /// - [`ACError::InvalidAlphabetSymbol`] for a byte outside `alphabet`
    /// - [`ACError::ResourceLimitExceeded`] when the table would be too large
    ///
    /// Every pattern is validated before the first one is inserted.
    pub fn build<P: AsRef<[u8]>>(patterns: &[P], alphabet: &Alphabet) -> Result<Self, ACError> {
        Self::build_with_workers(patterns, alphabet, 1)
    }

    /// Build the automaton, resolving each trie level across `workers` threads
    ///
    /// The result is identical to [`ACAutomaton::build`] for any worker count.
    ///
    /// # Errors
    ///
    /// As [`ACAutomaton::build`], plus [`ACError::InvalidWorkerCount`] when
    /// `workers` is zero.
    pub fn build_with_workers<P: AsRef<[u8]>>(
        patterns: &[P],
        alphabet: &Alphabet,
        workers: usize,
    ) -> Result<Self, ACError> {
        let workers = check_worker_count(workers)?;
        let start = Instant::now();

        if patterns.len() > PatternId::MAX as usize {
            return Err(ACError::ResourceLimitExceeded(format!(
                "{} patterns exceed the maximum of {}",
                patterns.len(),
                PatternId::MAX
            )));
        }

        // Reject bad input before touching the trie
        let encoded = patterns
            .iter()
            .enumerate()
            .map(|(id, pattern)| encode_pattern(alphabet, id as PatternId, pattern.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut builder = TrieBuilder::new(alphabet.len());
        for symbols in &encoded {
            builder.add_pattern(symbols)?;
        }
        let (mut arena, pattern_lens) = builder.finish();

        if workers == 1 {
            propagate_sequential(&mut arena);
        } else {
            propagate_parallel(&mut arena, workers);
        }

        let automaton = Self::freeze(alphabet.clone(), arena, pattern_lens);
        debug!(
            "Built automaton: {} patterns, {} nodes, depth {}, {} workers in {:?}",
            automaton.pattern_count(),
            automaton.node_count(),
            automaton.max_depth,
            workers,
            start.elapsed()
        );

        Ok(automaton)
    }

    fn freeze(alphabet: Alphabet, arena: NodeArena, pattern_lens: Vec<u32>) -> Self {
        let mut output_offsets = Vec::with_capacity(arena.len() + 1);
        let total_outputs: usize = arena.outputs.iter().map(Vec::len).sum();
        let mut output_ids = Vec::with_capacity(total_outputs);

        output_offsets.push(0);
        for outputs in &arena.outputs {
            output_ids.extend_from_slice(outputs);
            output_offsets.push(output_ids.len());
        }

        let max_pattern_len = pattern_lens.iter().copied().max().unwrap_or(0) as usize;
        let max_depth = arena.depth.iter().copied().max().unwrap_or(0);

        Self {
            alphabet,
            width: arena.width,
            goto: arena.goto.into_boxed_slice(),
            failure: arena.failure.into_boxed_slice(),
            depth: arena.depth.into_boxed_slice(),
            output_offsets: output_offsets.into_boxed_slice(),
            local_counts: arena.local_counts.into_boxed_slice(),
            output_ids: output_ids.into_boxed_slice(),
            pattern_lens: pattern_lens.into_boxed_slice(),
            max_pattern_len,
            max_depth,
        }
    }

    /// The alphabet the automaton was built over
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// The start state
    #[inline]
    pub fn root(&self) -> StateId {
        ROOT
    }

    /// Number of nodes, root included
    pub fn node_count(&self) -> usize {
        self.failure.len()
    }

    /// Number of patterns the automaton was built from
    pub fn pattern_count(&self) -> usize {
        self.pattern_lens.len()
    }

    /// Symbol count of a pattern
    pub fn pattern_len(&self, pattern_id: PatternId) -> Option<usize> {
        self.pattern_lens
            .get(pattern_id as usize)
            .map(|&len| len as usize)
    }

    /// Length of the longest pattern, zero without patterns
    pub fn max_pattern_len(&self) -> usize {
        self.max_pattern_len
    }

    /// Depth of the deepest node
    pub fn max_depth(&self) -> usize {
        self.max_depth as usize
    }

    /// Next state for an encoded symbol (total: defined for every node and symbol)
    #[inline]
    pub fn next_state(&self, state: StateId, symbol: u8) -> StateId {
        self.goto[state as usize * self.width + symbol as usize]
    }

    /// The full transition row of a node
    pub fn transitions(&self, state: StateId) -> &[StateId] {
        let start = state as usize * self.width;
        &self.goto[start..start + self.width]
    }

    /// Failure link of a node
    #[inline]
    pub fn failure(&self, state: StateId) -> StateId {
        self.failure[state as usize]
    }

    /// Distance of a node from the root
    #[inline]
    pub fn depth(&self, state: StateId) -> usize {
        self.depth[state as usize] as usize
    }

    /// Effective output: every pattern recognized on reaching `state`
    #[inline]
    pub fn outputs(&self, state: StateId) -> &[PatternId] {
        let state = state as usize;
        &self.output_ids[self.output_offsets[state]..self.output_offsets[state + 1]]
    }

    /// Local output: patterns ending exactly at `state`
    pub fn local_outputs(&self, state: StateId) -> &[PatternId] {
        let outputs = self.outputs(state);
        &outputs[..self.local_counts[state as usize] as usize]
    }

    /// Whether the transition on `symbol` is a trie edge rather than a
    /// failure fallback
    ///
    /// Trie edges always go exactly one level deeper; fallbacks never do.
    pub fn is_explicit_edge(&self, state: StateId, symbol: u8) -> bool {
        let target = self.next_state(state, symbol);
        self.depth(target) == self.depth(state) + 1
    }

    /// Map text bytes onto alphabet indices
    ///
    /// # Errors
    ///
    /// [`ACError::InvalidAlphabetSymbol`] with the offset of the first bad byte.
    pub fn encode_text(&self, text: &[u8]) -> Result<Vec<u8>, ACError> {
        self.alphabet
            .encode(text)
            .map_err(|err| ACError::from_symbol(err, SymbolSource::Text))
    }

    /// Replay the automaton from the root over encoded symbols, calling
    /// `on_match(end, pattern_id)` for every recognized pattern end
    ///
    /// `end` is `base` plus the symbol's position in `symbols`, so a window
    /// of a larger text reports absolute offsets.
    #[inline]
    pub fn for_each_match<F>(&self, symbols: &[u8], base: usize, mut on_match: F)
    where
        F: FnMut(usize, PatternId),
    {
        let mut state = ROOT;
        for (i, &symbol) in symbols.iter().enumerate() {
            state = self.next_state(state, symbol);
            for &pattern_id in self.outputs(state) {
                on_match(base + i, pattern_id);
            }
        }
    }

    /// Match record for a pattern ending at `end`
    #[inline]
    pub fn record(&self, end: usize, pattern_id: PatternId) -> MatchRecord {
        let len = self.pattern_lens[pattern_id as usize] as usize;
        MatchRecord::new(pattern_id, end + 1 - len, end)
    }

    /// Every occurrence in already encoded text, in discovery order
    pub fn find_encoded(&self, symbols: &[u8]) -> Vec<MatchRecord> {
        let mut matches = Vec::new();
        self.for_each_match(symbols, 0, |end, pattern_id| {
            matches.push(self.record(end, pattern_id));
        });
        matches
    }

    /// Every occurrence in `text`, in discovery order, on the calling thread
    ///
    /// # Errors
    ///
    /// [`ACError::InvalidAlphabetSymbol`] if `text` has a byte outside the
    /// alphabet. Nothing is scanned in that case.
    pub fn find(&self, text: &[u8]) -> Result<Vec<MatchRecord>, ACError> {
        let symbols = self.encode_text(text)?;
        Ok(self.find_encoded(&symbols))
    }
}

impl fmt::Debug for ACAutomaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ACAutomaton")
            .field("alphabet", &self.alphabet)
            .field("node_count", &self.node_count())
            .field("pattern_count", &self.pattern_count())
            .field("max_pattern_len", &self.max_pattern_len)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}
