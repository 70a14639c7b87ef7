//! Trie construction over the node arena
//!
//! Patterns are inserted into a prefix tree whose nodes live in one
//! [`NodeArena`]. Transition rows are stored node-major in a single flat
//! table; an entry of [`NO_STATE`] means the node has no explicit child on
//! that symbol yet. The propagation phase later replaces every such entry.

use crate::{ACError, Alphabet, PatternId, StateId, SymbolSource, ROOT};

/// Missing transition marker, only present before propagation completes
pub(crate) const NO_STATE: StateId = StateId::MAX;

/// Upper bound on the transition table size
///
/// Large enough for legitimate dictionaries, catches pathological inputs
/// before they turn into an allocation failure.
const MAX_TABLE_BYTES: usize = 2_000_000_000; // 2GB

/// Node storage shared by the trie and propagation phases
#[derive(Debug, Clone)]
pub(crate) struct NodeArena {
    /// Transition row width (alphabet size)
    pub width: usize,
    /// Flat transition table, `width` entries per node
    pub goto: Vec<StateId>,
    /// Failure link per node
    pub failure: Vec<StateId>,
    /// Distance from root per node
    pub depth: Vec<u32>,
    /// Output per node: local ids first, inherited ids appended after
    pub outputs: Vec<Vec<PatternId>>,
    /// Number of local ids at the front of each output list
    pub local_counts: Vec<u32>,
}

impl NodeArena {
    fn with_root(width: usize) -> Self {
        Self {
            width,
            goto: vec![NO_STATE; width],
            failure: vec![ROOT],
            depth: vec![0],
            outputs: vec![Vec::new()],
            local_counts: vec![0],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.failure.len()
    }

    #[inline]
    pub fn row(&self, state: StateId) -> &[StateId] {
        let start = state as usize * self.width;
        &self.goto[start..start + self.width]
    }

    #[inline]
    pub fn row_mut(&mut self, state: StateId) -> &mut [StateId] {
        let start = state as usize * self.width;
        &mut self.goto[start..start + self.width]
    }

    #[inline]
    pub fn transition(&self, state: StateId, symbol: usize) -> StateId {
        self.goto[state as usize * self.width + symbol]
    }
}

/// Map a pattern onto alphabet indices, rejecting empty patterns
pub(crate) fn encode_pattern(
    alphabet: &Alphabet,
    pattern_id: PatternId,
    pattern: &[u8],
) -> Result<Vec<u8>, ACError> {
    if pattern.is_empty() {
        return Err(ACError::EmptyPattern { pattern_id });
    }

    alphabet
        .encode(pattern)
        .map_err(|err| ACError::from_symbol(err, SymbolSource::Pattern(pattern_id)))
}

/// Builder for the trie phase
pub(crate) struct TrieBuilder {
    arena: NodeArena,
    /// Length of every inserted pattern, indexed by id
    pattern_lens: Vec<u32>,
    /// Most nodes the arena may hold
    max_states: usize,
}

impl TrieBuilder {
    pub fn new(width: usize) -> Self {
        let row_bytes = width.max(1) * std::mem::size_of::<StateId>();
        let max_states = (MAX_TABLE_BYTES / row_bytes).min(NO_STATE as usize);

        Self {
            arena: NodeArena::with_root(width),
            pattern_lens: Vec::new(),
            max_states,
        }
    }

    /// Add an already encoded pattern and return its id
    pub fn add_pattern(&mut self, symbols: &[u8]) -> Result<PatternId, ACError> {
        let pattern_id = self.pattern_lens.len() as PatternId;
        self.pattern_lens.push(symbols.len() as u32);

        let mut current = ROOT;
        let mut depth = 0u32;

        for &symbol in symbols {
            depth += 1;
            let next = self.arena.transition(current, symbol as usize);

            current = if next != NO_STATE {
                next
            } else {
                let new_id = self.push_node(depth)?;
                self.arena.row_mut(current)[symbol as usize] = new_id;
                new_id
            };
        }

        self.arena.outputs[current as usize].push(pattern_id);
        Ok(pattern_id)
    }

    fn push_node(&mut self, depth: u32) -> Result<StateId, ACError> {
        if self.arena.len() >= self.max_states {
            return Err(ACError::ResourceLimitExceeded(format!(
                "Trie needs more than {} states for an alphabet of {} symbols",
                self.max_states, self.arena.width
            )));
        }

        let id = self.arena.len() as StateId;
        self.arena
            .goto
            .extend(std::iter::repeat(NO_STATE).take(self.arena.width));
        self.arena.failure.push(ROOT);
        self.arena.depth.push(depth);
        self.arena.outputs.push(Vec::new());
        self.arena.local_counts.push(0);
        Ok(id)
    }

    /// Freeze local outputs and hand the arena to propagation
    pub fn finish(mut self) -> (NodeArena, Vec<u32>) {
        for (count, outputs) in self
            .arena
            .local_counts
            .iter_mut()
            .zip(&self.arena.outputs)
        {
            *count = outputs.len() as u32;
        }
        (self.arena, self.pattern_lens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert_all(patterns: &[&str]) -> (NodeArena, Vec<u32>) {
        let alphabet = Alphabet::lowercase_ascii();
        let mut builder = TrieBuilder::new(alphabet.len());
        for (id, pattern) in patterns.iter().enumerate() {
            let symbols = encode_pattern(&alphabet, id as PatternId, pattern.as_bytes()).unwrap();
            builder.add_pattern(&symbols).unwrap();
        }
        builder.finish()
    }

    fn walk(arena: &NodeArena, word: &str) -> StateId {
        let alphabet = Alphabet::lowercase_ascii();
        word.bytes().fold(ROOT, |state, byte| {
            let symbol = alphabet.index_of(byte).unwrap() as usize;
            arena.transition(state, symbol)
        })
    }

    #[test]
    fn test_shared_prefixes_share_nodes() {
        let (arena, lens) = insert_all(&["he", "hers", "his"]);
        // root, h, e, r, s, i, s
        assert_eq!(arena.len(), 7);
        assert_eq!(lens, vec![2, 4, 3]);

        let he = walk(&arena, "he");
        assert_eq!(arena.outputs[he as usize], vec![0]);
        assert_eq!(arena.local_counts[he as usize], 1);
        assert_eq!(arena.depth[walk(&arena, "hers") as usize], 4);
    }

    #[test]
    fn test_insertion_order_does_not_change_shape() {
        let (forward, _) = insert_all(&["abc", "abd", "b"]);
        let (backward, _) = insert_all(&["b", "abd", "abc"]);
        assert_eq!(forward.len(), backward.len());

        for word in ["a", "ab", "abc", "abd", "b"] {
            let f = walk(&forward, word);
            let b = walk(&backward, word);
            assert_ne!(f, NO_STATE);
            assert_ne!(b, NO_STATE);
            assert_eq!(forward.depth[f as usize], backward.depth[b as usize]);
            assert_eq!(
                forward.outputs[f as usize].len(),
                backward.outputs[b as usize].len()
            );
        }
    }

    #[test]
    fn test_duplicate_patterns_keep_both_ids() {
        let (arena, _) = insert_all(&["his", "he", "his"]);
        let his = walk(&arena, "his");
        assert_eq!(arena.outputs[his as usize], vec![0, 2]);
    }

    #[test]
    fn test_encode_pattern_errors() {
        let alphabet = Alphabet::lowercase_ascii();
        assert_eq!(
            encode_pattern(&alphabet, 3, b""),
            Err(ACError::EmptyPattern { pattern_id: 3 })
        );
        assert_eq!(
            encode_pattern(&alphabet, 1, b"ab-c"),
            Err(ACError::InvalidAlphabetSymbol {
                byte: b'-',
                offset: 2,
                location: SymbolSource::Pattern(1),
            })
        );
    }
}
