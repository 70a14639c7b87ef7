//! AC automaton invariant checks
//!
//! Walks a built automaton and verifies the structural guarantees scanning
//! relies on: a total goto function, correctly anchored failure links, output
//! sets that grow monotonically along failure links, and a trie in which
//! every node is reachable from the root.

use std::collections::HashSet;

use crate::{ACAutomaton, StateId, ROOT};

/// Validation result for an AC automaton
#[derive(Debug, Clone)]
pub struct ACValidationResult {
    /// Critical errors that make the automaton unusable
    pub errors: Vec<String>,
    /// Warnings about potential issues (non-fatal)
    pub warnings: Vec<String>,
    /// Statistics gathered during validation
    pub stats: ACStats,
}

/// Statistics gathered during AC automaton validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ACStats {
    /// Number of AC nodes
    pub node_count: u32,
    /// Number of patterns
    pub pattern_count: u32,
    /// Depth of the deepest node
    pub max_depth: u32,
    /// Node count per depth, root level first
    pub level_widths: Vec<u32>,
    /// Pattern ids stored across all effective outputs
    pub output_entries: u64,
    /// Nodes that are the terminal node of at least one pattern
    pub terminal_nodes: u32,
    /// Number of orphaned nodes (unreachable from root over trie edges)
    pub orphaned_count: u32,
}

impl ACValidationResult {
    fn new(ac: &ACAutomaton) -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            stats: ACStats {
                node_count: ac.node_count() as u32,
                pattern_count: ac.pattern_count() as u32,
                max_depth: ac.max_depth() as u32,
                ..ACStats::default()
            },
        }
    }

    /// Check if validation passed (no errors)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate every automaton invariant
///
/// Checks:
/// - every transition targets an existing node (totality)
/// - the root fails to itself and every depth-1 node fails to the root
/// - every other failure link points strictly shallower
/// - each node's output contains its local output and the output of its
///   failure target
/// - every pattern id is in range and ends at a node of matching depth
/// - every node is reachable from the root over trie edges
pub fn validate_automaton(ac: &ACAutomaton) -> ACValidationResult {
    let mut result = ACValidationResult::new(ac);
    let node_count = ac.node_count();
    let pattern_count = ac.pattern_count();

    result.stats.level_widths = vec![0; ac.max_depth() + 1];

    for state in 0..node_count as StateId {
        let depth = ac.depth(state);
        result.stats.level_widths[depth] += 1;

        // Totality
        for (symbol, &target) in ac.transitions(state).iter().enumerate() {
            if target as usize >= node_count {
                result.errors.push(format!(
                    "AC node {} has undefined transition on symbol {}: {}",
                    state, symbol, target
                ));
            }
        }

        // Failure anchoring
        let fail = ac.failure(state);
        if fail as usize >= node_count {
            result
                .errors
                .push(format!("AC node {} has invalid failure link: {}", state, fail));
            continue;
        }
        match depth {
            0 if fail != ROOT => result
                .errors
                .push(format!("Root failure link points at {} instead of itself", fail)),
            1 if fail != ROOT => result.errors.push(format!(
                "Depth-1 node {} fails to {} instead of the root",
                state, fail
            )),
            d if d > 1 && ac.depth(fail) >= d => result.errors.push(format!(
                "AC node {} (depth {}) fails to node {} at depth {}",
                state,
                d,
                fail,
                ac.depth(fail)
            )),
            _ => {}
        }

        // Output monotonicity
        let outputs = ac.outputs(state);
        let local = ac.local_outputs(state);
        result.stats.output_entries += outputs.len() as u64;
        if !local.is_empty() {
            result.stats.terminal_nodes += 1;
        }

        let output_set: HashSet<_> = outputs.iter().copied().collect();
        if state != ROOT {
            let missing = ac
                .outputs(fail)
                .iter()
                .filter(|id| !output_set.contains(id))
                .count();
            if missing > 0 {
                result.errors.push(format!(
                    "AC node {} is missing {} outputs of its failure target {}",
                    state, missing, fail
                ));
            }
        }

        // Pattern references
        for &pattern_id in outputs {
            if pattern_id as usize >= pattern_count {
                result.errors.push(format!(
                    "AC node {} references invalid pattern ID: {} (max={})",
                    state, pattern_id, pattern_count
                ));
            }
        }
        for &pattern_id in local {
            if ac.pattern_len(pattern_id) != Some(depth) {
                result.errors.push(format!(
                    "Pattern {} ends at node {} whose depth {} differs from its length",
                    pattern_id, state, depth
                ));
            }
        }
    }

    validate_reachability(ac, &mut result);
    result
}

/// Breadth-first walk over trie edges only; failure fallbacks do not count
fn validate_reachability(ac: &ACAutomaton, result: &mut ACValidationResult) {
    let node_count = ac.node_count();
    let width = ac.alphabet().len();
    let mut reachable = vec![false; node_count];
    let mut queue = vec![ROOT];
    reachable[ROOT as usize] = true;

    while let Some(state) = queue.pop() {
        for symbol in 0..width {
            let symbol = symbol as u8;
            let target = ac.next_state(state, symbol);
            if (target as usize) < node_count
                && !reachable[target as usize]
                && ac.is_explicit_edge(state, symbol)
            {
                reachable[target as usize] = true;
                queue.push(target);
            }
        }
    }

    let orphaned_count = reachable.iter().filter(|&&r| !r).count();
    result.stats.orphaned_count = orphaned_count as u32;

    if orphaned_count > 0 {
        result.warnings.push(format!(
            "Found {} orphaned AC nodes (not reachable from root)",
            orphaned_count
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Alphabet;

    #[test]
    fn test_classic_automaton_is_valid() {
        let ac = ACAutomaton::build(&["he", "she", "his", "hers"], &Alphabet::lowercase_ascii())
            .unwrap();
        let result = validate_automaton(&ac);

        assert!(result.is_valid(), "errors: {:?}", result.errors);
        assert!(result.warnings.is_empty());
        assert_eq!(result.stats.node_count, 10);
        assert_eq!(result.stats.level_widths, vec![1, 2, 3, 3, 1]);
        assert_eq!(result.stats.terminal_nodes, 4);
        // she carries he as well
        assert_eq!(result.stats.output_entries, 5);
        assert_eq!(result.stats.orphaned_count, 0);
    }

    #[test]
    fn test_parallel_build_is_valid() {
        let patterns = ["abab", "bab", "ab", "b", "aab", "baab", "abba"];
        let ac =
            ACAutomaton::build_with_workers(&patterns, &Alphabet::from_symbols(b"ab").unwrap(), 4)
                .unwrap();
        let result = validate_automaton(&ac);
        assert!(result.is_valid(), "errors: {:?}", result.errors);
        assert_eq!(result.stats.pattern_count, 7);
    }

    #[test]
    fn test_empty_automaton() {
        let patterns: [&[u8]; 0] = [];
        let ac = ACAutomaton::build(&patterns, &Alphabet::lowercase_ascii()).unwrap();
        let result = validate_automaton(&ac);
        assert!(result.is_valid());
        assert_eq!(result.stats.node_count, 1);
        assert_eq!(result.stats.level_widths, vec![1]);
    }
}
