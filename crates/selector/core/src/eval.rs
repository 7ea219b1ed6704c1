//! Direct evaluation of flattened chains against a scope stack.
//!
//! The trie handles the positive part of a selector; exclusions are kept as
//! chains on the target and evaluated here once a candidate path is found.

use tessera_scope::ScopeStack;
use tessera_selector_parser::{Chain, Selector, Term};

/// Returns `true` if `selector` matches `stack`, without building a trie.
pub fn matches(selector: &Selector, stack: &ScopeStack) -> bool {
	selector.chains().iter().any(|chain| chain_matches(chain, stack))
}

pub(crate) fn chain_matches(chain: &Chain, stack: &ScopeStack) -> bool {
	match stack.len() {
		0 => chain.is_universal() && chain.excludes.is_empty(),
		len if chain.is_universal() => chain_matches_at(chain, stack, len - 1),
		len => (0..len).any(|level| chain_matches_at(chain, stack, level)),
	}
}

pub(crate) fn any_matches_at(chains: &[Chain], stack: &ScopeStack, level: usize) -> bool {
	chains.iter().any(|chain| chain_matches_at(chain, stack, level))
}

/// Matches `chain` with its innermost term pinned to `level`.
///
/// Preceding terms are searched outward, nearest first.
pub(crate) fn chain_matches_at(chain: &Chain, stack: &ScopeStack, level: usize) -> bool {
	if level >= stack.len() {
		return false;
	}

	let Some((innermost, outer)) = chain.terms.split_last() else {
		return !any_matches_at(&chain.excludes, stack, level);
	};

	if !term_matches_at(innermost, stack, level) {
		return false;
	}

	let mut next = level;
	for term in outer.iter().rev() {
		match (0..next).rev().find(|&candidate| term_matches_at(term, stack, candidate)) {
			Some(found) => next = found,
			None => return false,
		}
	}
	true
}

fn term_matches_at(term: &Term, stack: &ScopeStack, level: usize) -> bool {
	term.pattern.matches(&stack[level]) && !any_matches_at(&term.excludes, stack, level)
}
