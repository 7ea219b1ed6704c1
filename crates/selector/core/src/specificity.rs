use std::cmp::Ordering;

/// How specifically a selector matched a scope stack.
///
/// Compared lexicographically; greater wins:
/// * `level`: stack index where the chain's innermost term matched (deeper is more specific).
/// * `components`: dot-components matched across all terms of the chain.
/// * `terms`: number of chain terms matched.
///
/// Universal selectors (empty, or exclusion-only) rank `Specificity::default()`
/// and lose to every scoped hit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Specificity {
	pub level: usize,
	pub components: usize,
	pub terms: usize,
}

impl Specificity {
	pub fn is_universal(&self) -> bool {
		self.terms == 0
	}
}

impl Ord for Specificity {
	fn cmp(&self, other: &Self) -> Ordering {
		self.terms
			.min(1)
			.cmp(&other.terms.min(1))
			.then_with(|| self.level.cmp(&other.level))
			.then_with(|| self.components.cmp(&other.components))
			.then_with(|| self.terms.cmp(&other.terms))
	}
}

impl PartialOrd for Specificity {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}
