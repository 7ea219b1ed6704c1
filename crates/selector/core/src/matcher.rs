//! Stack queries against a [`SelectorTrie`].
//!
//! A query starts at the root once per stack level, innermost first, following
//! the alternative edge named by that scope's first word. From each node the
//! walk tries, in order: the next word of the same scope (continuation), the
//! preceding chain term against every strictly-outer scope (ancestor), and
//! finally the targets stored on the node.
//!
//! Each node sits at a fixed depth in its chain, so every path reaching a node
//! at a given stack level matched the same number of components and terms. A
//! walk therefore visits each `(node, level)` pair once. Exclusions are checked
//! per target against the stack, nearest outer scopes first.

use rustc_hash::{FxHashMap, FxHashSet};
use tessera_scope::ScopeStack;

use crate::eval;
use crate::specificity::Specificity;
use crate::trie::{NodeId, PayloadId, Ranked, SelectorTrie, TargetId};

#[derive(Debug, Clone, Copy)]
struct Hit {
	payload: PayloadId,
	specificity: Specificity,
}

/// State of the descents started from one stack level.
struct Walk<'s> {
	stack: &'s ScopeStack,
	/// Level matched by the innermost term; `None` for root targets on an empty stack.
	level: Option<usize>,
	components: usize,
	terms: usize,
	/// Root targets: universal selectors checked at the innermost level.
	universal: bool,
	visited: FxHashSet<(NodeId, usize)>,
}

impl<'s> Walk<'s> {
	fn new(stack: &'s ScopeStack, level: Option<usize>) -> Self {
		Self {
			stack,
			level,
			components: 0,
			terms: 0,
			universal: false,
			visited: FxHashSet::default(),
		}
	}

	fn specificity(&self) -> Specificity {
		if self.universal {
			return Specificity::default();
		}
		Specificity {
			level: self.level.unwrap_or_default(),
			components: self.components,
			terms: self.terms,
		}
	}
}

/// Hits in traversal order, one per payload.
#[derive(Default)]
struct Hits {
	hits: Vec<Hit>,
	seen: FxHashMap<PayloadId, usize>,
}

impl Hits {
	fn push(&mut self, hit: Hit) {
		match self.seen.get(&hit.payload) {
			Some(&index) => {
				let existing = &mut self.hits[index];
				if hit.specificity > existing.specificity {
					existing.specificity = hit.specificity;
				}
			}
			None => {
				self.seen.insert(hit.payload, self.hits.len());
				self.hits.push(hit);
			}
		}
	}
}

impl<T> SelectorTrie<T> {
	/// Every payload whose selector matches `stack`, in traversal order.
	///
	/// Traversal order is stack depth from innermost to outermost, then
	/// insertion order; universal selectors come last. A payload reached
	/// through several alternatives is returned once.
	pub fn resolve(&self, stack: &ScopeStack) -> Vec<&T> {
		self.resolve_where(stack, |_| true)
	}

	/// Like [`resolve`](Self::resolve), keeping only payloads accepted by `filter`.
	pub fn resolve_where<F>(&self, stack: &ScopeStack, filter: F) -> Vec<&T>
	where
		F: FnMut(&T) -> bool,
	{
		self.collect(stack, filter).into_iter().map(|hit| self.payload(hit.payload)).collect()
	}

	/// Matching payloads with their specificity, most specific first.
	///
	/// Ties keep traversal order.
	pub fn resolve_ranked(&self, stack: &ScopeStack) -> Vec<Ranked<'_, T>> {
		self.resolve_ranked_where(stack, |_| true)
	}

	pub fn resolve_ranked_where<F>(&self, stack: &ScopeStack, filter: F) -> Vec<Ranked<'_, T>>
	where
		F: FnMut(&T) -> bool,
	{
		let mut ranked: Vec<_> = self
			.collect(stack, filter)
			.into_iter()
			.map(|hit| Ranked {
				payload: self.payload(hit.payload),
				specificity: hit.specificity,
			})
			.collect();
		ranked.sort_by(|a, b| b.specificity.cmp(&a.specificity));
		ranked
	}

	/// The most specific matching payload.
	pub fn resolve_best(&self, stack: &ScopeStack) -> Option<&T> {
		self.resolve_best_where(stack, |_| true)
	}

	pub fn resolve_best_where<F>(&self, stack: &ScopeStack, filter: F) -> Option<&T>
	where
		F: FnMut(&T) -> bool,
	{
		let mut best: Option<Hit> = None;
		for hit in self.collect(stack, filter) {
			if best.is_none_or(|current| hit.specificity > current.specificity) {
				best = Some(hit);
			}
		}
		best.map(|hit| self.payload(hit.payload))
	}

	/// Every payload sharing the highest specificity, in traversal order.
	pub fn resolve_top(&self, stack: &ScopeStack) -> Vec<&T> {
		self.resolve_top_where(stack, |_| true)
	}

	pub fn resolve_top_where<F>(&self, stack: &ScopeStack, filter: F) -> Vec<&T>
	where
		F: FnMut(&T) -> bool,
	{
		let hits = self.collect(stack, filter);
		let Some(top) = hits.iter().map(|hit| hit.specificity).max() else {
			return Vec::new();
		};
		hits.into_iter()
			.filter(|hit| hit.specificity == top)
			.map(|hit| self.payload(hit.payload))
			.collect()
	}

	fn collect<F>(&self, stack: &ScopeStack, mut filter: F) -> Vec<Hit>
	where
		F: FnMut(&T) -> bool,
	{
		let mut hits = Hits::default();
		let root = self.node(NodeId::ROOT);

		for level in (0..stack.len()).rev() {
			let Some(&child) = root.alternatives.get(stack[level].first()) else {
				continue;
			};
			let mut walk = Walk::new(stack, Some(level));
			walk.components = 1;
			walk.terms = 1;
			self.match_node(child, level, 0, &mut walk, &mut hits, &mut filter);
		}

		if !root.targets.is_empty() {
			let mut walk = Walk::new(stack, stack.len().checked_sub(1));
			walk.universal = true;
			for &target in &root.targets {
				self.accept(target, &walk, &mut hits, &mut filter);
			}
		}

		hits.hits
	}

	/// `id` has just matched word `word` of the scope at `level`.
	fn match_node<F>(&self, id: NodeId, level: usize, word: usize, walk: &mut Walk<'_>, hits: &mut Hits, filter: &mut F)
	where
		F: FnMut(&T) -> bool,
	{
		if !walk.visited.insert((id, level)) {
			return;
		}

		let node = self.node(id);
		let stack = walk.stack;

		if !node.continuation.is_empty()
			&& let Some(next) = stack[level].word(word + 1)
			&& let Some(&child) = node.continuation.get(next)
		{
			walk.components += 1;
			self.match_node(child, level, word + 1, walk, hits, filter);
			walk.components -= 1;
		}

		if !node.ancestors.is_empty() {
			for outer in (0..level).rev() {
				let Some(&child) = node.ancestors.get(stack[outer].first()) else {
					continue;
				};
				walk.components += 1;
				walk.terms += 1;
				self.match_node(child, outer, 0, walk, hits, filter);
				walk.terms -= 1;
				walk.components -= 1;
			}
		}

		for &target in &node.targets {
			self.accept(target, walk, hits, filter);
		}
	}

	fn accept<F>(&self, target: TargetId, walk: &Walk<'_>, hits: &mut Hits, filter: &mut F)
	where
		F: FnMut(&T) -> bool,
	{
		let target = self.target(target);
		if let Some(chain) = &target.guard {
			let matched = walk.level.is_some_and(|level| eval::chain_matches_at(chain, walk.stack, level));
			if !matched {
				return;
			}
		}
		if !filter(self.payload(target.payload)) {
			return;
		}

		hits.push(Hit {
			payload: target.payload,
			specificity: walk.specificity(),
		});
	}
}
