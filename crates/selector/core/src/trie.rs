use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tessera_selector_parser::{Chain, ParseError, Selector};

use crate::specificity::Specificity;

pub(crate) type NodeMap = FxHashMap<Arc<str>, NodeId>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(u32);

impl NodeId {
	pub(crate) const ROOT: Self = Self(0);

	pub(crate) fn index(self) -> usize {
		self.0 as usize
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct TargetId(u32);

impl TargetId {
	pub(crate) fn index(self) -> usize {
		self.0 as usize
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct PayloadId(u32);

impl PayloadId {
	pub(crate) fn index(self) -> usize {
		self.0 as usize
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Edge {
	/// Next dot-component of the same scope name.
	Continuation,
	/// First word of a chain's innermost term. Only consulted at the root.
	Alternative,
	/// First word of the preceding (outer) term of the chain.
	Ancestor,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Node {
	pub(crate) word: Arc<str>,
	pub(crate) continuation: NodeMap,
	pub(crate) alternatives: NodeMap,
	pub(crate) ancestors: NodeMap,
	pub(crate) targets: SmallVec<[TargetId; 1]>,
}

impl Node {
	fn new(word: Arc<str>) -> Self {
		Self {
			word,
			..Self::default()
		}
	}

	pub(crate) fn edges(&self, edge: Edge) -> &NodeMap {
		match edge {
			Edge::Continuation => &self.continuation,
			Edge::Alternative => &self.alternatives,
			Edge::Ancestor => &self.ancestors,
		}
	}

	fn edges_mut(&mut self, edge: Edge) -> &mut NodeMap {
		match edge {
			Edge::Continuation => &mut self.continuation,
			Edge::Alternative => &mut self.alternatives,
			Edge::Ancestor => &mut self.ancestors,
		}
	}

	fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
		self.continuation.values().chain(self.alternatives.values()).chain(self.ancestors.values()).copied()
	}
}

/// One complete chain ending at a node, pointing at its payload.
#[derive(Debug, Clone)]
pub(crate) struct Target {
	pub(crate) payload: PayloadId,
	/// The whole chain, kept only when it carries exclusions; those are
	/// checked against the stack once the positive path has matched.
	pub(crate) guard: Option<Arc<Chain>>,
}

/// A ranked query hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ranked<'a, T> {
	pub payload: &'a T,
	pub specificity: Specificity,
}

/// Trie of scope selectors carrying payloads of type `T`.
///
/// Nodes live in an arena owned by the trie and refer to each other by index.
/// A selector parsed with [`SelectorTrie::from_selector`] is itself a trie (a
/// fragment); [`SelectorTrie::merge`] consumes a fragment and adopts its nodes
/// and payloads.
#[derive(Clone)]
pub struct SelectorTrie<T> {
	pub(crate) nodes: Vec<Node>,
	pub(crate) targets: Vec<Target>,
	pub(crate) payloads: Vec<T>,
}

impl<T> Default for SelectorTrie<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> SelectorTrie<T> {
	/// Creates an empty trie holding only the root node.
	pub fn new() -> Self {
		Self {
			nodes: vec![Node::default()],
			targets: Vec::new(),
			payloads: Vec::new(),
		}
	}

	/// Builds a fragment attaching `payload` to every chain of `selector`.
	pub fn from_selector(selector: &Selector, payload: T) -> Self {
		let mut trie = Self::new();
		let payload = trie.push_payload(payload);
		for chain in selector.chains() {
			trie.add_chain(&chain, payload);
		}
		trie
	}

	/// Parses `selector` and builds a fragment for it.
	///
	/// # Errors
	///
	/// Returns the [`ParseError`] for malformed selector text; no fragment is produced.
	pub fn parse(selector: &str, payload: T) -> Result<Self, ParseError> {
		let selector = Selector::parse(selector)?;
		Ok(Self::from_selector(&selector, payload))
	}

	/// Parses `selector` and merges it into this trie.
	///
	/// # Errors
	///
	/// Returns the [`ParseError`] for malformed selector text; the trie is left unchanged.
	pub fn insert(&mut self, selector: &str, payload: T) -> Result<(), ParseError> {
		let fragment = Self::parse(selector, payload)?;
		self.merge(fragment);
		Ok(())
	}

	/// Merges `fragment` into this trie.
	///
	/// Children with the same word under the same edge are merged recursively;
	/// target lists are concatenated. Payloads are never deduplicated, so
	/// merging two copies of a fragment registers its payload twice.
	pub fn merge(&mut self, fragment: SelectorTrie<T>) {
		if fragment.is_empty() {
			return;
		}

		let SelectorTrie { nodes, targets, payloads } = fragment;
		let payload_base = self.payloads.len() as u32;
		let target_base = self.targets.len() as u32;
		let added = targets.len();

		self.payloads.extend(payloads);
		self.targets.extend(targets.into_iter().map(|mut target| {
			target.payload = PayloadId(target.payload.0 + payload_base);
			target
		}));

		let mut source: Vec<Option<Node>> = nodes.into_iter().map(Some).collect();
		self.merge_node(NodeId::ROOT, &mut source, NodeId::ROOT, target_base);

		tracing::trace!(added, nodes = self.nodes.len(), payloads = self.payloads.len(), "merged selector fragment");
	}

	/// Removes every selector and payload.
	pub fn clear(&mut self) {
		self.nodes.clear();
		self.nodes.push(Node::default());
		self.targets.clear();
		self.payloads.clear();
	}

	/// Number of registered payloads.
	pub fn len(&self) -> usize {
		self.payloads.len()
	}

	pub fn is_empty(&self) -> bool {
		self.targets.is_empty()
	}

	/// Number of arena nodes, root included.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// Iterates registered payloads in registration order.
	pub fn payloads(&self) -> impl Iterator<Item = &T> {
		self.payloads.iter()
	}

	pub(crate) fn node(&self, id: NodeId) -> &Node {
		&self.nodes[id.index()]
	}

	pub(crate) fn target(&self, id: TargetId) -> &Target {
		&self.targets[id.index()]
	}

	pub(crate) fn payload(&self, id: PayloadId) -> &T {
		&self.payloads[id.index()]
	}

	fn push_payload(&mut self, payload: T) -> PayloadId {
		let id = PayloadId(self.payloads.len() as u32);
		self.payloads.push(payload);
		id
	}

	fn push_target(&mut self, node: NodeId, payload: PayloadId, chain: &Chain) {
		let excludes = !chain.excludes.is_empty() || chain.terms.iter().any(|term| !term.excludes.is_empty());
		let id = TargetId(self.targets.len() as u32);
		self.targets.push(Target {
			payload,
			guard: excludes.then(|| Arc::new(chain.clone())),
		});
		self.nodes[node.index()].targets.push(id);
	}

	fn child_or_insert(&mut self, parent: NodeId, edge: Edge, word: &Arc<str>) -> NodeId {
		if let Some(&child) = self.nodes[parent.index()].edges(edge).get(word) {
			return child;
		}

		let child = NodeId(self.nodes.len() as u32);
		self.nodes.push(Node::new(Arc::clone(word)));
		self.nodes[parent.index()].edges_mut(edge).insert(Arc::clone(word), child);
		child
	}

	/// Indexes one chain, innermost term first.
	///
	/// The innermost term hangs off the root's alternatives; each preceding term
	/// hangs off the ancestor edges of the last node of the term after it.
	fn add_chain(&mut self, chain: &Chain, payload: PayloadId) {
		if chain.is_universal() {
			self.push_target(NodeId::ROOT, payload, chain);
			return;
		}

		let mut node = NodeId::ROOT;
		let mut edge = Edge::Alternative;
		for term in chain.terms.iter().rev() {
			for word in term.pattern.words() {
				node = self.child_or_insert(node, edge, word);
				edge = Edge::Continuation;
			}
			edge = Edge::Ancestor;
		}

		self.push_target(node, payload, chain);
	}

	fn merge_node(&mut self, dst: NodeId, source: &mut [Option<Node>], src: NodeId, target_base: u32) {
		let Some(node) = source[src.index()].take() else {
			return;
		};

		self.nodes[dst.index()]
			.targets
			.extend(node.targets.iter().map(|target| TargetId(target.0 + target_base)));

		let Node {
			continuation,
			alternatives,
			ancestors,
			..
		} = node;

		for (edge, map) in [(Edge::Continuation, continuation), (Edge::Alternative, alternatives), (Edge::Ancestor, ancestors)] {
			for (word, child) in map {
				if !is_live(source, child) {
					continue;
				}
				let dst_child = self.child_or_insert(dst, edge, &word);
				self.merge_node(dst_child, source, child, target_base);
			}
		}
	}

	/// Renders the node structure as indented text.
	///
	/// Edges are marked `|` (alternative), `.` (continuation) and `<` (ancestor);
	/// `[n]` is the number of targets on a node.
	pub fn dump(&self) -> String {
		let mut out = String::new();
		self.dump_node(NodeId::ROOT, 0, &mut out);
		out
	}

	fn dump_node(&self, id: NodeId, depth: usize, out: &mut String) {
		let node = self.node(id);
		for (edge, mark) in [(Edge::Alternative, '|'), (Edge::Continuation, '.'), (Edge::Ancestor, '<')] {
			let mut children: Vec<_> = node.edges(edge).iter().collect();
			children.sort_by(|a, b| a.0.cmp(b.0));
			for (_, &child) in children {
				let targets = self.node(child).targets.len();
				out.push_str(&"  ".repeat(depth));
				out.push(mark);
				out.push_str(&self.node(child).word);
				if targets > 0 {
					out.push_str(&format!(" [{targets}]"));
				}
				out.push('\n');
				self.dump_node(child, depth + 1, out);
			}
		}
	}
}

/// A source node is worth copying if it, or anything below it, carries targets.
fn is_live(source: &[Option<Node>], id: NodeId) -> bool {
	source[id.index()]
		.as_ref()
		.is_some_and(|node| !node.targets.is_empty() || node.children().any(|child| is_live(source, child)))
}

impl<T: fmt::Debug> fmt::Debug for SelectorTrie<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SelectorTrie")
			.field("nodes", &self.nodes.len())
			.field("targets", &self.targets.len())
			.field("payloads", &self.payloads)
			.finish()
	}
}
