use std::fmt;
use std::sync::Arc;

/// Classification of a problem found while loading bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemKind {
	/// A scope selector failed to parse; the item was not registered.
	InvalidSelector,
	/// A key equivalent failed to parse; the item was registered without it.
	InvalidKeyEquivalent,
	/// An item lacks a name or uuid and was skipped.
	MissingIdentity,
	/// A theme color failed to parse; the color was left unset.
	InvalidColor,
	/// The bundle source could not provide a bundle.
	BundleUnavailable,
}

/// A problem encountered while loading one bundle item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryProblem {
	pub kind: ProblemKind,
	pub bundle: Arc<str>,
	/// Item name (or uuid) the problem belongs to.
	pub item: String,
	/// Offending selector text, if any.
	pub selector: Option<String>,
	pub message: String,
}

impl fmt::Display for RegistryProblem {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}: {}", self.bundle, self.item, self.message)?;
		if let Some(selector) = &self.selector {
			write!(f, " (selector {selector:?})")?;
		}
		Ok(())
	}
}

/// Problems of one load generation, capped at a fixed number.
#[derive(Debug, Clone, Default)]
pub(crate) struct Problems {
	kept: Vec<RegistryProblem>,
	total: usize,
	cap: usize,
}

impl Problems {
	pub(crate) fn new(cap: usize) -> Self {
		Self {
			kept: Vec::new(),
			total: 0,
			cap,
		}
	}

	pub(crate) fn push(&mut self, problem: RegistryProblem) {
		self.total += 1;
		if self.kept.len() < self.cap {
			self.kept.push(problem);
		}
	}

	pub(crate) fn kept(&self) -> &[RegistryProblem] {
		&self.kept
	}

	/// Problems reported, including those dropped by the cap.
	pub(crate) fn total(&self) -> usize {
		self.total
	}

	pub(crate) fn clear(&mut self) {
		self.kept.clear();
		self.total = 0;
	}
}
