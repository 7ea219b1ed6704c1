use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use smallvec::SmallVec;
use thiserror::Error;

/// Separator between the components of a scope name.
pub const SCOPE_SEP: char = '.';

/// Errors produced when building a [`ScopeName`] from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
	/// The scope name has no components at all.
	#[error("scope name is empty")]
	Empty,
	/// One of the dot-separated components is empty (`a..b`, `.a`, `a.`).
	#[error("scope name '{scope}' has an empty component at index {index}")]
	EmptyComponent { scope: String, index: usize },
}

/// A dot-separated scope name such as `source.js` or `string.quoted.double`.
///
/// The text is stored once; component boundaries are precomputed so matching
/// can index words without re-tokenizing on every lookup.
#[derive(Clone)]
pub struct ScopeName {
	raw: Arc<str>,
	/// Byte offset one past the end of each component.
	ends: SmallVec<[u32; 6]>,
}

impl ScopeName {
	/// Parses a scope name, rejecting empty names and empty components.
	pub fn new(raw: &str) -> Result<Self, ScopeError> {
		let raw = raw.trim();
		if raw.is_empty() {
			return Err(ScopeError::Empty);
		}

		let mut ends = SmallVec::new();
		let mut start = 0usize;
		for (index, part) in raw.split(SCOPE_SEP).enumerate() {
			if part.is_empty() {
				return Err(ScopeError::EmptyComponent {
					scope: raw.to_string(),
					index,
				});
			}
			start += part.len();
			ends.push(start as u32);
			start += SCOPE_SEP.len_utf8();
		}

		Ok(Self { raw: Arc::from(raw), ends })
	}

	/// Returns the full dotted text.
	pub fn as_str(&self) -> &str {
		&self.raw
	}

	/// Number of dot-separated components. Always at least one.
	pub fn len(&self) -> usize {
		self.ends.len()
	}

	/// Always `false`; a scope name holds at least one component.
	pub fn is_empty(&self) -> bool {
		self.ends.is_empty()
	}

	/// Returns the component at `index`, if present.
	pub fn word(&self, index: usize) -> Option<&str> {
		let end = *self.ends.get(index)? as usize;
		let start = match index {
			0 => 0,
			_ => self.ends[index - 1] as usize + SCOPE_SEP.len_utf8(),
		};
		Some(&self.raw[start..end])
	}

	/// Returns the first component.
	pub fn first(&self) -> &str {
		&self.raw[..self.ends[0] as usize]
	}

	/// Iterates over the components in order.
	pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
		(0..self.len()).filter_map(|index| self.word(index))
	}

	/// Returns `true` if `prefix` matches this name component by component.
	///
	/// `string.quoted` is a prefix of `string.quoted.double`; `string.quo` is not.
	pub fn starts_with<'a>(&self, prefix: impl IntoIterator<Item = &'a str>) -> bool {
		let mut index = 0;
		for word in prefix {
			if self.word(index) != Some(word) {
				return false;
			}
			index += 1;
		}
		true
	}
}

impl PartialEq for ScopeName {
	fn eq(&self, other: &Self) -> bool {
		self.raw == other.raw
	}
}

impl Eq for ScopeName {}

impl std::hash::Hash for ScopeName {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.raw.hash(state);
	}
}

impl fmt::Debug for ScopeName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("ScopeName").field(&&*self.raw).finish()
	}
}

impl fmt::Display for ScopeName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.raw)
	}
}

impl FromStr for ScopeName {
	type Err = ScopeError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

impl TryFrom<&str> for ScopeName {
	type Error = ScopeError;

	fn try_from(value: &str) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
