//! TextMate key equivalents.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

use crate::error::KeyError;

bitflags! {
	/// Modifier keys of a [`Shortcut`].
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct Modifiers: u8 {
		/// `^`
		const CONTROL = 1 << 0;
		/// `~`
		const ALT = 1 << 1;
		/// `@`
		const COMMAND = 1 << 2;
		/// `$`
		const SHIFT = 1 << 3;
	}
}

const PREFIXES: [(char, Modifiers); 4] = [
	('^', Modifiers::CONTROL),
	('~', Modifiers::ALT),
	('@', Modifiers::COMMAND),
	('$', Modifiers::SHIFT),
];

/// A key press: one key plus its modifiers.
///
/// Parsed from TextMate notation, where modifier prefixes precede the key:
/// `^~s` is control+alt+s. An uppercase letter implies shift, so `@A` and
/// `$@a` are the same shortcut.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shortcut {
	pub key: String,
	pub modifiers: Modifiers,
}

impl Shortcut {
	pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
		Self {
			key: key.into(),
			modifiers,
		}
	}

	/// Parses a key equivalent such as `^~s` or `@A`.
	pub fn parse(text: &str) -> Result<Self, KeyError> {
		if text.is_empty() {
			return Err(KeyError::Empty);
		}

		let mut modifiers = Modifiers::empty();
		let mut rest = text;
		// A lone prefix character is a key, not a modifier.
		while rest.chars().count() > 1 {
			let Some(first) = rest.chars().next() else {
				break;
			};
			let Some(&(_, modifier)) = PREFIXES.iter().find(|(prefix, _)| *prefix == first) else {
				break;
			};
			modifiers |= modifier;
			rest = &rest[first.len_utf8()..];
		}

		let mut chars = rest.chars();
		let (Some(key), None) = (chars.next(), chars.next()) else {
			return Err(match rest.is_empty() {
				true => KeyError::MissingKey(text.to_string()),
				false => KeyError::TrailingKeys(text.to_string()),
			});
		};

		if key.is_ascii_uppercase() {
			modifiers |= Modifiers::SHIFT;
		}
		Ok(Self::new(key.to_ascii_lowercase().to_string(), modifiers))
	}
}

impl FromStr for Shortcut {
	type Err = KeyError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl fmt::Display for Shortcut {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (prefix, modifier) in PREFIXES {
			if self.modifiers.contains(modifier) {
				write!(f, "{prefix}")?;
			}
		}
		f.write_str(&self.key)
	}
}
