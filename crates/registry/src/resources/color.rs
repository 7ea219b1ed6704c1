use std::fmt;
use std::str::FromStr;

use crate::error::ColorError;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
}

impl Color {
	pub const BLACK: Self = Self::rgb(0, 0, 0);
	pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);

	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b }
	}

	/// Parses `#RRGGBB` or `#RRGGBBAA`.
	///
	/// The alpha channel of `#RRGGBBAA` is blended onto `background`.
	pub fn parse_over(text: &str, background: Color) -> Result<Self, ColorError> {
		let text = text.trim();
		let hex = text.strip_prefix('#').ok_or_else(|| ColorError::MissingHash(text.to_string()))?;
		if !matches!(hex.len(), 6 | 8) {
			return Err(ColorError::Length(text.to_string()));
		}

		let channel = |range: std::ops::Range<usize>| {
			hex.get(range)
				.and_then(|digits| u8::from_str_radix(digits, 16).ok())
				.ok_or_else(|| ColorError::Digits(text.to_string()))
		};

		let color = Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?);
		if hex.len() == 6 {
			return Ok(color);
		}

		let alpha = channel(6..8)?;
		Ok(color.blend(background, alpha))
	}

	/// Mixes `self` with `background`; `alpha` 255 keeps `self` unchanged.
	pub fn blend(self, background: Color, alpha: u8) -> Self {
		let mix = |fg: u8, bg: u8| {
			let alpha = u32::from(alpha);
			((u32::from(fg) * alpha + u32::from(bg) * (255 - alpha) + 127) / 255) as u8
		};
		Self::rgb(mix(self.r, background.r), mix(self.g, background.g), mix(self.b, background.b))
	}
}

impl FromStr for Color {
	type Err = ColorError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse_over(s, Color::WHITE)
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
	}
}
