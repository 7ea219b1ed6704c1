use std::sync::Arc;

use bitflags::bitflags;

use super::color::Color;
use crate::bundle::{ThemeDef, ThemeSettingDef};
use crate::error::ColorError;

bitflags! {
	/// Font variations applied by a [`Style`].
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct FontStyle: u8 {
		const BOLD = 1 << 0;
		const ITALIC = 1 << 1;
		const UNDERLINE = 1 << 2;
	}
}

impl FontStyle {
	/// Parses a space-separated list such as `"bold italic"`. Unknown words are ignored.
	pub fn parse(text: &str) -> Self {
		text.split_whitespace().fold(Self::empty(), |flags, word| {
			flags
				| match word.to_ascii_lowercase().as_str() {
					"bold" => Self::BOLD,
					"italic" => Self::ITALIC,
					"underline" | "underlined" => Self::UNDERLINE,
					_ => Self::empty(),
				}
		})
	}
}

/// Highlighting applied to text whose scope matches `scope`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
	pub name: String,
	pub scope: String,
	pub foreground: Option<Color>,
	pub background: Option<Color>,
	pub font_style: FontStyle,
}

impl Style {
	/// A style with explicit colors, used as the lookup fallback.
	pub fn fallback(foreground: Color, background: Color) -> Self {
		Self {
			name: "Default".to_string(),
			scope: String::new(),
			foreground: Some(foreground),
			background: Some(background),
			font_style: FontStyle::empty(),
		}
	}
}

/// A decoded theme: global colors plus scoped styles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
	pub name: String,
	pub uuid: String,
	pub foreground: Color,
	pub background: Color,
	pub styles: Vec<Arc<Style>>,
}

/// A theme setting that could not be decoded; the setting is skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeIssue {
	pub setting: String,
	pub error: ColorError,
}

impl Theme {
	/// Decodes a theme definition.
	///
	/// A setting with neither `name` nor `scope` holds the global colors.
	/// Scoped colors with an alpha channel are blended onto the global background.
	pub fn from_def(def: &ThemeDef, defaults: &Style) -> (Self, Vec<ThemeIssue>) {
		let mut issues = Vec::new();
		let mut theme = Self {
			name: def.name.clone(),
			uuid: def.uuid.clone(),
			foreground: defaults.foreground.unwrap_or(Color::BLACK),
			background: defaults.background.unwrap_or(Color::WHITE),
			styles: Vec::new(),
		};

		for setting in def.settings.iter().filter(|s| s.name.is_none() && s.scope.is_none()) {
			if let Some(bg) = decode(&setting.background, Color::WHITE, "background", &mut issues) {
				theme.background = bg;
			}
			if let Some(fg) = decode(&setting.foreground, theme.background, "foreground", &mut issues) {
				theme.foreground = fg;
			}
		}

		for setting in def.settings.iter().filter(|s| s.name.is_some() || s.scope.is_some()) {
			theme.styles.push(Arc::new(theme.style_from(setting, &mut issues)));
		}

		(theme, issues)
	}

	fn style_from(&self, setting: &ThemeSettingDef, issues: &mut Vec<ThemeIssue>) -> Style {
		let name = setting.name.clone().unwrap_or_default();
		let label = match name.is_empty() {
			true => setting.scope.clone().unwrap_or_default(),
			false => name.clone(),
		};
		Style {
			foreground: decode(&setting.foreground, self.background, &label, issues),
			background: decode(&setting.background, self.background, &label, issues),
			font_style: setting.font_style.as_deref().map(FontStyle::parse).unwrap_or_default(),
			scope: setting.scope.clone().unwrap_or_default(),
			name,
		}
	}
}

fn decode(value: &Option<String>, background: Color, setting: &str, issues: &mut Vec<ThemeIssue>) -> Option<Color> {
	let value = value.as_deref()?;
	match Color::parse_over(value, background) {
		Ok(color) => Some(color),
		Err(error) => {
			issues.push(ThemeIssue {
				setting: setting.to_string(),
				error,
			});
			None
		}
	}
}
