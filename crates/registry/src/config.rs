//! Registry configuration.

use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigError, Result};
use crate::resources::{Color, Style};

/// Settings for a [`ResourceRegistry`](crate::ResourceRegistry).
///
/// Every field is optional in TOML; unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
	/// Theme applied after each load step. Falls back to the built-in theme
	/// when unset or not found.
	pub default_theme: Option<String>,
	/// Syntax name reported when no syntax handles a file.
	pub default_syntax: String,
	/// Style returned when no theme rule matches.
	pub default_style: StyleDef,
	/// Maximum number of problems kept per load generation.
	pub max_problems: usize,
	/// Bundles loaded per idle tick.
	pub idle_batch: usize,
}

impl Default for RegistryConfig {
	fn default() -> Self {
		Self {
			default_theme: None,
			default_syntax: "Plain Text".to_string(),
			default_style: StyleDef::default(),
			max_problems: 50,
			idle_batch: 1,
		}
	}
}

/// Colors of the fallback style, as `#RRGGBB` strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleDef {
	pub foreground: String,
	pub background: String,
}

impl Default for StyleDef {
	fn default() -> Self {
		Self {
			foreground: "#000000".to_string(),
			background: "#FFFFFF".to_string(),
		}
	}
}

impl StyleDef {
	pub fn to_style(&self) -> std::result::Result<Style, crate::error::ColorError> {
		let background = self.background.parse::<Color>()?;
		let foreground = Color::parse_over(&self.foreground, background)?;
		Ok(Style::fallback(foreground, background))
	}
}

impl RegistryConfig {
	/// Parses configuration from TOML text and validates the default style.
	pub fn from_toml_str(text: &str) -> Result<Self> {
		let config: Self = toml::from_str(text)?;
		config.default_style.to_style()?;
		Ok(config)
	}

	/// Reads configuration from a TOML file.
	pub fn from_path(path: &Path) -> Result<Self> {
		let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&text)
	}
}
