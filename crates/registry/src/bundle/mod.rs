//! Decoded bundle model.
//!
//! A bundle is a named set of snippets, commands, preferences, syntaxes and
//! themes, each carrying the scope selector it applies to. Bundles reach the
//! registry through a [`BundleSource`]; the TOML form here is what the
//! directory source and test fixtures read.

use serde::Deserialize;

mod source;

pub use source::{BundleSource, DirBundleSource, MemoryBundleSource};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BundleDef {
	pub name: String,
	pub uuid: String,
	pub snippets: Vec<ActionDef>,
	pub commands: Vec<ActionDef>,
	pub drag_commands: Vec<DragCommandDef>,
	pub preferences: Vec<PreferenceDef>,
	pub syntaxes: Vec<SyntaxDef>,
	pub themes: Vec<ThemeDef>,
}

impl BundleDef {
	pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
		toml::from_str(text)
	}
}

/// A snippet or command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActionDef {
	pub name: Option<String>,
	pub uuid: Option<String>,
	pub scope: String,
	/// Tab trigger text.
	pub trigger: Option<String>,
	/// TextMate key equivalent, e.g. `^~s`.
	pub key_equivalent: Option<String>,
	pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DragCommandDef {
	pub name: Option<String>,
	pub uuid: Option<String>,
	pub scope: String,
	pub extensions: Vec<String>,
	pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreferenceDef {
	pub name: Option<String>,
	pub scope: String,
	pub settings: PreferenceSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreferenceSettings {
	pub increase_indent_pattern: Option<String>,
	pub decrease_indent_pattern: Option<String>,
	pub indent_next_line_pattern: Option<String>,
	pub unindented_line_pattern: Option<String>,
	pub shell_variables: Vec<ShellVariableDef>,
	pub smart_typing_pairs: Vec<[String; 2]>,
	pub completions: Vec<String>,
	pub completion_command: Option<String>,
	pub disable_default_completion: bool,
	pub show_in_symbol_list: bool,
	pub symbol_transformation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShellVariableDef {
	pub name: String,
	pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyntaxDef {
	pub name: String,
	pub scope_name: String,
	pub file_types: Vec<String>,
	pub key_equivalent: Option<String>,
	pub folding_start_marker: Option<String>,
	pub folding_stop_marker: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeDef {
	pub name: String,
	pub uuid: String,
	pub settings: Vec<ThemeSettingDef>,
}

/// One theme entry. Entries without `name` and `scope` hold the global colors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeSettingDef {
	pub name: Option<String>,
	pub scope: Option<String>,
	pub foreground: Option<String>,
	pub background: Option<String>,
	pub font_style: Option<String>,
}
