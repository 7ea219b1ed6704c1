//! Payload types stored in the registry's selector tries.

mod action;
mod color;
mod key;
mod prefs;
mod style;

pub use action::{Action, ActionKind, CompletionCommand, DragCommand};
pub use color::Color;
pub use key::{Modifiers, Shortcut};
pub use prefs::{FoldRule, IndentKind, IndentRules, SyntaxInfo};
pub use style::{FontStyle, Style, Theme, ThemeIssue};
