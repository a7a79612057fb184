//! Parser configuration.
//!
//! This crate defines no configuration file format; hosts that have one can
//! embed [`ParserConfig`] in their own structure, missing fields fall back to
//! the defaults.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Exit code returned when parse errors are reported instead of running
    /// an action.
    pub parse_error_exit_code: i32,

    /// Attach "did you mean" hints to unrecognized tokens.
    pub suggestions: bool,

    /// Characters separating an option alias from an inline value
    /// (`--name=value`, `--name:value`).
    pub inline_delimiters: Vec<char>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            parse_error_exit_code: 1,
            suggestions: true,
            inline_delimiters: vec!['=', ':'],
        }
    }
}

impl ParserConfig {
    pub fn with_parse_error_exit_code(mut self, code: i32) -> Self {
        self.parse_error_exit_code = code;
        self
    }

    pub fn with_suggestions(mut self, enabled: bool) -> Self {
        self.suggestions = enabled;
        self
    }
}
