//! Structured parse diagnostics.
//!
//! Messages are built here from symbol names and raw token text only, so no
//! inner conversion or platform error text ever reaches users.

use std::fmt;

use serde::Serialize;

use crate::symbol::SymbolId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ParseErrorKind {
    /// Token matched no command, option or positional slot in strict mode.
    UnrecognizedToken,
    /// A required option was never given where it is visible.
    MissingRequiredOption,
    /// The terminal command only groups subcommands and none was given.
    MissingRequiredCommand,
    /// Bound value count is outside the argument's arity.
    ArityViolation,
    /// Raw text could not become the declared value type.
    ConversionFailure,
    /// A custom validator rejected a bound value.
    ValidationFailure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    /// Index of the offending token, when one exists.
    pub position: Option<usize>,
    pub symbol: Option<SymbolId>,
    /// "Did you mean" hint for unrecognized tokens.
    pub suggestion: Option<String>,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            position: None,
            symbol: None,
            suggestion: None,
        }
    }

    pub(crate) fn at(mut self, position: Option<usize>) -> Self {
        self.position = position;
        self
    }

    pub(crate) fn for_symbol(mut self, symbol: SymbolId) -> Self {
        self.symbol = Some(symbol);
        self
    }

    pub(crate) fn unrecognized(token: &str, position: usize, suggestion: Option<String>) -> Self {
        let mut error = Self::new(
            ParseErrorKind::UnrecognizedToken,
            format!("Unrecognized command or argument '{token}'."),
        )
        .at(Some(position));
        error.suggestion = suggestion;
        error
    }

    pub(crate) fn missing_option(alias: &str, option: SymbolId) -> Self {
        Self::new(
            ParseErrorKind::MissingRequiredOption,
            format!("Option '{alias}' is required."),
        )
        .for_symbol(option)
    }

    pub(crate) fn missing_command(command: SymbolId) -> Self {
        Self::new(
            ParseErrorKind::MissingRequiredCommand,
            "Required command was not provided.",
        )
        .for_symbol(command)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " Did you mean '{suggestion}'?")?;
        }
        Ok(())
    }
}

/// Where a value slot lives, for diagnostics.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Owner<'a> {
    Option(&'a str),
    Command(&'a str),
}

impl Owner<'_> {
    fn describe(&self) -> String {
        match self {
            Owner::Option(alias) => format!("option '{alias}'"),
            Owner::Command(name) => format!("command '{name}'"),
        }
    }

    fn title(&self) -> String {
        match self {
            Owner::Option(alias) => format!("Option '{alias}'"),
            Owner::Command(name) => format!("Command '{name}'"),
        }
    }

    pub(crate) fn too_few(&self) -> String {
        match self {
            Owner::Option(alias) => format!("Required argument missing for option: '{alias}'."),
            Owner::Command(name) => format!("Required argument missing for command: '{name}'."),
        }
    }

    pub(crate) fn too_many(&self, max: usize, actual: usize) -> String {
        if max == 1 {
            format!(
                "{} expects a single argument but {actual} were provided.",
                self.title()
            )
        } else {
            format!(
                "{} expects at most {max} arguments but {actual} were provided.",
                self.title()
            )
        }
    }

    pub(crate) fn cannot_parse(&self, raw: &str, type_name: &str) -> String {
        format!(
            "Cannot parse argument '{raw}' for {} as expected type '{type_name}'.",
            self.describe()
        )
    }
}
