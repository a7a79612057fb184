//! Construction-time errors for the symbol tree.
//!
//! Malformed *input* never ends up here: it becomes a [`ParseError`] entry in
//! the parse result. These errors signal programming misuse while building a
//! tree (an option without aliases, an alias containing whitespace, an id that
//! points at the wrong kind of node).
//!
//! [`ParseError`]: crate::parser::ParseError

use thiserror::Error;

use crate::symbol::SymbolId;

/// Errors raised while building or checking a [`SymbolTree`](crate::SymbolTree).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    #[error("an option must have at least one alias")]
    NoAliases,

    #[error("alias '{0}' is invalid: aliases must be non-empty and contain no whitespace")]
    InvalidAlias(String),

    #[error("symbol {id:?} is not a {expected}")]
    WrongKind { id: SymbolId, expected: &'static str },

    #[error("symbol {0:?} does not belong to this tree")]
    UnknownSymbol(SymbolId),

    #[error("alias '{alias}' is declared more than once under command '{command}'")]
    DuplicateAlias { command: String, alias: String },
}

pub type Result<T> = std::result::Result<T, SymbolError>;
