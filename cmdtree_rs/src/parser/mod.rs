//! Parsing a command line against a [`SymbolTree`].
//!
//! - `walk`: token walk, conversion and validation
//! - `scope`: which options are visible at a command
//! - `result`: the immutable [`ParseResult`]
//! - `error`: structured diagnostics

mod error;
mod helpers;
mod result;
mod scope;
mod walk;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::ParserConfig;
use crate::symbol::{SymbolId, SymbolTree};
use crate::tokenizer;

pub use error::{ParseError, ParseErrorKind};
pub use result::{ArgumentResult, CommandResult, OptionResult, ParseResult, Token, TokenKind};
pub use scope::OptionScope;
pub use walk::parse;

/// A symbol tree paired with the configuration used to parse against it.
///
/// The tree is shared with every [`ParseResult`] produced, so results stay
/// valid after the parser is dropped or its tree is edited (edits copy the
/// tree when results still hold it).
#[derive(Debug, Clone)]
pub struct Parser {
    tree: Arc<SymbolTree>,
    config: ParserConfig,
}

impl Parser {
    pub fn new(tree: SymbolTree) -> Self {
        Self::with_config(tree, ParserConfig::default())
    }

    pub fn with_config(tree: SymbolTree, config: ParserConfig) -> Self {
        Self {
            tree: Arc::new(tree),
            config,
        }
    }

    pub fn tree(&self) -> &SymbolTree {
        &self.tree
    }

    /// Mutable access for editing the tree between parses.
    pub fn tree_mut(&mut self) -> &mut SymbolTree {
        Arc::make_mut(&mut self.tree)
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ParserConfig {
        &mut self.config
    }

    /// Split a raw command line and parse it from the root command.
    pub fn parse(&self, line: &str) -> ParseResult {
        self.parse_args(&tokenizer::split(line))
    }

    /// Parse pre-split arguments (e.g. `std::env::args().skip(1)`).
    pub fn parse_args<S: AsRef<str>>(&self, args: &[S]) -> ParseResult {
        self.parse_from(self.tree.root(), args)
    }

    /// Parse starting at a command other than the root.
    pub fn parse_from<S: AsRef<str>>(&self, command: SymbolId, args: &[S]) -> ParseResult {
        walk::parse(&self.tree, command, args, &self.config)
    }

    /// Parse `line` and run the selected action synchronously.
    pub fn invoke(&self, line: &str) -> i32 {
        self.parse(line).invoke()
    }

    /// Parse `line` and run the selected action on the current runtime.
    pub async fn invoke_async(&self, line: &str, cancel: CancellationToken) -> i32 {
        self.parse(line).invoke_async(cancel).await
    }
}
