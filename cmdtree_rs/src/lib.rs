//! # cmdtree
//!
//! **Command-line front-end engine** - declare a tree of commands, options and
//! arguments once, then turn raw input into a validated, typed result and
//! dispatch it to exactly one action.
//!
//! ## Features
//!
//! - **Shell-like tokenizer** - whitespace splitting, `"` quoting, `\"` escapes
//! - **Global options** - declared once, visible on every descendant command
//! - **Alias precedence** - local beats inherited, nearest ancestor beats farther
//! - **Accumulating validation** - arity, conversion, required options and custom
//!   validators all reported in one pass, with typo suggestions
//! - **Async actions** - one future-returning action capability with cooperative
//!   cancellation; errors and panics become exit codes
//!
//! ## Quick Start
//!
//! ```rust
//! use cmdtree::{CommandSpec, OptionSpec, Parser, SymbolTree, SyncAction, ValueType};
//!
//! let mut tree = SymbolTree::new(CommandSpec::new("tool"));
//! let root = tree.root();
//! let count = tree
//!     .add_global_option(root, OptionSpec::new(["--count", "-c"]).value_type(ValueType::Int))
//!     .unwrap();
//! tree.add_command(
//!     root,
//!     CommandSpec::new("run").action(SyncAction::new(move |result| {
//!         let count = result.value_of(count).and_then(|v| v.as_int()).unwrap_or(0);
//!         Ok(i32::try_from(count)?)
//!     })),
//! )
//! .unwrap();
//!
//! let parser = Parser::new(tree);
//! assert_eq!(parser.invoke("run -c 3"), 3);
//! ```

// ============================================================================
// Core Modules
// ============================================================================

/// Shell-like splitting of a raw command line.
pub mod tokenizer;

/// The symbol tree: commands, options, arguments and their builders.
pub mod symbol;

/// Token walk, scope resolution, validation and [`ParseResult`].
pub mod parser;

/// Value types and conversion of raw text.
pub mod convert;

/// Actions and their invocation.
pub mod action;

// ============================================================================
// Supporting Modules
// ============================================================================

/// Help rendering and the `--help` / `--version` options.
pub mod help;

/// Parser configuration.
pub mod config;

/// Errors raised while building a symbol tree.
pub mod error;

/// The `cmdtree` demo front-end.
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use action::{AsyncAction, CliAction, SyncAction};
pub use config::ParserConfig;
pub use convert::{ConversionError, CustomType, Value, ValueType};
pub use error::SymbolError;
pub use help::{HelpBuilder, help_option, version_option};
pub use parser::{ParseError, ParseErrorKind, ParseResult, Parser};
pub use symbol::{ArgumentSpec, Arity, CommandSpec, OptionSpec, SymbolId, SymbolTree};
pub use tokenizer::split;
