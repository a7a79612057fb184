//! The symbol tree: commands, options and arguments.
//!
//! - `types`: node kinds stored in the arena
//! - `spec`: builder declarations used to populate a tree
//! - `tree`: the arena itself and its read accessors
//! - `alias` / `arity`: small value types shared by all nodes

mod alias;
mod arity;
mod spec;
mod tree;
mod types;

pub use alias::{AliasSet, strip_prefix};
pub use arity::Arity;
pub use spec::{ArgumentSpec, CommandSpec, OptionSpec};
pub use tree::SymbolTree;
pub use types::{
    ActionRef, ArgumentDef, CommandDef, DefaultValue, OptionDef, Symbol, SymbolId, SymbolKind,
    SymbolMeta, ValidationInput, Validator,
};
