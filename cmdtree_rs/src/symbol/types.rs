//! Node types stored in the symbol arena.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::alias::{AliasSet, strip_prefix};
use super::arity::Arity;
use crate::action::CliAction;
use crate::convert::{Value, ValueType};

/// Stable handle of a node inside a [`SymbolTree`](super::SymbolTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SymbolId(pub(crate) usize);

impl SymbolId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Data handed to a custom validator once a value has been bound.
#[derive(Debug)]
pub struct ValidationInput<'a> {
    pub symbol: SymbolId,
    /// Alias or name used in diagnostics.
    pub display_name: &'a str,
    pub tokens: &'a [String],
    pub value: &'a Value,
}

type ValidateFn = dyn Fn(&ValidationInput<'_>) -> Result<(), String> + Send + Sync;
type DefaultFn = dyn Fn() -> Value + Send + Sync;

/// A custom check run after conversion; `Err` carries the user-facing message.
#[derive(Clone)]
pub struct Validator(Arc<ValidateFn>);

impl Validator {
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&ValidationInput<'_>) -> Result<(), String> + Send + Sync + 'static,
    {
        Self(Arc::new(check))
    }

    pub fn check(&self, input: &ValidationInput<'_>) -> Result<(), String> {
        (self.0)(input)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator(..)")
    }
}

/// Lazily evaluated default value.
#[derive(Clone)]
pub struct DefaultValue(Arc<DefaultFn>);

impl DefaultValue {
    pub fn new<F>(supplier: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(supplier))
    }

    pub fn get(&self) -> Value {
        (self.0)()
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DefaultValue(..)")
    }
}

/// Shared reference to an action attached to a command or option.
#[derive(Clone)]
pub struct ActionRef(pub(crate) Arc<dyn CliAction>);

impl ActionRef {
    pub fn action(&self) -> &Arc<dyn CliAction> {
        &self.0
    }
}

impl fmt::Debug for ActionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRef")
            .field("exclusive", &self.0.is_exclusive())
            .finish_non_exhaustive()
    }
}

/// Presentation metadata shared by every symbol kind.
#[derive(Debug, Clone, Default)]
pub struct SymbolMeta {
    pub(crate) explicit_name: Option<String>,
    pub(crate) aliases: AliasSet,
    pub(crate) description: Option<String>,
    pub(crate) hidden: bool,
}

#[derive(Debug, Clone)]
pub struct CommandDef {
    pub(crate) commands: Vec<SymbolId>,
    pub(crate) options: Vec<SymbolId>,
    pub(crate) arguments: Vec<SymbolId>,
    pub(crate) treat_unmatched_tokens_as_errors: bool,
    pub(crate) action: Option<ActionRef>,
}

impl CommandDef {
    pub fn commands(&self) -> &[SymbolId] {
        &self.commands
    }

    /// Local and global options declared on this command, in registration order.
    pub fn options(&self) -> &[SymbolId] {
        &self.options
    }

    pub fn arguments(&self) -> &[SymbolId] {
        &self.arguments
    }

    pub fn treat_unmatched_tokens_as_errors(&self) -> bool {
        self.treat_unmatched_tokens_as_errors
    }

    pub fn action(&self) -> Option<&ActionRef> {
        self.action.as_ref()
    }
}

#[derive(Debug, Clone)]
pub struct OptionDef {
    pub(crate) argument: SymbolId,
    pub(crate) required: bool,
    pub(crate) allow_multiple_arguments_per_token: bool,
    pub(crate) global: bool,
    pub(crate) action: Option<ActionRef>,
    pub(crate) validators: Vec<Validator>,
}

impl OptionDef {
    pub fn argument(&self) -> SymbolId {
        self.argument
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn allow_multiple_arguments_per_token(&self) -> bool {
        self.allow_multiple_arguments_per_token
    }

    pub fn is_global(&self) -> bool {
        self.global
    }

    pub fn action(&self) -> Option<&ActionRef> {
        self.action.as_ref()
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }
}

#[derive(Debug, Clone)]
pub struct ArgumentDef {
    pub(crate) value_type: ValueType,
    pub(crate) arity: Arity,
    pub(crate) default: Option<DefaultValue>,
    pub(crate) validators: Vec<Validator>,
}

impl ArgumentDef {
    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    pub fn has_default_value(&self) -> bool {
        self.default.is_some()
    }

    /// Evaluates the supplier on every call.
    pub fn default_value(&self) -> Option<Value> {
        self.default.as_ref().map(DefaultValue::get)
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }
}

#[derive(Debug, Clone)]
pub enum SymbolKind {
    Command(CommandDef),
    Option(OptionDef),
    Argument(ArgumentDef),
}

/// One node of the tree.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub(crate) meta: SymbolMeta,
    pub(crate) kind: SymbolKind,
    pub(crate) parent: Option<SymbolId>,
}

impl Symbol {
    /// Explicit name, or the longest alias without its prefix.
    pub fn name(&self) -> &str {
        if let Some(name) = &self.meta.explicit_name {
            return name;
        }
        self.meta.aliases.longest().map(strip_prefix).unwrap_or_default()
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.meta.aliases.iter()
    }

    pub fn has_alias(&self, alias: &str) -> bool {
        self.meta.aliases.contains(alias)
    }

    /// Longest alias, falling back to the name for arguments.
    pub fn display_name(&self) -> &str {
        self.meta.aliases.longest().unwrap_or_else(|| self.name())
    }

    pub fn description(&self) -> Option<&str> {
        self.meta.description.as_deref()
    }

    pub fn is_hidden(&self) -> bool {
        self.meta.hidden
    }

    pub fn parent(&self) -> Option<SymbolId> {
        self.parent
    }

    pub fn kind(&self) -> &SymbolKind {
        &self.kind
    }

    pub fn as_command(&self) -> Option<&CommandDef> {
        match &self.kind {
            SymbolKind::Command(def) => Some(def),
            _ => None,
        }
    }

    pub fn as_option(&self) -> Option<&OptionDef> {
        match &self.kind {
            SymbolKind::Option(def) => Some(def),
            _ => None,
        }
    }

    pub fn as_argument(&self) -> Option<&ArgumentDef> {
        match &self.kind {
            SymbolKind::Argument(def) => Some(def),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            SymbolKind::Command(_) => "command",
            SymbolKind::Option(_) => "option",
            SymbolKind::Argument(_) => "argument",
        }
    }
}
