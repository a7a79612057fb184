//! The outcome of one parse call.
//!
//! A [`ParseResult`] is built once by the parser and never mutated afterwards.
//! It keeps a shared handle on the tree it was parsed against so accessors
//! and actions can look up symbols without extra context.

use std::sync::Arc;

use serde::Serialize;

use super::error::ParseError;
use crate::action::CliAction;
use crate::config::ParserConfig;
use crate::convert::{ConversionError, Value};
use crate::symbol::{ArgumentDef, SymbolId, SymbolKind, SymbolTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Command,
    Option,
    Argument,
    DoubleDash,
    Unparsed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub value: String,
    pub kind: TokenKind,
    pub position: usize,
}

/// Values bound to one argument slot and their conversion outcome.
#[derive(Debug, Clone)]
pub struct ArgumentResult {
    pub(crate) argument: SymbolId,
    pub(crate) values: Vec<String>,
    pub(crate) positions: Vec<usize>,
    pub(crate) conversion: Option<Result<Value, ConversionError>>,
}

impl ArgumentResult {
    pub(crate) fn new(argument: SymbolId) -> Self {
        Self {
            argument,
            values: Vec::new(),
            positions: Vec::new(),
            conversion: None,
        }
    }

    pub(crate) fn push(&mut self, value: &str, position: usize) {
        self.values.push(value.to_string());
        self.positions.push(position);
    }

    pub fn argument(&self) -> SymbolId {
        self.argument
    }

    pub fn raw_values(&self) -> &[String] {
        &self.values
    }

    /// Token index of each raw value.
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Converted value; `None` when nothing was converted (no values, or an
    /// arity violation stopped conversion).
    pub fn value(&self) -> Option<&Value> {
        self.conversion.as_ref().and_then(|c| c.as_ref().ok())
    }

    pub fn conversion_error(&self) -> Option<&ConversionError> {
        self.conversion.as_ref().and_then(|c| c.as_ref().err())
    }
}

/// One option, merged across all of its occurrences.
#[derive(Debug, Clone)]
pub struct OptionResult {
    pub(crate) option: SymbolId,
    /// Command the option was first matched under.
    pub(crate) command: SymbolId,
    pub(crate) tokens: Vec<Token>,
    pub(crate) argument: ArgumentResult,
}

impl OptionResult {
    pub fn option(&self) -> SymbolId {
        self.option
    }

    pub fn command(&self) -> SymbolId {
        self.command
    }

    /// The alias tokens, one per occurrence.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn argument(&self) -> &ArgumentResult {
        &self.argument
    }

    pub fn value(&self) -> Option<&Value> {
        self.argument.value()
    }
}

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub(crate) command: SymbolId,
    /// `None` for the parse root, which is not matched from a token.
    pub(crate) token: Option<Token>,
    pub(crate) options: Vec<SymbolId>,
    pub(crate) arguments: Vec<ArgumentResult>,
}

impl CommandResult {
    pub(crate) fn new(command: SymbolId, token: Option<Token>) -> Self {
        Self {
            command,
            token,
            options: Vec::new(),
            arguments: Vec::new(),
        }
    }

    pub fn command(&self) -> SymbolId {
        self.command
    }

    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    /// Options first matched while this command was current.
    pub fn options(&self) -> &[SymbolId] {
        &self.options
    }

    pub fn arguments(&self) -> &[ArgumentResult] {
        &self.arguments
    }
}

#[derive(Debug, Clone)]
pub struct ParseResult {
    pub(crate) tree: Arc<SymbolTree>,
    pub(crate) config: ParserConfig,
    pub(crate) commands: Vec<CommandResult>,
    pub(crate) options: Vec<OptionResult>,
    pub(crate) tokens: Vec<Token>,
    pub(crate) errors: Vec<ParseError>,
    pub(crate) unmatched: Vec<Token>,
    pub(crate) action: Option<SymbolId>,
    pub(crate) pre_actions: Vec<SymbolId>,
}

impl ParseResult {
    pub fn tree(&self) -> &SymbolTree {
        &self.tree
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Command results from the parse root down to the terminal command.
    pub fn command_results(&self) -> &[CommandResult] {
        &self.commands
    }

    pub fn root_command_result(&self) -> &CommandResult {
        &self.commands[0]
    }

    pub fn terminal_command_result(&self) -> &CommandResult {
        &self.commands[self.commands.len() - 1]
    }

    /// The deepest matched command.
    pub fn terminal_command(&self) -> SymbolId {
        self.terminal_command_result().command
    }

    /// Matched options in first-match order along the command path.
    pub fn option_results(&self) -> &[OptionResult] {
        &self.options
    }

    pub fn option_result(&self, option: SymbolId) -> Option<&OptionResult> {
        self.options.iter().find(|r| r.option == option)
    }

    /// Bound values of a positional argument or of an option's argument.
    pub fn argument_result(&self, argument: SymbolId) -> Option<&ArgumentResult> {
        self.commands
            .iter()
            .flat_map(|c| c.arguments.iter())
            .chain(self.options.iter().map(|o| &o.argument))
            .find(|r| r.argument == argument)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn unmatched_tokens(&self) -> &[Token] {
        &self.unmatched
    }

    /// Whether a command, option or argument took part in this parse.
    pub fn is_matched(&self, id: SymbolId) -> bool {
        match self.tree.get(id).map(|s| s.kind()) {
            Some(SymbolKind::Command(_)) => self.commands.iter().any(|c| c.command == id),
            Some(SymbolKind::Option(_)) => self.option_result(id).is_some(),
            Some(SymbolKind::Argument(_)) => self
                .argument_result(id)
                .is_some_and(|r| !r.values.is_empty()),
            None => false,
        }
    }

    /// Value of an option or argument.
    ///
    /// Falls back to the declared default (evaluated now) and then to `false`
    /// for bool slots. Conversion failures read as `None`.
    pub fn value_of(&self, id: SymbolId) -> Option<Value> {
        let argument = match self.tree.get(id).map(|s| s.kind()) {
            Some(SymbolKind::Option(def)) => def.argument(),
            Some(SymbolKind::Argument(_)) => id,
            _ => return None,
        };
        let def = self.tree.argument(argument)?;

        match self.argument_result(argument) {
            Some(result) if result.conversion_error().is_some() => None,
            Some(result) => match result.value() {
                Some(value) => Some(value.clone()),
                None => fallback(def),
            },
            None => fallback(def),
        }
    }

    /// The selected action, if any.
    pub fn action(&self) -> Option<Arc<dyn CliAction>> {
        self.action.and_then(|id| self.action_of(id))
    }

    /// Symbol the selected action is attached to.
    pub fn action_owner(&self) -> Option<SymbolId> {
        self.action
    }

    /// Non-exclusive option actions that run before the selected action.
    pub fn pre_actions(&self) -> Vec<Arc<dyn CliAction>> {
        self.pre_actions
            .iter()
            .filter_map(|id| self.action_of(*id))
            .collect()
    }

    fn action_of(&self, id: SymbolId) -> Option<Arc<dyn CliAction>> {
        let symbol = self.tree.get(id)?;
        let action = match symbol.kind() {
            SymbolKind::Command(def) => def.action(),
            SymbolKind::Option(def) => def.action(),
            SymbolKind::Argument(_) => None,
        }?;
        Some(Arc::clone(action.action()))
    }
}

fn fallback(def: &ArgumentDef) -> Option<Value> {
    def.default_value().or_else(|| {
        def.value_type()
            .is_bool()
            .then_some(Value::Bool(false))
    })
}
