//! Token walk, binding and validation.
//!
//! The walk keeps a cursor on the current command, starting at the parse
//! root. Per token, in order of precedence:
//!
//! 1. after `--`, everything is positional
//! 2. an alias of a subcommand descends into it
//! 3. an alias of a visible option starts an option occurrence (also in the
//!    inline `--name=value` form)
//! 4. otherwise the token fills the next positional slot with room
//! 5. otherwise it is unmatched
//!
//! Conversion and validation run after the walk and accumulate every
//! violation. Nothing in here returns early on bad input.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace};

use super::error::{Owner, ParseError, ParseErrorKind};
use super::helpers::{split_inline, suggest_similar};
use super::result::{ArgumentResult, CommandResult, OptionResult, ParseResult, Token, TokenKind};
use super::scope::OptionScope;
use crate::action;
use crate::config::ParserConfig;
use crate::convert::{convert, parse_bool};
use crate::symbol::{ArgumentDef, SymbolId, SymbolTree, ValidationInput, Validator};

/// Parse `args` against `tree`, starting at `command`.
///
/// Ancestors of `command` still contribute their global options.
pub fn parse<S: AsRef<str>>(
    tree: &Arc<SymbolTree>,
    command: SymbolId,
    args: &[S],
    config: &ParserConfig,
) -> ParseResult {
    let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
    debug!(
        command = tree.name(command),
        tokens = args.len(),
        "parsing command line"
    );

    let mut operation = ParseOperation::new(tree, command, config);
    operation.walk(&args);
    operation.bind();
    operation.validate();
    let result = operation.finish(Arc::clone(tree));

    debug!(
        terminal = tree.name(result.terminal_command()),
        errors = result.errors.len(),
        unmatched = result.unmatched.len(),
        "parse complete"
    );
    result
}

struct ParseOperation<'a> {
    tree: &'a SymbolTree,
    config: &'a ParserConfig,
    current: SymbolId,
    scope: OptionScope,
    /// Next positional slot of the current command.
    slot: usize,
    after_double_dash: bool,
    commands: Vec<CommandResult>,
    options: Vec<OptionResult>,
    option_index: HashMap<SymbolId, usize>,
    tokens: Vec<Token>,
    unmatched: Vec<Token>,
    errors: Vec<ParseError>,
}

impl<'a> ParseOperation<'a> {
    fn new(tree: &'a SymbolTree, command: SymbolId, config: &'a ParserConfig) -> Self {
        Self {
            tree,
            config,
            current: command,
            scope: OptionScope::at(tree, command),
            slot: 0,
            after_double_dash: false,
            commands: vec![CommandResult::new(command, None)],
            options: Vec::new(),
            option_index: HashMap::new(),
            tokens: Vec::new(),
            unmatched: Vec::new(),
            errors: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Structural matching
    // ------------------------------------------------------------------

    fn walk(&mut self, args: &[&str]) {
        let mut index = 0;
        while index < args.len() {
            let raw = args[index];

            if self.after_double_dash {
                self.bind_positional(raw, index);
                index += 1;
                continue;
            }

            if raw == "--" {
                self.record(raw, TokenKind::DoubleDash, index);
                self.after_double_dash = true;
                index += 1;
                continue;
            }

            if let Some(sub) = self.tree.find_subcommand(self.current, raw) {
                self.descend(sub, raw, index);
                index += 1;
                continue;
            }

            if let Some(option) = self.scope.resolve(raw) {
                index = self.match_option(option, args, index, None);
                continue;
            }

            if let Some((alias, inline)) = split_inline(raw, &self.config.inline_delimiters)
                && let Some(option) = self.scope.resolve(alias)
            {
                index = self.match_option(option, args, index, Some(inline));
                continue;
            }

            self.bind_positional(raw, index);
            index += 1;
        }
    }

    fn record(&mut self, raw: &str, kind: TokenKind, position: usize) -> Token {
        let token = Token {
            value: raw.to_string(),
            kind,
            position,
        };
        self.tokens.push(token.clone());
        token
    }

    fn descend(&mut self, command: SymbolId, raw: &str, position: usize) {
        trace!(command = self.tree.name(command), position, "descending");
        let token = self.record(raw, TokenKind::Command, position);
        self.commands.push(CommandResult::new(command, Some(token)));
        self.current = command;
        self.scope = OptionScope::at(self.tree, command);
        self.slot = 0;
    }

    /// Whether `raw` would be recognized as a command or option here.
    fn is_recognized(&self, raw: &str) -> bool {
        if raw == "--"
            || self.tree.find_subcommand(self.current, raw).is_some()
            || self.scope.resolve(raw).is_some()
        {
            return true;
        }
        split_inline(raw, &self.config.inline_delimiters)
            .is_some_and(|(alias, _)| self.scope.resolve(alias).is_some())
    }

    /// Match one occurrence of `option`; returns the index of the next token
    /// to look at.
    fn match_option(
        &mut self,
        option: SymbolId,
        args: &[&str],
        index: usize,
        inline: Option<&str>,
    ) -> usize {
        let tree = self.tree;
        let (Some(option_def), Some(argument_def)) =
            (tree.option(option), tree.option_argument(option))
        else {
            return index + 1;
        };
        trace!(option = tree.name(option), position = index, "matched option");

        let token = self.record(args[index], TokenKind::Option, index);
        let slot = match self.option_index.get(&option) {
            Some(slot) => *slot,
            None => {
                let slot = self.options.len();
                self.options.push(OptionResult {
                    option,
                    command: self.current,
                    tokens: Vec::new(),
                    argument: ArgumentResult::new(option_def.argument()),
                });
                self.option_index.insert(option, slot);
                if let Some(command) = self.commands.last_mut() {
                    command.options.push(option);
                }
                slot
            }
        };
        self.options[slot].tokens.push(token);

        let arity = argument_def.arity();
        let multiple = option_def.allow_multiple_arguments_per_token();

        if let Some(inline) = inline {
            if multiple && arity.max > 1 {
                for part in inline.split(',') {
                    self.options[slot].argument.push(part, index);
                }
            } else {
                self.options[slot].argument.push(inline, index);
            }
            return index + 1;
        }

        let per_occurrence = if multiple { arity.max } else { arity.max.min(1) };
        let optional_bool = argument_def.value_type().is_bool() && arity.min == 0;

        let mut next = index + 1;
        let mut taken = 0;
        while taken < per_occurrence && next < args.len() {
            let candidate = args[next];
            if self.is_recognized(candidate) {
                break;
            }
            if optional_bool && parse_bool(candidate).is_none() {
                break;
            }
            self.record(candidate, TokenKind::Argument, next);
            self.options[slot].argument.push(candidate, next);
            taken += 1;
            next += 1;
        }
        next
    }

    fn bind_positional(&mut self, raw: &str, position: usize) {
        let tree = self.tree;
        let arguments = tree
            .command(self.current)
            .map(|def| def.arguments())
            .unwrap_or_default();

        while let Some(argument) = arguments.get(self.slot).copied() {
            let max = tree.arity(argument).map_or(0, |a| a.max);
            let Some(command) = self.commands.last_mut() else {
                break;
            };
            let bound = command
                .arguments
                .iter()
                .find(|r| r.argument == argument)
                .map_or(0, |r| r.values.len());
            if bound < max {
                match command.arguments.iter_mut().find(|r| r.argument == argument) {
                    Some(result) => result.push(raw, position),
                    None => {
                        let mut result = ArgumentResult::new(argument);
                        result.push(raw, position);
                        command.arguments.push(result);
                    }
                }
                self.record(raw, TokenKind::Argument, position);
                return;
            }
            self.slot += 1;
        }

        self.unmatched_token(raw, position);
    }

    fn unmatched_token(&mut self, raw: &str, position: usize) {
        trace!(token = raw, position, "unmatched token");
        let token = self.record(raw, TokenKind::Unparsed, position);
        self.unmatched.push(token);

        let strict = self
            .tree
            .command(self.current)
            .is_some_and(|def| def.treat_unmatched_tokens_as_errors());
        if !strict {
            return;
        }

        let suggestion = if self.config.suggestions {
            let subcommands = self
                .tree
                .command(self.current)
                .map(|def| def.commands().to_vec())
                .unwrap_or_default();
            let tree = self.tree;
            let candidates: Vec<&str> = subcommands
                .iter()
                .filter(|id| !tree.is_hidden(**id))
                .flat_map(move |id| tree.aliases(*id))
                .chain(
                    self.scope
                        .entries()
                        .filter(move |(_, id)| !tree.is_hidden(*id))
                        .map(|(alias, _)| alias),
                )
                .collect();
            suggest_similar(raw, candidates)
        } else {
            None
        };
        self.errors
            .push(ParseError::unrecognized(raw, position, suggestion));
    }

    // ------------------------------------------------------------------
    // Conversion
    // ------------------------------------------------------------------

    fn bind(&mut self) {
        let tree = self.tree;
        let mut errors = Vec::new();

        for result in &mut self.options {
            let alias = tree.symbol(result.option).display_name();
            let position = result.tokens.first().map(|t| t.position);
            if let Some(def) = tree.argument(result.argument.argument) {
                bind_argument(
                    &mut result.argument,
                    def,
                    Owner::Option(alias),
                    position,
                    &mut errors,
                );
            }
        }

        for command in &mut self.commands {
            let name = tree.name(command.command);
            let position = command.token.as_ref().map(|t| t.position);
            for result in &mut command.arguments {
                if let Some(def) = tree.argument(result.argument) {
                    bind_argument(result, def, Owner::Command(name), position, &mut errors);
                }
            }
            let declared = tree
                .command(command.command)
                .map(|def| def.arguments())
                .unwrap_or_default();
            for argument in declared {
                let bound = command.arguments.iter().any(|r| r.argument == *argument);
                let Some(def) = tree.argument(*argument) else {
                    continue;
                };
                if !bound && def.arity().min > 0 && !def.has_default_value() {
                    errors.push(
                        ParseError::new(
                            ParseErrorKind::ArityViolation,
                            Owner::Command(name).too_few(),
                        )
                        .at(position)
                        .for_symbol(*argument),
                    );
                }
            }
        }

        self.errors.extend(errors);
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    fn validate(&mut self) {
        let tree = self.tree;
        let mut errors = Vec::new();

        for result in &self.options {
            let Some(value) = result.argument.value() else {
                continue;
            };
            let symbol = tree.symbol(result.option);
            let position = result.tokens.first().map(|t| t.position);
            let input = ValidationInput {
                symbol: result.option,
                display_name: symbol.display_name(),
                tokens: &result.argument.values,
                value,
            };
            let argument_validators = tree
                .argument(result.argument.argument)
                .map(ArgumentDef::validators)
                .unwrap_or_default();
            let option_validators = tree
                .option(result.option)
                .map(|def| def.validators())
                .unwrap_or_default();
            run_validators(
                option_validators.iter().chain(argument_validators),
                &input,
                position,
                &mut errors,
            );
        }

        for command in &self.commands {
            for result in &command.arguments {
                let (Some(value), Some(def)) = (result.value(), tree.argument(result.argument))
                else {
                    continue;
                };
                let input = ValidationInput {
                    symbol: result.argument,
                    display_name: tree.name(result.argument),
                    tokens: &result.values,
                    value,
                };
                run_validators(
                    def.validators().iter(),
                    &input,
                    result.positions.first().copied(),
                    &mut errors,
                );
            }
        }

        let terminal = self.current;
        let visible = OptionScope::at(tree, terminal).options();
        for option in visible {
            let Some(def) = tree.option(option) else {
                continue;
            };
            let has_default = tree
                .option_argument(option)
                .is_some_and(ArgumentDef::has_default_value);
            if def.is_required() && !self.option_index.contains_key(&option) && !has_default {
                errors.push(ParseError::missing_option(
                    tree.symbol(option).display_name(),
                    option,
                ));
            }
        }

        if let Some(def) = tree.command(terminal)
            && !def.commands().is_empty()
            && def.action().is_none()
        {
            errors.push(ParseError::missing_command(terminal));
        }

        self.errors.extend(errors);
    }

    fn finish(self, tree: Arc<SymbolTree>) -> ParseResult {
        let (selected, pre_actions) = action::select(&tree, &self.options, self.current);
        ParseResult {
            tree,
            config: self.config.clone(),
            commands: self.commands,
            options: self.options,
            tokens: self.tokens,
            errors: self.errors,
            unmatched: self.unmatched,
            action: selected,
            pre_actions,
        }
    }
}

/// Check arity and convert one bound slot.
fn bind_argument(
    result: &mut ArgumentResult,
    def: &ArgumentDef,
    owner: Owner<'_>,
    position: Option<usize>,
    errors: &mut Vec<ParseError>,
) {
    let arity = def.arity();
    let count = result.values.len();

    if count < arity.min {
        errors.push(
            ParseError::new(ParseErrorKind::ArityViolation, owner.too_few())
                .at(position)
                .for_symbol(result.argument),
        );
        return;
    }
    if count > arity.max {
        errors.push(
            ParseError::new(ParseErrorKind::ArityViolation, owner.too_many(arity.max, count))
                .at(position)
                .for_symbol(result.argument),
        );
        return;
    }
    if count == 0 && !def.value_type().is_bool() && !def.value_type().is_list() {
        return;
    }

    let conversion = convert(&result.values, def.value_type());
    if let Err(err) = &conversion {
        let raw = err.raw().unwrap_or_default();
        let at = result
            .values
            .iter()
            .position(|v| v == raw)
            .and_then(|i| result.positions.get(i).copied())
            .or(position);
        errors.push(
            ParseError::new(
                ParseErrorKind::ConversionFailure,
                owner.cannot_parse(raw, err.type_name()),
            )
            .at(at)
            .for_symbol(result.argument),
        );
    }
    result.conversion = Some(conversion);
}

fn run_validators<'v>(
    validators: impl Iterator<Item = &'v Validator>,
    input: &ValidationInput<'_>,
    position: Option<usize>,
    errors: &mut Vec<ParseError>,
) {
    for validator in validators {
        if let Err(message) = validator.check(input) {
            errors.push(
                ParseError::new(ParseErrorKind::ValidationFailure, message)
                    .at(position)
                    .for_symbol(input.symbol),
            );
        }
    }
}
