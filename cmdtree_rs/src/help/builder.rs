//! Plain-text help rendering.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::parser::OptionScope;
use crate::symbol::{ArgumentDef, SymbolId, SymbolTree};

/// Replacement text for one symbol's help row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelpOverride {
    /// Left column, e.g. `-o, --output <path>`.
    pub first_column: Option<String>,
    /// Right column, normally the description.
    pub second_column: Option<String>,
    /// Replaces the `[default: ..]` suffix; an empty string removes it.
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct HelpBuilder {
    overrides: HashMap<SymbolId, HelpOverride>,
}

type Row = (String, String);

impl HelpBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Customize how `symbol` is listed. A later call replaces an earlier one.
    pub fn customize(&mut self, symbol: SymbolId, customization: HelpOverride) -> &mut Self {
        self.overrides.insert(symbol, customization);
        self
    }

    pub fn override_for(&self, symbol: SymbolId) -> Option<&HelpOverride> {
        self.overrides.get(&symbol)
    }

    /// Render help for `command`: description, usage, then the visible
    /// arguments, options and subcommands. Hidden symbols are left out.
    pub fn render(&self, tree: &SymbolTree, command: SymbolId) -> String {
        let mut out = String::new();

        if let Some(description) = tree.symbol(command).description() {
            let _ = writeln!(out, "Description:\n  {description}\n");
        }
        let _ = writeln!(out, "Usage:\n  {}\n", self.usage(tree, command));

        let arguments: Vec<Row> = tree
            .command(command)
            .map(|def| def.arguments().to_vec())
            .unwrap_or_default()
            .into_iter()
            .filter(|id| !tree.symbol(*id).is_hidden())
            .map(|id| self.argument_row(tree, id))
            .collect();
        write_section(&mut out, "Arguments", &arguments);

        let scope = OptionScope::at(tree, command);
        let options: Vec<Row> = scope
            .options()
            .into_iter()
            .filter(|id| !tree.symbol(*id).is_hidden())
            .map(|id| self.option_row(tree, &scope, id))
            .collect();
        write_section(&mut out, "Options", &options);

        let commands: Vec<Row> = tree
            .command(command)
            .map(|def| def.commands().to_vec())
            .unwrap_or_default()
            .into_iter()
            .filter(|id| !tree.symbol(*id).is_hidden())
            .map(|id| self.command_row(tree, id))
            .collect();
        write_section(&mut out, "Commands", &commands);

        let trimmed = out.trim_end().len();
        out.truncate(trimmed);
        out.push('\n');
        out
    }

    /// `root sub <arg> [options] [command]`
    pub fn usage(&self, tree: &SymbolTree, command: SymbolId) -> String {
        let mut parts: Vec<String> = tree
            .ancestors(command)
            .into_iter()
            .rev()
            .chain(std::iter::once(command))
            .map(|id| tree.name(id).to_string())
            .collect();

        let Some(def) = tree.command(command) else {
            return parts.join(" ");
        };

        for argument in def.arguments() {
            if !tree.symbol(*argument).is_hidden() {
                parts.push(argument_usage(tree, *argument));
            }
        }
        let has_options = OptionScope::at(tree, command)
            .options()
            .iter()
            .any(|id| !tree.symbol(*id).is_hidden());
        if has_options {
            parts.push("[options]".to_string());
        }
        if def.commands().iter().any(|id| !tree.symbol(*id).is_hidden()) {
            parts.push("[command]".to_string());
        }
        parts.join(" ")
    }

    fn argument_row(&self, tree: &SymbolTree, argument: SymbolId) -> Row {
        let first = argument_usage(tree, argument);
        let second = describe(tree, argument, tree.argument(argument));
        self.apply(argument, first, second, tree.argument(argument))
    }

    fn option_row(&self, tree: &SymbolTree, scope: &OptionScope, option: SymbolId) -> Row {
        let mut aliases = scope.aliases_of(option);
        aliases.sort_by_key(|alias| (alias.len(), *alias));
        let mut first = aliases.join(", ");

        let argument = tree.option_argument(option);
        if let Some(def) = argument
            && def.arity().max > 0
            && !def.value_type().is_bool()
        {
            let name = tree
                .option(option)
                .map(|o| tree.name(o.argument()))
                .unwrap_or("value");
            let _ = write!(first, " <{name}>");
        }

        let mut second = describe(tree, option, argument);
        if tree.is_required(option) {
            second = if second.is_empty() {
                "(REQUIRED)".to_string()
            } else {
                format!("{second} (REQUIRED)")
            };
        }
        self.apply(option, first, second, argument)
    }

    fn command_row(&self, tree: &SymbolTree, command: SymbolId) -> Row {
        let mut first = tree.name(command).to_string();
        if let Some(def) = tree.command(command) {
            for argument in def.arguments() {
                if !tree.symbol(*argument).is_hidden() {
                    first.push(' ');
                    first.push_str(&argument_usage(tree, *argument));
                }
            }
        }
        let second = tree
            .symbol(command)
            .description()
            .unwrap_or_default()
            .to_string();
        self.apply(command, first, second, None)
    }

    fn apply(
        &self,
        symbol: SymbolId,
        first: String,
        second: String,
        argument: Option<&ArgumentDef>,
    ) -> Row {
        let custom = self.overrides.get(&symbol);
        let first = custom
            .and_then(|c| c.first_column.clone())
            .unwrap_or(first);
        let mut second = custom
            .and_then(|c| c.second_column.clone())
            .unwrap_or(second);

        let default = match custom.and_then(|c| c.default_value.clone()) {
            Some(text) => Some(text),
            None => argument
                .and_then(ArgumentDef::default_value)
                .map(|value| value.to_string()),
        };
        if let Some(default) = default.filter(|d| !d.is_empty()) {
            if !second.is_empty() {
                second.push(' ');
            }
            let _ = write!(second, "[default: {default}]");
        }
        (first, second)
    }
}

fn describe(tree: &SymbolTree, symbol: SymbolId, argument: Option<&ArgumentDef>) -> String {
    let mut text = tree
        .symbol(symbol)
        .description()
        .unwrap_or_default()
        .to_string();
    if text.is_empty()
        && let Some(def) = argument
        && !def.value_type().is_bool()
    {
        text = def.value_type().type_name();
    }
    text
}

/// `<name>`, `[<name>]` when optional, with `...` when it takes several values.
fn argument_usage(tree: &SymbolTree, argument: SymbolId) -> String {
    let name = tree.name(argument);
    let arity = tree.arity(argument).unwrap_or_default();
    let mut text = format!("<{name}>");
    if arity.max > 1 {
        text.push_str("...");
    }
    let optional = arity.min == 0
        || tree
            .argument(argument)
            .is_some_and(ArgumentDef::has_default_value);
    if optional {
        text = format!("[{text}]");
    }
    text
}

fn write_section(out: &mut String, title: &str, rows: &[Row]) {
    if rows.is_empty() {
        return;
    }
    let width = rows.iter().map(|(first, _)| first.len()).max().unwrap_or(0);
    let _ = writeln!(out, "{title}:");
    for (first, second) in rows {
        if second.is_empty() {
            let _ = writeln!(out, "  {first}");
        } else {
            let _ = writeln!(out, "  {first:<width$}  {second}");
        }
    }
    out.push('\n');
}
