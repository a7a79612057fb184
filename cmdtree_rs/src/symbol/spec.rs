//! Builder-style declarations consumed by [`SymbolTree`](super::SymbolTree).
//!
//! Specs are plain data; nothing is validated until they are added to a tree.

use std::sync::Arc;

use super::arity::Arity;
use super::types::{DefaultValue, ValidationInput, Validator};
use crate::action::CliAction;
use crate::convert::{Value, ValueType};

/// Declaration of a command or subcommand.
#[derive(Clone)]
pub struct CommandSpec {
    pub(crate) name: String,
    pub(crate) aliases: Vec<String>,
    pub(crate) description: Option<String>,
    pub(crate) hidden: bool,
    pub(crate) treat_unmatched_tokens_as_errors: bool,
    pub(crate) action: Option<Arc<dyn CliAction>>,
}

impl CommandSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            description: None,
            hidden: false,
            treat_unmatched_tokens_as_errors: true,
            action: None,
        }
    }

    /// Extra alias besides the name, e.g. `s` for `slice`.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// When `false`, leftover tokens are kept in the result without an error.
    pub fn treat_unmatched_tokens_as_errors(mut self, strict: bool) -> Self {
        self.treat_unmatched_tokens_as_errors = strict;
        self
    }

    pub fn action(mut self, action: impl CliAction + 'static) -> Self {
        self.action = Some(Arc::new(action));
        self
    }
}

/// Declaration of a value slot: a positional argument or an option's value.
#[derive(Debug, Clone)]
pub struct ArgumentSpec {
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) hidden: bool,
    pub(crate) value_type: ValueType,
    pub(crate) arity: Option<Arity>,
    pub(crate) default: Option<DefaultValue>,
    pub(crate) validators: Vec<Validator>,
}

impl ArgumentSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            hidden: false,
            value_type: ValueType::String,
            arity: None,
            default: None,
            validators: Vec::new(),
        }
    }

    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    /// Overrides the arity derived from the value type.
    pub fn arity(mut self, arity: Arity) -> Self {
        self.arity = Some(arity);
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// `supplier` runs when the value is read, not when the tree is built.
    pub fn default_value<F>(mut self, supplier: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::new(supplier));
        self
    }

    pub fn validator<F>(mut self, check: F) -> Self
    where
        F: Fn(&ValidationInput<'_>) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validators.push(Validator::new(check));
        self
    }

    pub(crate) fn resolved_arity(&self, for_option: bool) -> Arity {
        self.arity
            .unwrap_or_else(|| self.value_type.default_arity(for_option))
    }
}

/// Declaration of an option such as `-v` / `--verbose`.
#[derive(Clone)]
pub struct OptionSpec {
    pub(crate) aliases: Vec<String>,
    pub(crate) name: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) hidden: bool,
    pub(crate) argument: Option<ArgumentSpec>,
    pub(crate) required: bool,
    pub(crate) allow_multiple_arguments_per_token: bool,
    pub(crate) action: Option<Arc<dyn CliAction>>,
    pub(crate) validators: Vec<Validator>,
}

impl OptionSpec {
    pub fn new<I, S>(aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            aliases: aliases.into_iter().map(Into::into).collect(),
            name: None,
            description: None,
            hidden: false,
            argument: None,
            required: false,
            allow_multiple_arguments_per_token: true,
            action: None,
            validators: Vec::new(),
        }
    }

    /// Explicit name; otherwise the longest alias without its prefix.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Shorthand for an argument of the given type with its default arity.
    pub fn value_type(mut self, value_type: ValueType) -> Self {
        let argument = self
            .argument
            .take()
            .unwrap_or_else(|| ArgumentSpec::new("value"));
        self.argument = Some(argument.value_type(value_type));
        self
    }

    pub fn argument(mut self, argument: ArgumentSpec) -> Self {
        self.argument = Some(argument);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn allow_multiple_arguments_per_token(mut self, allow: bool) -> Self {
        self.allow_multiple_arguments_per_token = allow;
        self
    }

    pub fn action(mut self, action: impl CliAction + 'static) -> Self {
        self.action = Some(Arc::new(action));
        self
    }

    pub fn validator<F>(mut self, check: F) -> Self
    where
        F: Fn(&ValidationInput<'_>) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validators.push(Validator::new(check));
        self
    }

    /// Argument used when none was declared: a bool flag.
    pub(crate) fn take_argument(&mut self) -> ArgumentSpec {
        self.argument
            .take()
            .unwrap_or_else(|| ArgumentSpec::new("value").value_type(ValueType::Bool))
    }
}
