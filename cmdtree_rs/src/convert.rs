//! Binding raw token text to typed values.
//!
//! Conversion never panics and never leaks inner parser errors: a failure is a
//! [`ConversionError`] that carries only the offending text and the
//! human-facing name of the target type.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::symbol::Arity;

type ParseFn = dyn Fn(&str) -> Option<Value> + Send + Sync;

/// User-supplied scalar type.
#[derive(Clone)]
pub struct CustomType {
    name: String,
    parse: Arc<ParseFn>,
}

impl CustomType {
    /// `parse` returns `None` when the text is not a valid value.
    pub fn new<F>(name: impl Into<String>, parse: F) -> Self
    where
        F: Fn(&str) -> Option<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            parse: Arc::new(parse),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for CustomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomType")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Semantic type of an argument's values.
#[derive(Debug, Clone)]
pub enum ValueType {
    Bool,
    String,
    Int,
    UInt,
    Float,
    Path,
    /// One of a fixed set of strings (case-sensitive).
    Choice(Vec<String>),
    Custom(CustomType),
    /// Ordered sequence of the inner scalar type.
    List(Box<ValueType>),
}

impl ValueType {
    pub fn list(inner: ValueType) -> Self {
        ValueType::List(Box::new(inner))
    }

    pub fn choice<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ValueType::Choice(values.into_iter().map(Into::into).collect())
    }

    /// Name shown to users in conversion errors and help.
    pub fn type_name(&self) -> String {
        match self {
            ValueType::Bool => "bool".to_string(),
            ValueType::String => "string".to_string(),
            ValueType::Int => "integer".to_string(),
            ValueType::UInt => "unsigned integer".to_string(),
            ValueType::Float => "number".to_string(),
            ValueType::Path => "path".to_string(),
            ValueType::Choice(values) => format!("one of [{}]", values.join(", ")),
            ValueType::Custom(custom) => custom.name.clone(),
            ValueType::List(inner) => inner.type_name(),
        }
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, ValueType::Bool)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, ValueType::List(_))
    }

    /// Arity used when an argument doesn't declare one.
    ///
    /// Lists behind an option need at least one value; positional lists may
    /// be empty.
    pub fn default_arity(&self, for_option: bool) -> Arity {
        match self {
            ValueType::Bool => Arity::ZERO_OR_ONE,
            ValueType::List(_) if for_option => Arity::ONE_OR_MORE,
            ValueType::List(_) => Arity::ZERO_OR_MORE,
            _ => Arity::EXACTLY_ONE,
        }
    }

    fn parse_scalar(&self, raw: &str) -> Option<Value> {
        match self {
            ValueType::Bool => parse_bool(raw).map(Value::Bool),
            ValueType::String => Some(Value::String(raw.to_string())),
            ValueType::Int => raw.parse().ok().map(Value::Int),
            ValueType::UInt => raw.parse().ok().map(Value::UInt),
            ValueType::Float => raw.parse().ok().map(Value::Float),
            ValueType::Path => Some(Value::Path(PathBuf::from(raw))),
            ValueType::Choice(values) => values
                .iter()
                .any(|v| v == raw)
                .then(|| Value::String(raw.to_string())),
            ValueType::Custom(custom) => (custom.parse)(raw),
            ValueType::List(inner) => inner.parse_scalar(raw),
        }
    }
}

/// Accepts `true` / `false` in any letter case.
pub fn parse_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// A converted value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    String(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Path(PathBuf),
    List(Vec<Value>),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Value::UInt(u) => Some(*u),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&std::path::Path> {
        match self {
            Value::Path(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::UInt(u) => write!(f, "{u}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Path(p) => write!(f, "{}", p.display()),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

/// Why raw text could not become a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("cannot parse '{raw}' as {type_name}")]
    Invalid { raw: String, type_name: String },

    #[error("no value supplied for {type_name}")]
    MissingValue { type_name: String },
}

impl ConversionError {
    pub fn raw(&self) -> Option<&str> {
        match self {
            ConversionError::Invalid { raw, .. } => Some(raw),
            ConversionError::MissingValue { .. } => None,
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            ConversionError::Invalid { type_name, .. }
            | ConversionError::MissingValue { type_name } => type_name,
        }
    }
}

/// Convert the raw values bound to one argument.
///
/// A bool with no raw value means "present", i.e. `true`. Several raw values
/// for a scalar type collect into a [`Value::List`].
pub fn convert(raw: &[String], value_type: &ValueType) -> Result<Value, ConversionError> {
    let invalid = |text: &str| ConversionError::Invalid {
        raw: text.to_string(),
        type_name: value_type.type_name(),
    };

    if value_type.is_list() || raw.len() > 1 {
        let mut items = Vec::with_capacity(raw.len());
        for text in raw {
            items.push(value_type.parse_scalar(text).ok_or_else(|| invalid(text))?);
        }
        return Ok(Value::List(items));
    }

    match raw.first() {
        Some(text) => value_type.parse_scalar(text).ok_or_else(|| invalid(text)),
        None if value_type.is_bool() => Ok(Value::Bool(true)),
        None => Err(ConversionError::MissingValue {
            type_name: value_type.type_name(),
        }),
    }
}
