//! Ordered alias sets and prefix handling.

use crate::error::{Result, SymbolError};

/// Prefixes stripped when deriving an option's name from its aliases.
const PREFIXES: &[&str] = &["--", "-", "/"];

/// Remove the leading `--`, `-` or `/` from an alias.
pub fn strip_prefix(alias: &str) -> &str {
    for prefix in PREFIXES {
        if let Some(rest) = alias.strip_prefix(prefix)
            && !rest.is_empty()
        {
            return rest;
        }
    }
    alias
}

/// Reject aliases that can never be produced by the tokenizer.
pub(crate) fn check_alias(alias: &str) -> Result<()> {
    if alias.is_empty() || alias.chars().any(char::is_whitespace) {
        return Err(SymbolError::InvalidAlias(alias.to_string()));
    }
    Ok(())
}

/// Insertion-ordered set of aliases.
///
/// Order matters for display only; lookups are plain membership tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasSet {
    values: Vec<String>,
}

impl AliasSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the alias was already present.
    pub fn insert(&mut self, alias: impl Into<String>) -> bool {
        let alias = alias.into();
        if self.contains(&alias) {
            return false;
        }
        self.values.push(alias);
        true
    }

    pub fn remove(&mut self, alias: &str) -> bool {
        let before = self.values.len();
        self.values.retain(|a| a != alias);
        before != self.values.len()
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.values.iter().any(|a| a == alias)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Longest alias; the first one wins on ties.
    pub fn longest(&self) -> Option<&str> {
        let mut best: Option<&str> = None;
        for alias in self.iter() {
            if best.is_none_or(|b| alias.len() > b.len()) {
                best = Some(alias);
            }
        }
        best
    }
}
