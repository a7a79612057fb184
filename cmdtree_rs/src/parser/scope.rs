//! Option visibility at a given command.
//!
//! Visible options are the command's own options plus every global option
//! declared on the command or one of its ancestors. Aliases are resolved
//! outermost first, so later registrations overwrite earlier ones:
//!
//! - a nearer ancestor's global beats a farther one's
//! - the command's own options beat any inherited global for the exact
//!   aliases they declare; other aliases of the global stay active
//! - on one command the option registered last wins

use std::collections::HashMap;

use crate::symbol::{SymbolId, SymbolTree};

#[derive(Debug, Clone, Default)]
pub struct OptionScope {
    by_alias: HashMap<String, SymbolId>,
    order: Vec<SymbolId>,
}

impl OptionScope {
    pub fn at(tree: &SymbolTree, command: SymbolId) -> Self {
        let mut scope = Self::default();

        let mut chain = tree.ancestors(command);
        chain.reverse();
        for ancestor in chain {
            let Some(def) = tree.command(ancestor) else {
                continue;
            };
            for option in def.options() {
                if tree.is_global(*option) {
                    scope.register(tree, *option);
                }
            }
        }

        if let Some(def) = tree.command(command) {
            for option in def.options() {
                scope.register(tree, *option);
            }
        }

        scope
    }

    fn register(&mut self, tree: &SymbolTree, option: SymbolId) {
        for alias in tree.aliases(option) {
            self.by_alias.insert(alias.to_string(), option);
        }
        if !self.order.contains(&option) {
            self.order.push(option);
        }
    }

    pub fn resolve(&self, alias: &str) -> Option<SymbolId> {
        self.by_alias.get(alias).copied()
    }

    /// Options reachable through at least one alias, in registration order.
    pub fn options(&self) -> Vec<SymbolId> {
        self.order
            .iter()
            .copied()
            .filter(|id| self.by_alias.values().any(|v| v == id))
            .collect()
    }

    /// Aliases that currently resolve to `option`.
    pub fn aliases_of(&self, option: SymbolId) -> Vec<&str> {
        let mut aliases: Vec<&str> = self
            .by_alias
            .iter()
            .filter(|(_, id)| **id == option)
            .map(|(alias, _)| alias.as_str())
            .collect();
        aliases.sort_unstable();
        aliases
    }

    /// Alias and the option it resolves to.
    pub fn entries(&self) -> impl Iterator<Item = (&str, SymbolId)> {
        self.by_alias.iter().map(|(alias, id)| (alias.as_str(), *id))
    }
}
