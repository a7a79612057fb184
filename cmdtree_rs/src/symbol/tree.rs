//! Arena holding every command, option and argument of one CLI definition.
//!
//! Nodes are addressed by [`SymbolId`] and link to their parent by id, so
//! ancestor walks for global-option resolution are plain index hops and no
//! ownership cycles exist.

use std::collections::HashMap;
use std::sync::Arc;

use super::alias::{AliasSet, check_alias};
use super::arity::Arity;
use super::spec::{ArgumentSpec, CommandSpec, OptionSpec};
use super::types::{
    ActionRef, ArgumentDef, CommandDef, OptionDef, Symbol, SymbolId, SymbolKind, SymbolMeta,
};
use crate::action::CliAction;
use crate::error::{Result, SymbolError};

#[derive(Debug, Clone)]
pub struct SymbolTree {
    nodes: Vec<Symbol>,
    root: SymbolId,
}

impl SymbolTree {
    /// Create a tree whose root command is `root`.
    ///
    /// The root is never matched against a token, so its name is not checked.
    pub fn new(root: CommandSpec) -> Self {
        let mut aliases = AliasSet::new();
        aliases.insert(root.name.clone());
        for alias in &root.aliases {
            aliases.insert(alias.clone());
        }
        let node = Symbol {
            meta: SymbolMeta {
                explicit_name: Some(root.name),
                aliases,
                description: root.description,
                hidden: root.hidden,
            },
            kind: SymbolKind::Command(CommandDef {
                commands: Vec::new(),
                options: Vec::new(),
                arguments: Vec::new(),
                treat_unmatched_tokens_as_errors: root.treat_unmatched_tokens_as_errors,
                action: root.action.map(ActionRef),
            }),
            parent: None,
        };
        Self {
            nodes: vec![node],
            root: SymbolId(0),
        }
    }

    pub fn root(&self) -> SymbolId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    pub fn add_command(&mut self, parent: SymbolId, spec: CommandSpec) -> Result<SymbolId> {
        self.command_def(parent)?;
        check_alias(&spec.name)?;
        let mut aliases = AliasSet::new();
        aliases.insert(spec.name.clone());
        for alias in &spec.aliases {
            check_alias(alias)?;
            aliases.insert(alias.clone());
        }

        let id = self.push(Symbol {
            meta: SymbolMeta {
                explicit_name: Some(spec.name),
                aliases,
                description: spec.description,
                hidden: spec.hidden,
            },
            kind: SymbolKind::Command(CommandDef {
                commands: Vec::new(),
                options: Vec::new(),
                arguments: Vec::new(),
                treat_unmatched_tokens_as_errors: spec.treat_unmatched_tokens_as_errors,
                action: spec.action.map(ActionRef),
            }),
            parent: Some(parent),
        });
        self.command_def_mut(parent)?.commands.push(id);
        Ok(id)
    }

    /// Add an option visible on `command` only.
    pub fn add_option(&mut self, command: SymbolId, spec: OptionSpec) -> Result<SymbolId> {
        self.insert_option(command, spec, false)
    }

    /// Add an option visible on `command` and every descendant command.
    pub fn add_global_option(&mut self, command: SymbolId, spec: OptionSpec) -> Result<SymbolId> {
        self.insert_option(command, spec, true)
    }

    /// Add a positional argument to `command`.
    pub fn add_argument(&mut self, command: SymbolId, spec: ArgumentSpec) -> Result<SymbolId> {
        self.command_def(command)?;
        let id = self.push_argument(command, spec, false);
        self.command_def_mut(command)?.arguments.push(id);
        Ok(id)
    }

    /// Attach an action to a command or option, replacing any previous one.
    pub fn set_action(&mut self, id: SymbolId, action: impl CliAction + 'static) -> Result<()> {
        let action = Some(ActionRef(Arc::new(action)));
        match &mut self.node_mut(id)?.kind {
            SymbolKind::Command(def) => def.action = action,
            SymbolKind::Option(def) => def.action = action,
            SymbolKind::Argument(_) => {
                return Err(SymbolError::WrongKind {
                    id,
                    expected: "command or option",
                });
            }
        }
        Ok(())
    }

    pub fn add_alias(&mut self, id: SymbolId, alias: impl Into<String>) -> Result<()> {
        let alias = alias.into();
        check_alias(&alias)?;
        let node = self.node_mut(id)?;
        if matches!(node.kind, SymbolKind::Argument(_)) {
            return Err(SymbolError::WrongKind {
                id,
                expected: "command or option",
            });
        }
        node.meta.aliases.insert(alias);
        Ok(())
    }

    /// Returns whether the alias was present. The name never changes here.
    pub fn remove_alias(&mut self, id: SymbolId, alias: &str) -> Result<bool> {
        Ok(self.node_mut(id)?.meta.aliases.remove(alias))
    }

    /// Set an explicit name.
    ///
    /// For commands the name doubles as an alias: the old name stops being
    /// one and the new name becomes one.
    pub fn set_name(&mut self, id: SymbolId, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        let node = self.node_mut(id)?;
        if let SymbolKind::Command(_) = node.kind {
            check_alias(&name)?;
            if let Some(old) = node.meta.explicit_name.take() {
                node.meta.aliases.remove(&old);
            }
            node.meta.aliases.insert(name.clone());
        }
        node.meta.explicit_name = Some(name);
        Ok(())
    }

    pub fn set_description(&mut self, id: SymbolId, text: impl Into<String>) -> Result<()> {
        self.node_mut(id)?.meta.description = Some(text.into());
        Ok(())
    }

    pub fn set_hidden(&mut self, id: SymbolId, hidden: bool) -> Result<()> {
        self.node_mut(id)?.meta.hidden = hidden;
        Ok(())
    }

    /// Check the tree for alias clashes among siblings.
    ///
    /// Subcommands and local options of one command must not share an alias.
    /// A global option may share an alias with a local option of the same
    /// command (the one registered last wins) or with anything declared on a
    /// descendant (the nearer declaration wins).
    pub fn validate(&self) -> Result<()> {
        for (index, node) in self.nodes.iter().enumerate() {
            let Some(def) = node.as_command() else {
                continue;
            };
            let mut seen: HashMap<&str, SymbolId> = HashMap::new();
            let locals = def
                .options
                .iter()
                .filter(|id| self.option(**id).is_some_and(|o| !o.is_global()));
            for id in def.commands.iter().chain(locals) {
                for alias in self.symbol(*id).aliases() {
                    if seen.insert(alias, *id).is_some() {
                        return Err(SymbolError::DuplicateAlias {
                            command: self.nodes[index].name().to_string(),
                            alias: alias.to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read accessors
    // ------------------------------------------------------------------

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.nodes.get(id.0)
    }

    /// # Panics
    ///
    /// Panics if `id` was issued by a different tree.
    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.nodes[id.0]
    }

    pub fn command(&self, id: SymbolId) -> Option<&CommandDef> {
        self.get(id).and_then(Symbol::as_command)
    }

    pub fn option(&self, id: SymbolId) -> Option<&OptionDef> {
        self.get(id).and_then(Symbol::as_option)
    }

    pub fn argument(&self, id: SymbolId) -> Option<&ArgumentDef> {
        self.get(id).and_then(Symbol::as_argument)
    }

    /// The value slot behind an option.
    pub fn option_argument(&self, option: SymbolId) -> Option<&ArgumentDef> {
        self.option(option).and_then(|o| self.argument(o.argument))
    }

    pub fn name(&self, id: SymbolId) -> &str {
        self.symbol(id).name()
    }

    pub fn aliases(&self, id: SymbolId) -> impl Iterator<Item = &str> {
        self.symbol(id).aliases()
    }

    pub fn parent(&self, id: SymbolId) -> Option<SymbolId> {
        self.get(id).and_then(Symbol::parent)
    }

    pub fn description(&self, id: SymbolId) -> Option<&str> {
        self.get(id).and_then(Symbol::description)
    }

    pub fn is_hidden(&self, id: SymbolId) -> bool {
        self.get(id).is_some_and(Symbol::is_hidden)
    }

    /// Parent chain of `id`, nearest first.
    pub fn ancestors(&self, id: SymbolId) -> Vec<SymbolId> {
        let mut chain = Vec::new();
        let mut cursor = self.parent(id);
        while let Some(current) = cursor {
            chain.push(current);
            cursor = self.parent(current);
        }
        chain
    }

    /// Subcommands, then options, then arguments of a command; the argument of
    /// an option; nothing for an argument.
    pub fn children(&self, id: SymbolId) -> Vec<SymbolId> {
        match self.get(id).map(Symbol::kind) {
            Some(SymbolKind::Command(def)) => def
                .commands
                .iter()
                .chain(&def.options)
                .chain(&def.arguments)
                .copied()
                .collect(),
            Some(SymbolKind::Option(def)) => vec![def.argument],
            _ => Vec::new(),
        }
    }

    /// Arity of an argument, or of an option's argument.
    pub fn arity(&self, id: SymbolId) -> Option<Arity> {
        match self.get(id).map(Symbol::kind) {
            Some(SymbolKind::Argument(def)) => Some(def.arity),
            Some(SymbolKind::Option(def)) => self.argument(def.argument).map(|a| a.arity),
            _ => None,
        }
    }

    pub fn is_required(&self, id: SymbolId) -> bool {
        self.option(id).is_some_and(OptionDef::is_required)
    }

    pub fn is_global(&self, id: SymbolId) -> bool {
        self.option(id).is_some_and(OptionDef::is_global)
    }

    /// Subcommand of `command` answering to `alias`.
    pub fn find_subcommand(&self, command: SymbolId, alias: &str) -> Option<SymbolId> {
        self.command(command)?
            .commands
            .iter()
            .copied()
            .find(|id| self.symbol(*id).has_alias(alias))
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn push(&mut self, node: Symbol) -> SymbolId {
        let id = SymbolId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    fn node_mut(&mut self, id: SymbolId) -> Result<&mut Symbol> {
        self.nodes
            .get_mut(id.0)
            .ok_or(SymbolError::UnknownSymbol(id))
    }

    fn command_def(&self, id: SymbolId) -> Result<&CommandDef> {
        self.get(id)
            .ok_or(SymbolError::UnknownSymbol(id))?
            .as_command()
            .ok_or(SymbolError::WrongKind {
                id,
                expected: "command",
            })
    }

    fn command_def_mut(&mut self, id: SymbolId) -> Result<&mut CommandDef> {
        match &mut self.node_mut(id)?.kind {
            SymbolKind::Command(def) => Ok(def),
            _ => Err(SymbolError::WrongKind {
                id,
                expected: "command",
            }),
        }
    }

    fn insert_option(
        &mut self,
        command: SymbolId,
        mut spec: OptionSpec,
        global: bool,
    ) -> Result<SymbolId> {
        self.command_def(command)?;
        if spec.aliases.is_empty() {
            return Err(SymbolError::NoAliases);
        }
        let mut aliases = AliasSet::new();
        for alias in &spec.aliases {
            check_alias(alias)?;
            aliases.insert(alias.clone());
        }

        let argument_spec = spec.take_argument();
        let option_id = SymbolId(self.nodes.len());
        // Placeholder argument id, patched right after the argument is pushed.
        let id = self.push(Symbol {
            meta: SymbolMeta {
                explicit_name: spec.name,
                aliases,
                description: spec.description,
                hidden: spec.hidden,
            },
            kind: SymbolKind::Option(OptionDef {
                argument: option_id,
                required: spec.required,
                allow_multiple_arguments_per_token: spec.allow_multiple_arguments_per_token,
                global,
                action: spec.action.map(ActionRef),
                validators: spec.validators,
            }),
            parent: Some(command),
        });
        let argument = self.push_argument(id, argument_spec, true);
        if let SymbolKind::Option(def) = &mut self.nodes[id.0].kind {
            def.argument = argument;
        }
        self.command_def_mut(command)?.options.push(id);
        Ok(id)
    }

    fn push_argument(&mut self, parent: SymbolId, spec: ArgumentSpec, for_option: bool) -> SymbolId {
        let arity = spec.resolved_arity(for_option);
        self.push(Symbol {
            meta: SymbolMeta {
                explicit_name: Some(spec.name),
                aliases: AliasSet::new(),
                description: spec.description,
                hidden: spec.hidden,
            },
            kind: SymbolKind::Argument(ArgumentDef {
                value_type: spec.value_type,
                arity,
                default: spec.default,
                validators: spec.validators,
            }),
            parent: Some(parent),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::ValueType;

    fn tree() -> SymbolTree {
        SymbolTree::new(CommandSpec::new("app"))
    }

    #[test]
    fn option_without_aliases_is_rejected() {
        let mut tree = tree();
        let root = tree.root();
        let empty: [&str; 0] = [];
        assert_eq!(
            tree.add_option(root, OptionSpec::new(empty)),
            Err(SymbolError::NoAliases)
        );
    }

    #[test]
    fn alias_with_whitespace_is_rejected() {
        let mut tree = tree();
        let root = tree.root();
        assert!(matches!(
            tree.add_option(root, OptionSpec::new(["--bad alias"])),
            Err(SymbolError::InvalidAlias(_))
        ));
        assert!(tree.add_command(root, CommandSpec::new("")).is_err());
    }

    #[test]
    fn option_name_comes_from_longest_alias() {
        let mut tree = tree();
        let root = tree.root();
        let opt = tree
            .add_option(root, OptionSpec::new(["-i", "--i-must-be-set"]))
            .unwrap();
        assert_eq!(tree.name(opt), "i-must-be-set");
        assert_eq!(tree.symbol(opt).display_name(), "--i-must-be-set");
    }

    #[test]
    fn option_defaults_to_bool_flag() {
        let mut tree = tree();
        let root = tree.root();
        let opt = tree.add_option(root, OptionSpec::new(["--flag"])).unwrap();
        let arg = tree.option_argument(opt).unwrap();
        assert!(arg.value_type().is_bool());
        assert_eq!(tree.arity(opt), Some(Arity::ZERO_OR_ONE));
        assert_eq!(tree.children(opt).len(), 1);
        assert_eq!(tree.parent(tree.children(opt)[0]), Some(opt));
    }

    #[test]
    fn explicit_name_survives_alias_changes() {
        let mut tree = tree();
        let root = tree.root();
        let opt = tree.add_option(root, OptionSpec::new(["-x"])).unwrap();
        tree.set_name(opt, "example").unwrap();
        tree.add_alias(opt, "--a-much-longer-alias").unwrap();
        assert_eq!(tree.name(opt), "example");
        assert!(tree.remove_alias(opt, "-x").unwrap());
        assert_eq!(tree.name(opt), "example");
    }

    #[test]
    fn removing_a_shorter_alias_keeps_derived_name() {
        let mut tree = tree();
        let root = tree.root();
        let opt = tree
            .add_option(root, OptionSpec::new(["-v", "--verbose"]))
            .unwrap();
        tree.remove_alias(opt, "-v").unwrap();
        assert_eq!(tree.name(opt), "verbose");
    }

    #[test]
    fn renamed_command_drops_old_name_alias() {
        let mut tree = tree();
        let root = tree.root();
        let cmd = tree.add_command(root, CommandSpec::new("original")).unwrap();
        tree.set_name(cmd, "changed").unwrap();
        assert_eq!(tree.name(cmd), "changed");
        assert!(!tree.symbol(cmd).has_alias("original"));
        assert!(tree.symbol(cmd).has_alias("changed"));
        assert_eq!(tree.find_subcommand(root, "changed"), Some(cmd));
    }

    #[test]
    fn presentation_accessors() {
        let mut tree = tree();
        let root = tree.root();
        let cmd = tree
            .add_command(root, CommandSpec::new("gc").description("Collect").hidden(true))
            .unwrap();
        assert_eq!(tree.description(cmd), Some("Collect"));
        assert!(tree.is_hidden(cmd));
        tree.set_hidden(cmd, false).unwrap();
        assert!(!tree.is_hidden(cmd));
        assert_eq!(tree.description(root), None);
    }

    #[test]
    fn ancestors_walk_to_root() {
        let mut tree = tree();
        let root = tree.root();
        let c = tree.add_command(root, CommandSpec::new("c")).unwrap();
        let d = tree.add_command(c, CommandSpec::new("d")).unwrap();
        assert_eq!(tree.ancestors(d), vec![c, root]);
        assert!(tree.ancestors(root).is_empty());
    }

    #[test]
    fn wrong_kind_is_reported() {
        let mut tree = tree();
        let root = tree.root();
        let opt = tree.add_option(root, OptionSpec::new(["--x"])).unwrap();
        assert!(matches!(
            tree.add_command(opt, CommandSpec::new("nope")),
            Err(SymbolError::WrongKind { .. })
        ));
        let arg = tree
            .add_argument(root, ArgumentSpec::new("file").value_type(ValueType::Path))
            .unwrap();
        assert!(tree.add_alias(arg, "--file").is_err());
    }

    #[test]
    fn validate_flags_duplicate_local_aliases() {
        let mut tree = tree();
        let root = tree.root();
        tree.add_option(root, OptionSpec::new(["-x"])).unwrap();
        tree.add_option(root, OptionSpec::new(["-x", "--other"]))
            .unwrap();
        assert!(matches!(
            tree.validate(),
            Err(SymbolError::DuplicateAlias { .. })
        ));
    }

    #[test]
    fn validate_allows_global_and_local_on_same_command() {
        let mut tree = tree();
        let root = tree.root();
        tree.add_option(root, OptionSpec::new(["--same"]).value_type(ValueType::String))
            .unwrap();
        tree.add_global_option(root, OptionSpec::new(["--same"]).value_type(ValueType::Int))
            .unwrap();
        let child = tree.add_command(root, CommandSpec::new("child")).unwrap();
        tree.add_option(child, OptionSpec::new(["--same"])).unwrap();
        assert!(tree.validate().is_ok());
    }
}
