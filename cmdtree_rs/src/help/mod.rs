//! Help and version output.
//!
//! Both are ordinary actions attached to options, so they go through the same
//! selection rules as any other action: `tool build --help` shows help for
//! `build` because the help option is the last matched option with an action.

mod builder;

use std::sync::Arc;

use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use crate::action::CliAction;
use crate::parser::ParseResult;
use crate::symbol::OptionSpec;

pub use builder::{HelpBuilder, HelpOverride};

/// Prints help for the terminal command to stdout. Parse errors do not stop
/// it.
#[derive(Debug, Clone, Default)]
pub struct HelpAction {
    builder: Arc<HelpBuilder>,
}

impl HelpAction {
    pub fn new(builder: HelpBuilder) -> Self {
        Self {
            builder: Arc::new(builder),
        }
    }

    pub fn builder(&self) -> &HelpBuilder {
        &self.builder
    }
}

impl CliAction for HelpAction {
    fn invoke<'a>(
        &'a self,
        result: &'a ParseResult,
        _cancel: CancellationToken,
    ) -> BoxFuture<'a, anyhow::Result<i32>> {
        Box::pin(async move {
            print!(
                "{}",
                self.builder.render(result.tree(), result.terminal_command())
            );
            Ok(0)
        })
    }

    fn handles_parse_errors(&self) -> bool {
        true
    }
}

/// `-h`, `--help`, `-?` wired to a default [`HelpAction`].
pub fn help_option() -> OptionSpec {
    help_option_with(HelpBuilder::new())
}

pub fn help_option_with(builder: HelpBuilder) -> OptionSpec {
    OptionSpec::new(["--help", "-h", "-?"])
        .description("Show help and usage information")
        .action(HelpAction::new(builder))
}

/// Prints a version string to stdout, like help regardless of parse errors.
#[derive(Debug, Clone)]
pub struct VersionAction {
    version: String,
}

impl VersionAction {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }
}

impl CliAction for VersionAction {
    fn invoke<'a>(
        &'a self,
        _result: &'a ParseResult,
        _cancel: CancellationToken,
    ) -> BoxFuture<'a, anyhow::Result<i32>> {
        Box::pin(async move {
            println!("{}", self.version);
            Ok(0)
        })
    }

    fn handles_parse_errors(&self) -> bool {
        true
    }
}

/// `--version` printing `version`.
pub fn version_option(version: impl Into<String>) -> OptionSpec {
    OptionSpec::new(["--version"])
        .description("Show version information")
        .action(VersionAction::new(version))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use crate::symbol::{CommandSpec, SymbolTree};

    fn tree_with_help() -> SymbolTree {
        let mut tree = SymbolTree::new(CommandSpec::new("tool"));
        let root = tree.root();
        tree.add_global_option(root, help_option()).unwrap();
        tree.add_option(root, version_option("1.2.3")).unwrap();
        tree.add_command(root, CommandSpec::new("build")).unwrap();
        tree
    }

    #[test]
    fn help_is_selected_from_any_depth() {
        let parser = Parser::new(tree_with_help());
        let result = parser.parse("build -h");
        let owner = result.action_owner().unwrap();
        assert!(result.tree().symbol(owner).has_alias("--help"));
        assert_eq!(result.invoke(), 0);
    }

    #[test]
    fn help_runs_despite_parse_errors() {
        let parser = Parser::new(tree_with_help());
        let result = parser.parse("bogus --help");
        assert!(result.has_errors());
        assert!(result.action().unwrap().handles_parse_errors());
        assert_eq!(result.invoke(), 0);
    }

    #[test]
    fn version_option_selects_version_action() {
        let parser = Parser::new(tree_with_help());
        let result = parser.parse("--version");
        let owner = result.action_owner().unwrap();
        assert!(result.tree().symbol(owner).has_alias("--version"));
        assert_eq!(result.invoke(), 0);
    }
}
