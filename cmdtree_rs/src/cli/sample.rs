//! The sample tree `cmdtree parse` checks lines against.

use crate::convert::{Value, ValueType};
use crate::error::Result;
use crate::help::help_option;
use crate::symbol::{ArgumentSpec, Arity, CommandSpec, OptionSpec, SymbolTree};

/// ```text
/// app [--verbose]
///   build <target> [--jobs <n>] [--release] [--feature <name>...]
///   serve --port <n> [--host <addr>]
///   config
///     get <key>
///     set <key> <value>
/// ```
pub fn sample_tree() -> Result<SymbolTree> {
    let mut tree = SymbolTree::new(CommandSpec::new("app").description("Sample application"));
    let root = tree.root();
    tree.add_global_option(
        root,
        OptionSpec::new(["--verbose", "-v"]).description("Verbose output"),
    )?;
    tree.add_global_option(root, help_option())?;

    let build = tree.add_command(
        root,
        CommandSpec::new("build")
            .alias("b")
            .description("Build a target"),
    )?;
    tree.add_argument(
        build,
        ArgumentSpec::new("target").value_type(ValueType::String),
    )?;
    tree.add_option(
        build,
        OptionSpec::new(["--jobs", "-j"])
            .value_type(ValueType::UInt)
            .description("Parallel jobs"),
    )?;
    tree.add_option(
        build,
        OptionSpec::new(["--release", "-r"]).description("Optimized build"),
    )?;
    tree.add_option(
        build,
        OptionSpec::new(["--feature", "-F"])
            .argument(
                ArgumentSpec::new("name")
                    .value_type(ValueType::list(ValueType::String))
                    .arity(Arity::ONE_OR_MORE),
            )
            .description("Enable features"),
    )?;

    let serve = tree.add_command(root, CommandSpec::new("serve").description("Run a server"))?;
    tree.add_option(
        serve,
        OptionSpec::new(["--port", "-p"])
            .value_type(ValueType::UInt)
            .required(true)
            .validator(|input| match input.value.as_uint() {
                Some(port) if port == 0 || port > u64::from(u16::MAX) => {
                    Err(format!("Port {port} is out of range."))
                }
                _ => Ok(()),
            }),
    )?;
    tree.add_option(
        serve,
        OptionSpec::new(["--host"]).argument(
            ArgumentSpec::new("addr")
                .value_type(ValueType::String)
                .default_value(|| Value::from("127.0.0.1")),
        ),
    )?;

    let config = tree.add_command(root, CommandSpec::new("config").description("Edit settings"))?;
    let get = tree.add_command(config, CommandSpec::new("get"))?;
    tree.add_argument(get, ArgumentSpec::new("key"))?;
    let set = tree.add_command(config, CommandSpec::new("set"))?;
    tree.add_argument(set, ArgumentSpec::new("key"))?;
    tree.add_argument(set, ArgumentSpec::new("value"))?;

    tree.validate()?;
    Ok(tree)
}
