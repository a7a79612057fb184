//! Entry point of the `cmdtree` binary.
//!
//! The binary is itself declared as a symbol tree and parsed by the engine:
//!
//! ```text
//! cmdtree [--json] [--verbose] [--help] [--version]
//!   split <line>...   print the tokens of a raw line
//!   parse <line>...   parse a line against the sample tree
//! ```
//!
//! The values after `split` / `parse` are joined with spaces into one raw
//! line, so `cmdtree parse build --jobs 4` and `cmdtree parse "build --jobs 4"`
//! are the same. Use `--` to pass front-end aliases such as `-v` through.

use anyhow::Result;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use super::sample::sample_tree;
use crate::action::SyncAction;
use crate::convert::ValueType;
use crate::help::{HelpBuilder, help_option, version_option};
use crate::parser::{ParseResult, Parser};
use crate::symbol::{ArgumentSpec, Arity, CommandSpec, OptionSpec, SymbolId, SymbolTree};
use crate::tokenizer;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "CMDTREE_LOG";

/// Build the front-end tree.
pub fn front_end() -> Result<SymbolTree> {
    let mut tree = SymbolTree::new(
        CommandSpec::new("cmdtree")
            .description("Split and parse command lines")
            .action(SyncAction::new(|result| {
                print!(
                    "{}",
                    HelpBuilder::new().render(result.tree(), result.terminal_command())
                );
                Ok(0)
            })),
    );
    let root = tree.root();
    let json = tree.add_global_option(
        root,
        OptionSpec::new(["--json"]).description("Print machine-readable JSON"),
    )?;
    tree.add_global_option(
        root,
        OptionSpec::new(["--verbose", "-v"]).description("Log parse decisions to stderr"),
    )?;
    tree.add_global_option(root, help_option())?;
    tree.add_option(root, version_option(env!("CARGO_PKG_VERSION")))?;

    let split = tree.add_command(
        root,
        CommandSpec::new("split")
            .alias("s")
            .description("Print the tokens of a raw command line")
            .treat_unmatched_tokens_as_errors(false),
    )?;
    let split_line = tree.add_argument(split, line_argument())?;
    tree.set_action(
        split,
        SyncAction::new(move |result| {
            let line = collect_line(result, split_line);
            print_tokens(&tokenizer::split(&line), is_set(result, json))?;
            Ok(0)
        }),
    )?;

    let parse = tree.add_command(
        root,
        CommandSpec::new("parse")
            .description("Parse a command line against the sample tree")
            .treat_unmatched_tokens_as_errors(false),
    )?;
    let parse_line = tree.add_argument(parse, line_argument())?;
    tree.set_action(
        parse,
        SyncAction::new(move |result| {
            let line = collect_line(result, parse_line);
            let sample = Parser::new(sample_tree()?);
            let parsed = sample.parse(&line);
            print_parse(&parsed, is_set(result, json))?;
            Ok(if parsed.has_errors() { 1 } else { 0 })
        }),
    )?;

    tree.validate()?;
    Ok(tree)
}

fn line_argument() -> ArgumentSpec {
    ArgumentSpec::new("line")
        .value_type(ValueType::list(ValueType::String))
        .arity(Arity::ZERO_OR_MORE)
        .description("Command line text")
}

fn is_set(result: &ParseResult, option: SymbolId) -> bool {
    result
        .value_of(option)
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
}

/// Re-join the line: positional values plus tokens the front-end left
/// unmatched, in their original order, separated by single spaces.
fn collect_line(result: &ParseResult, line: SymbolId) -> String {
    let mut parts: Vec<(usize, &str)> = result
        .argument_result(line)
        .map(|r| {
            r.positions()
                .iter()
                .copied()
                .zip(r.raw_values().iter().map(String::as_str))
                .collect()
        })
        .unwrap_or_default();
    parts.extend(
        result
            .unmatched_tokens()
            .iter()
            .map(|t| (t.position, t.value.as_str())),
    );
    parts.sort_by_key(|(position, _)| *position);
    parts
        .into_iter()
        .map(|(_, text)| text)
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_tokens(tokens: &[String], as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(tokens)?);
    } else {
        for token in tokens {
            println!("{token}");
        }
    }
    Ok(())
}

fn print_parse(result: &ParseResult, as_json: bool) -> Result<()> {
    let tree = result.tree();
    let path: Vec<&str> = result
        .command_results()
        .iter()
        .map(|c| tree.name(c.command()))
        .collect();

    if as_json {
        let options: Vec<_> = result
            .option_results()
            .iter()
            .map(|o| {
                json!({
                    "option": tree.symbol(o.option()).display_name(),
                    "value": result.value_of(o.option()),
                })
            })
            .collect();
        let arguments: Vec<_> = result
            .command_results()
            .iter()
            .flat_map(|c| c.arguments())
            .map(|a| {
                json!({
                    "argument": tree.name(a.argument()),
                    "value": result.value_of(a.argument()),
                })
            })
            .collect();
        let report = json!({
            "commands": path,
            "options": options,
            "arguments": arguments,
            "tokens": result.tokens(),
            "unmatched": result.unmatched_tokens(),
            "errors": result.errors(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("command: {}", path.join(" "));
    for option in result.option_results() {
        let value = result
            .value_of(option.option())
            .map(|v| v.to_string())
            .unwrap_or_else(|| "<invalid>".to_string());
        println!(
            "option {}: {value}",
            tree.symbol(option.option()).display_name()
        );
    }
    for command in result.command_results() {
        for argument in command.arguments() {
            let value = result
                .value_of(argument.argument())
                .map(|v| v.to_string())
                .unwrap_or_else(|| "<invalid>".to_string());
            println!("argument {}: {value}", tree.name(argument.argument()));
        }
    }
    for token in result.unmatched_tokens() {
        println!("unmatched: {}", token.value);
    }
    for error in result.errors() {
        println!("error: {error}");
    }
    Ok(())
}

/// Low byte of an action's exit code, the way the platform truncates it
/// (`256` becomes `0`, `-1` becomes `255`).
pub fn exit_status(code: i32) -> u8 {
    (code & 0xff) as u8
}

/// Install the stderr subscriber. `CMDTREE_LOG` wins; otherwise `debug`
/// with `--verbose` and `warn` without.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Parse `args` with the front-end tree and run the selected action.
///
/// Ctrl-C cancels the token handed to the action.
pub async fn run(args: Vec<String>) -> Result<i32> {
    let parser = Parser::new(front_end()?);

    // Look for --verbose before the full parse so the parse itself is logged.
    let verbose = args
        .iter()
        .take_while(|a| a.as_str() != "--")
        .any(|a| a == "--verbose" || a == "-v");
    init_tracing(verbose);

    let result = parser.parse_args(&args);
    debug!(
        terminal = result.tree().name(result.terminal_command()),
        "front-end parsed"
    );

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        on_signal.cancel();
    });

    Ok(result.invoke_async(cancel).await)
}
