//! Parser behavior seen through the public API.

use cmdtree::parser::{ParseErrorKind, TokenKind};
use cmdtree::{
    ArgumentSpec, Arity, CommandSpec, OptionSpec, Parser, ParserConfig, SymbolId, SymbolTree,
    SyncAction, Value, ValueType,
};

fn string_option(aliases: &[&str]) -> OptionSpec {
    OptionSpec::new(aliases.iter().copied()).value_type(ValueType::String)
}

// ============================================
// Global option visibility
// ============================================

mod globals {
    use super::*;

    struct Rcd {
        parser: Parser,
        c: SymbolId,
        d: SymbolId,
        g: SymbolId,
    }

    fn rcd() -> Rcd {
        let mut tree = SymbolTree::new(CommandSpec::new("R"));
        let r = tree.root();
        let c = tree.add_command(r, CommandSpec::new("C")).unwrap();
        let d = tree.add_command(c, CommandSpec::new("D")).unwrap();
        let g = tree.add_global_option(c, string_option(&["--g"])).unwrap();
        Rcd {
            parser: Parser::new(tree),
            c,
            d,
            g,
        }
    }

    #[test]
    fn same_option_instance_from_every_parse_root() {
        let Rcd { parser, c, d, g } = rcd();

        let from_r = parser.parse("C D --g 1");
        let from_c = parser.parse_from(c, &["D", "--g", "1"]);
        let from_d = parser.parse_from(d, &["--g", "1"]);

        for result in [&from_r, &from_c, &from_d] {
            assert!(result.errors().is_empty(), "{:?}", result.errors());
            assert_eq!(result.terminal_command(), d);
            assert_eq!(result.value_of(g), Some(Value::from("1")));
        }
    }

    #[test]
    fn global_is_not_visible_above_its_command() {
        let Rcd { parser, g, .. } = rcd();
        let result = parser.parse("--g 1");
        assert!(!result.is_matched(g));
        let unrecognized = result
            .errors()
            .iter()
            .filter(|e| e.kind == ParseErrorKind::UnrecognizedToken)
            .count();
        assert_eq!(unrecognized, 2);
        assert_eq!(result.unmatched_tokens().len(), 2);
    }

    #[test]
    fn global_matched_on_ancestor_stays_attached_to_that_command() {
        let Rcd { parser, c, g, .. } = rcd();
        let result = parser.parse("C --g 1 D");
        let option = result.option_result(g).unwrap();
        assert_eq!(option.command(), c);
        assert_eq!(result.command_results()[1].options(), &[g]);
    }
}

// ============================================
// Alias precedence
// ============================================

mod precedence {
    use super::*;

    #[test]
    fn local_option_overrides_global_alias() {
        let mut tree = SymbolTree::new(CommandSpec::new("R"));
        let r = tree.root();
        let global = tree.add_global_option(r, string_option(&["-x"])).unwrap();
        let c = tree.add_command(r, CommandSpec::new("C")).unwrap();
        let local = tree.add_option(c, string_option(&["-x"])).unwrap();
        let parser = Parser::new(tree);

        let result = parser.parse("-x a");
        assert_eq!(result.value_of(global), Some(Value::from("a")));
        assert!(!result.is_matched(local));

        let result = parser.parse("C -x b");
        assert_eq!(result.value_of(local), Some(Value::from("b")));
        assert!(!result.is_matched(global));

        let result = parser.parse("-x a C -x b");
        assert!(result.errors().is_empty());
        assert_eq!(result.value_of(global), Some(Value::from("a")));
        assert_eq!(result.value_of(local), Some(Value::from("b")));
    }

    #[test]
    fn other_aliases_of_an_overridden_global_still_resolve() {
        let mut tree = SymbolTree::new(CommandSpec::new("R"));
        let r = tree.root();
        let global = tree
            .add_global_option(r, string_option(&["--dupe", "-d"]))
            .unwrap();
        let c = tree.add_command(r, CommandSpec::new("C")).unwrap();
        let local = tree.add_option(c, string_option(&["--dupe"])).unwrap();
        let parser = Parser::new(tree);

        let result = parser.parse("C --dupe one -d two");
        assert_eq!(result.value_of(local), Some(Value::from("one")));
        assert_eq!(result.value_of(global), Some(Value::from("two")));
    }

    #[test]
    fn redeclaring_on_the_same_command_is_allowed() {
        let mut tree = SymbolTree::new(CommandSpec::new("R"));
        let r = tree.root();
        tree.add_global_option(r, string_option(&["--same"]))
            .unwrap();
        let second = tree.add_option(r, string_option(&["--same"])).unwrap();
        assert!(tree.validate().is_ok());

        let result = Parser::new(tree).parse("--same v");
        assert_eq!(result.value_of(second), Some(Value::from("v")));
    }
}

// ============================================
// Validation
// ============================================

mod validation {
    use super::*;

    #[test]
    fn required_option_message_uses_longest_alias() {
        let mut tree = SymbolTree::new(CommandSpec::new("R"));
        let r = tree.root();
        tree.add_option(
            r,
            string_option(&["-i", "--i-must-be-set"]).required(true),
        )
        .unwrap();

        let result = Parser::new(tree).parse("");
        assert_eq!(result.errors().len(), 1);
        let error = &result.errors()[0];
        assert_eq!(error.kind, ParseErrorKind::MissingRequiredOption);
        assert_eq!(error.message, "Option '--i-must-be-set' is required.");
    }

    #[test]
    fn required_option_with_default_is_satisfied() {
        let mut tree = SymbolTree::new(CommandSpec::new("R"));
        let r = tree.root();
        let option = tree
            .add_option(
                r,
                OptionSpec::new(["--level"])
                    .argument(
                        ArgumentSpec::new("level")
                            .value_type(ValueType::Int)
                            .default_value(|| Value::Int(3)),
                    )
                    .required(true),
            )
            .unwrap();

        let result = Parser::new(tree).parse("");
        assert!(result.errors().is_empty());
        assert_eq!(result.value_of(option), Some(Value::Int(3)));
    }

    #[test]
    fn required_global_is_checked_at_the_terminal_command() {
        let mut tree = SymbolTree::new(CommandSpec::new("R"));
        let r = tree.root();
        tree.add_global_option(r, string_option(&["--token"]).required(true))
            .unwrap();
        tree.add_command(r, CommandSpec::new("C")).unwrap();
        let parser = Parser::new(tree);

        assert_eq!(parser.parse("C").errors().len(), 1);
        assert!(parser.parse("--token t C").errors().is_empty());
        assert!(parser.parse("C --token t").errors().is_empty());
    }

    #[test]
    fn errors_accumulate() {
        let mut tree = SymbolTree::new(CommandSpec::new("R"));
        let r = tree.root();
        tree.add_option(r, OptionSpec::new(["--count"]).value_type(ValueType::Int))
            .unwrap();
        tree.add_option(r, string_option(&["--name"]).required(true))
            .unwrap();

        let result = Parser::new(tree).parse("--count many stray");
        let kinds: Vec<ParseErrorKind> = result.errors().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ParseErrorKind::UnrecognizedToken,
                ParseErrorKind::ConversionFailure,
                ParseErrorKind::MissingRequiredOption,
            ]
        );
    }

    #[test]
    fn conversion_failure_message_has_no_inner_detail() {
        let mut tree = SymbolTree::new(CommandSpec::new("R"));
        let r = tree.root();
        let option = tree
            .add_option(r, OptionSpec::new(["--port", "-p"]).value_type(ValueType::UInt))
            .unwrap();

        let result = Parser::new(tree).parse("-p eighty");
        assert_eq!(result.errors().len(), 1);
        assert_eq!(
            result.errors()[0].message,
            "Cannot parse argument 'eighty' for option '--port' as expected type 'unsigned integer'."
        );
        assert_eq!(result.errors()[0].position, Some(1));
        assert_eq!(result.value_of(option), None);
        assert!(result.option_result(option).unwrap().argument().conversion_error().is_some());
    }

    #[test]
    fn arity_violation_for_repeated_single_value_option() {
        let mut tree = SymbolTree::new(CommandSpec::new("R"));
        let r = tree.root();
        tree.add_option(r, string_option(&["-x"])).unwrap();

        let result = Parser::new(tree).parse("-x a -x b");
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].kind, ParseErrorKind::ArityViolation);
        assert_eq!(
            result.errors()[0].message,
            "Option '-x' expects a single argument but 2 were provided."
        );
    }

    #[test]
    fn missing_option_value_is_an_arity_violation() {
        let mut tree = SymbolTree::new(CommandSpec::new("R"));
        let r = tree.root();
        tree.add_option(r, string_option(&["--out", "-o"])).unwrap();

        let result = Parser::new(tree).parse("--out");
        assert_eq!(result.errors().len(), 1);
        assert_eq!(
            result.errors()[0].message,
            "Required argument missing for option: '--out'."
        );
    }

    #[test]
    fn missing_positional_reports_the_command() {
        let mut tree = SymbolTree::new(CommandSpec::new("R"));
        let r = tree.root();
        let c = tree.add_command(r, CommandSpec::new("copy")).unwrap();
        tree.add_argument(c, ArgumentSpec::new("source")).unwrap();

        let result = Parser::new(tree).parse("copy");
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].kind, ParseErrorKind::ArityViolation);
        assert_eq!(
            result.errors()[0].message,
            "Required argument missing for command: 'copy'."
        );
    }

    #[test]
    fn validators_all_run() {
        let mut tree = SymbolTree::new(CommandSpec::new("R"));
        let r = tree.root();
        tree.add_option(
            r,
            OptionSpec::new(["--size"])
                .value_type(ValueType::Int)
                .validator(|input| match input.value.as_int() {
                    Some(n) if n < 0 => Err(format!("{} must not be negative.", input.display_name)),
                    _ => Ok(()),
                })
                .validator(|input| match input.value.as_int() {
                    Some(n) if n % 2 != 0 => Err("Size must be even.".to_string()),
                    _ => Ok(()),
                }),
        )
        .unwrap();

        let result = Parser::new(tree).parse("--size -3");
        let messages: Vec<&str> = result.errors().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["--size must not be negative.", "Size must be even."]
        );
        assert!(
            result
                .errors()
                .iter()
                .all(|e| e.kind == ParseErrorKind::ValidationFailure)
        );
    }

    #[test]
    fn group_command_without_action_needs_a_subcommand() {
        let mut tree = SymbolTree::new(CommandSpec::new("R"));
        let r = tree.root();
        let config = tree.add_command(r, CommandSpec::new("config")).unwrap();
        tree.add_command(config, CommandSpec::new("get")).unwrap();
        let parser = Parser::new(tree);

        let result = parser.parse("config");
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].kind, ParseErrorKind::MissingRequiredCommand);
        assert_eq!(result.errors()[0].message, "Required command was not provided.");
        assert!(parser.parse("config get").errors().is_empty());
    }
}

// ============================================
// Token matching
// ============================================

mod matching {
    use super::*;

    #[test]
    fn double_dash_makes_everything_positional() {
        let mut tree = SymbolTree::new(CommandSpec::new("R"));
        let r = tree.root();
        let verbose = tree.add_option(r, OptionSpec::new(["--verbose"])).unwrap();
        let rest = tree
            .add_argument(
                r,
                ArgumentSpec::new("rest").value_type(ValueType::list(ValueType::String)),
            )
            .unwrap();

        let result = Parser::new(tree).parse("a -- --verbose b");
        assert!(result.errors().is_empty());
        assert!(!result.is_matched(verbose));
        assert_eq!(
            result.argument_result(rest).unwrap().raw_values(),
            &["a", "--verbose", "b"]
        );
        let kinds: Vec<TokenKind> = result.tokens().iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Argument,
                TokenKind::DoubleDash,
                TokenKind::Argument,
                TokenKind::Argument,
            ]
        );
    }

    #[test]
    fn option_values_stop_at_recognized_aliases() {
        let mut tree = SymbolTree::new(CommandSpec::new("R"));
        let r = tree.root();
        let files = tree
            .add_option(
                r,
                OptionSpec::new(["--files", "-f"]).value_type(ValueType::list(ValueType::String)),
            )
            .unwrap();
        let verbose = tree.add_option(r, OptionSpec::new(["-v"])).unwrap();

        let result = Parser::new(tree).parse("-f a b -v");
        assert!(result.errors().is_empty());
        assert_eq!(
            result.value_of(files),
            Some(Value::List(vec![Value::from("a"), Value::from("b")]))
        );
        assert_eq!(result.value_of(verbose), Some(Value::Bool(true)));
    }

    #[test]
    fn one_value_per_token_when_multiple_arguments_are_disallowed() {
        let mut tree = SymbolTree::new(CommandSpec::new("R"));
        let r = tree.root();
        let tags = tree
            .add_option(
                r,
                OptionSpec::new(["--tag", "-t"])
                    .value_type(ValueType::list(ValueType::String))
                    .allow_multiple_arguments_per_token(false),
            )
            .unwrap();
        tree.add_argument(
            r,
            ArgumentSpec::new("rest").value_type(ValueType::list(ValueType::String)),
        )
        .unwrap();

        let result = Parser::new(tree).parse("-t a b -t c");
        assert!(result.errors().is_empty());
        assert_eq!(
            result.option_result(tags).unwrap().argument().raw_values(),
            &["a", "c"]
        );
        assert_eq!(result.option_result(tags).unwrap().tokens().len(), 2);
    }

    #[test]
    fn inline_values() {
        let mut tree = SymbolTree::new(CommandSpec::new("R"));
        let r = tree.root();
        let name = tree.add_option(r, string_option(&["--name"])).unwrap();
        let ids = tree
            .add_option(
                r,
                OptionSpec::new(["--ids"]).value_type(ValueType::list(ValueType::Int)),
            )
            .unwrap();

        let result = Parser::new(tree).parse("--name=x --ids:1,2,3");
        assert!(result.errors().is_empty(), "{:?}", result.errors());
        assert_eq!(result.value_of(name), Some(Value::from("x")));
        assert_eq!(
            result.value_of(ids),
            Some(Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)]))
        );
    }

    #[test]
    fn bool_option_takes_only_bool_literals() {
        let mut tree = SymbolTree::new(CommandSpec::new("R"));
        let r = tree.root();
        let flag = tree.add_option(r, OptionSpec::new(["--flag"])).unwrap();
        let target = tree.add_argument(r, ArgumentSpec::new("target")).unwrap();
        let parser = Parser::new(tree);

        let result = parser.parse("--flag false");
        assert_eq!(result.value_of(flag), Some(Value::Bool(false)));

        let result = parser.parse("--flag out");
        assert!(result.errors().is_empty());
        assert_eq!(result.value_of(flag), Some(Value::Bool(true)));
        assert_eq!(result.value_of(target), Some(Value::from("out")));

        let result = parser.parse("out");
        assert_eq!(result.value_of(flag), Some(Value::Bool(false)));
    }

    #[test]
    fn positional_slots_fill_in_order() {
        let mut tree = SymbolTree::new(CommandSpec::new("R"));
        let r = tree.root();
        let from = tree.add_argument(r, ArgumentSpec::new("from")).unwrap();
        let to = tree
            .add_argument(
                r,
                ArgumentSpec::new("to")
                    .value_type(ValueType::list(ValueType::Path))
                    .arity(Arity::new(1, 2)),
            )
            .unwrap();

        let result = Parser::new(tree).parse("a b c d");
        assert_eq!(result.value_of(from), Some(Value::from("a")));
        assert_eq!(result.argument_result(to).unwrap().raw_values(), &["b", "c"]);
        assert_eq!(result.unmatched_tokens().len(), 1);
        assert_eq!(result.unmatched_tokens()[0].value, "d");
        assert_eq!(result.errors().len(), 1);
    }

    #[test]
    fn lenient_command_keeps_unmatched_tokens_quietly() {
        let mut tree = SymbolTree::new(
            CommandSpec::new("R").treat_unmatched_tokens_as_errors(false),
        );
        tree.set_action(tree.root(), SyncAction::new(|result| {
            Ok(result.unmatched_tokens().len() as i32)
        }))
        .unwrap();

        let parser = Parser::new(tree);
        let result = parser.parse("one --two");
        assert!(result.errors().is_empty());
        assert_eq!(result.invoke(), 2);
    }

    #[test]
    fn unrecognized_tokens_get_suggestions() {
        let mut tree = SymbolTree::new(CommandSpec::new("R"));
        let r = tree.root();
        tree.add_command(r, CommandSpec::new("status")).unwrap();
        tree.add_option(r, OptionSpec::new(["--verbose"])).unwrap();

        let parser = Parser::new(tree.clone());
        let result = parser.parse("staus");
        assert_eq!(result.errors()[0].suggestion.as_deref(), Some("status"));
        assert_eq!(
            result.errors()[0].to_string(),
            "Unrecognized command or argument 'staus'. Did you mean 'status'?"
        );

        let quiet = Parser::with_config(tree, ParserConfig::default().with_suggestions(false));
        assert_eq!(quiet.parse("--verbos").errors()[0].suggestion, None);
    }

    #[test]
    fn hidden_symbols_are_never_suggested() {
        let mut tree = SymbolTree::new(CommandSpec::new("R"));
        let r = tree.root();
        tree.add_command(r, CommandSpec::new("secret").hidden(true))
            .unwrap();
        tree.add_option(r, OptionSpec::new(["--internal"]).hidden(true))
            .unwrap();
        tree.add_option(r, OptionSpec::new(["--interval"])).unwrap();
        let parser = Parser::new(tree);

        assert_eq!(parser.parse("secrt").errors()[0].suggestion, None);
        assert_eq!(
            parser.parse("--internl").errors()[0].suggestion.as_deref(),
            Some("--interval")
        );
        assert!(parser.parse("secret").errors().is_empty());
    }

    #[test]
    fn malformed_input_never_panics() {
        let mut tree = SymbolTree::new(CommandSpec::new("R"));
        let r = tree.root();
        tree.add_option(r, string_option(&["-x"])).unwrap();
        let parser = Parser::new(tree);
        for line in ["", "--", "-x", "-x=", "=", "--=x", "\"", "-x -x -x", "-- -- --"] {
            let _ = parser.parse(line);
        }
    }
}

// ============================================
// Action selection
// ============================================

mod selection {
    use super::*;

    #[test]
    fn last_matched_option_action_wins() {
        let mut tree = SymbolTree::new(CommandSpec::new("R"));
        let r = tree.root();
        let one = tree
            .add_option(r, OptionSpec::new(["--1"]).action(SyncAction::new(|_| Ok(1))))
            .unwrap();
        let two = tree
            .add_option(r, OptionSpec::new(["--2"]).action(SyncAction::new(|_| Ok(2))))
            .unwrap();
        let three = tree
            .add_option(r, OptionSpec::new(["--3"]).action(SyncAction::new(|_| Ok(3))))
            .unwrap();

        let result = Parser::new(tree).parse("--1 true --3 false --2 true");
        assert!(result.errors().is_empty());
        assert_eq!(result.action_owner(), Some(two));
        assert_ne!(result.action_owner(), Some(one));
        assert_ne!(result.action_owner(), Some(three));
        assert_eq!(result.invoke(), 2);
    }

    #[test]
    fn terminal_command_action_when_no_option_action() {
        let mut tree = SymbolTree::new(CommandSpec::new("R").action(SyncAction::new(|_| Ok(10))));
        let r = tree.root();
        let c = tree
            .add_command(r, CommandSpec::new("C").action(SyncAction::new(|_| Ok(20))))
            .unwrap();
        let parser = Parser::new(tree);

        assert_eq!(parser.parse("").action_owner(), Some(r));
        assert_eq!(parser.parse("C").action_owner(), Some(c));
        assert_eq!(parser.invoke("C"), 20);
    }

    #[test]
    fn no_action_selected() {
        let tree = SymbolTree::new(CommandSpec::new("R"));
        let result = Parser::new(tree).parse("");
        assert!(result.action().is_none());
        assert_eq!(result.invoke(), 0);
    }
}

// ============================================
// Tree edits between parses
// ============================================

mod edits {
    use super::*;

    #[test]
    fn results_survive_tree_edits() {
        let mut tree = SymbolTree::new(CommandSpec::new("R"));
        let r = tree.root();
        let option = tree.add_option(r, string_option(&["--old"])).unwrap();
        let mut parser = Parser::new(tree);

        let before = parser.parse("--old v");
        parser.tree_mut().add_alias(option, "--new").unwrap();
        let after = parser.parse("--new w");

        assert_eq!(before.value_of(option), Some(Value::from("v")));
        assert!(!before.tree().symbol(option).has_alias("--new"));
        assert_eq!(after.value_of(option), Some(Value::from("w")));
    }

    #[test]
    fn renamed_command_no_longer_matches_old_name() {
        let mut tree = SymbolTree::new(CommandSpec::new("R"));
        let r = tree.root();
        let c = tree.add_command(r, CommandSpec::new("old")).unwrap();
        tree.set_name(c, "new").unwrap();
        let parser = Parser::new(tree);

        assert_eq!(parser.parse("new").terminal_command(), c);
        assert_eq!(parser.parse("old").terminal_command(), r);
    }

    #[test]
    fn custom_parse_error_exit_code() {
        let tree = SymbolTree::new(CommandSpec::new("R"));
        let parser = Parser::with_config(tree, ParserConfig::default().with_parse_error_exit_code(64));
        assert_eq!(parser.invoke("unknown"), 64);
    }
}
