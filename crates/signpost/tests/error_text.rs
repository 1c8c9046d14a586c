//! Diagnostic text contract: the default formats are reproducible
//! byte-for-byte, and the message/handler override chain is honored in
//! order (node handler/message before dispatcher default before built-in).

use insta::assert_snapshot;
use signpost::{ArgsErrorContext, Dispatcher, PathErrorContext};

fn sample() -> Dispatcher {
    let mut dispatcher = Dispatcher::new();
    dispatcher
        .add_command(&["bar", "baz", "foo"], |_x: i32| {})
        .unwrap();
    dispatcher
        .add_command(&["test"], |_x: i32, _y: i32| {})
        .unwrap();
    dispatcher
}

#[test]
fn test_snapshot_unknown_command_with_close_match() {
    let mut dispatcher = sample();
    let err = dispatcher.dispatch(&["prog", "bar", "bz"]).unwrap_err();

    assert_snapshot!(err.to_string(), @r###"
Unknown command: prog bar "bz"
Closest match:
	baz
"###);
}

#[test]
fn test_snapshot_unknown_command_exhausted_tokens() {
    let mut dispatcher = sample();
    let err = dispatcher.dispatch(&["prog", "bar", "baz"]).unwrap_err();

    assert_snapshot!(err.to_string(), @r###"
Unknown command: prog bar baz ""
Possible commands:
	foo
"###);
}

#[test]
fn test_snapshot_invalid_arguments() {
    let mut dispatcher = sample();
    dispatcher.set_arg_name(&["test"], 0, "count").unwrap();
    let err = dispatcher
        .dispatch(&["prog", "test", "10", "abc"])
        .unwrap_err();

    assert_snapshot!(err.to_string(), @r###"
Invalid arguments: prog test 10 <abc>
Expected: [count] [arg2]
"###);
}

#[test]
fn test_specific_message_beats_dispatcher_default() {
    let mut dispatcher = sample();
    dispatcher.add_default_invalid_command_message("dispatcher default");
    dispatcher
        .add_specific_invalid_command_message(&["bar"], "bar has no such subcommand")
        .unwrap();

    // Stops at "bar": the node-specific message wins.
    let err = dispatcher.dispatch(&["prog", "bar", "nope"]).unwrap_err();
    assert_eq!(err.to_string(), "bar has no such subcommand");

    // Stops at the root: the dispatcher default applies.
    let err = dispatcher.dispatch(&["prog", "nope"]).unwrap_err();
    assert_eq!(err.to_string(), "dispatcher default");
}

#[test]
fn test_specific_func_sees_context() {
    let mut dispatcher = sample();
    dispatcher
        .add_specific_invalid_command_func(&["bar"], |ctx: &PathErrorContext| {
            format!(
                "stuck after '{}' on '{}' ({} alternatives)",
                ctx.consumed.join(" "),
                ctx.unmatched,
                ctx.alternatives.len()
            )
        })
        .unwrap();

    let err = dispatcher.dispatch(&["prog", "bar", "qux"]).unwrap_err();
    assert_eq!(err.to_string(), "stuck after 'prog bar' on 'qux' (1 alternatives)");
}

#[test]
fn test_default_args_func_sees_acceptance() {
    let mut dispatcher = sample();
    dispatcher.add_default_invalid_args_func(|ctx: &ArgsErrorContext| {
        let rejected = ctx
            .tokens
            .iter()
            .zip(&ctx.accepted)
            .filter(|(_, ok)| !**ok)
            .map(|(token, _)| token.as_str())
            .collect::<Vec<_>>()
            .join(",");
        format!("rejected: {}", rejected)
    });

    let err = dispatcher
        .dispatch(&["prog", "test", "10", "abc"])
        .unwrap_err();
    assert_eq!(err.to_string(), "rejected: abc");
}

#[test]
fn test_specific_args_message_on_command_node() {
    let mut dispatcher = sample();
    dispatcher
        .add_specific_invalid_args_message(&["test"], "usage: test <x> <y>")
        .unwrap();

    let err = dispatcher.dispatch(&["prog", "test", "abc", "1"]).unwrap_err();
    assert_eq!(err.to_string(), "usage: test <x> <y>");
}
