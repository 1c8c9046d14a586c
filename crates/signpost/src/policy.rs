//! Error-reporting policies and the default diagnostic formats.
//!
//! When a dispatch fails, the text the user sees is decided by a fallback
//! chain: the policy stored on the node where resolution stopped, then the
//! dispatcher-wide default policy, then the built-in formatter. A policy is
//! either a fixed message or a callback that renders one from the failure
//! context; both levels of the chain accept either kind.
//!
//! The built-in formatters are deterministic: identical inputs always
//! produce byte-identical text.

use crate::suggest::{closest_matches, SUGGESTION_THRESHOLD};

/// What a path-resolution failure handler gets to work with.
#[derive(Debug, Clone)]
pub struct PathErrorContext {
    /// The consumed path as literal tokens, program name included.
    pub consumed: Vec<String>,
    /// One representative label per child of the stop node, in insertion
    /// order.
    pub alternatives: Vec<String>,
    /// The token that matched no child label; empty if the token list was
    /// exhausted exactly at the node.
    pub unmatched: String,
}

/// What an argument-resolution failure handler gets to work with.
#[derive(Debug, Clone)]
pub struct ArgsErrorContext {
    /// The consumed path as literal tokens, program name included.
    pub consumed: Vec<String>,
    /// The raw tokens that followed the path.
    pub tokens: Vec<String>,
    /// Per-token acceptance, parallel to `tokens`. A token is rejected when
    /// it failed conversion, matched no declared flag, lacked a required
    /// flag value, or had no slot left to land in.
    pub accepted: Vec<bool>,
    /// Per-slot placeholders: the display name if set, else `argN`.
    pub placeholders: Vec<String>,
}

/// One level of the error-reporting chain.
pub(crate) enum ErrorPolicy<C> {
    /// A fixed message, used verbatim.
    Message(String),
    /// A callback rendering the message from the failure context.
    Handler(Box<dyn Fn(&C) -> String>),
}

impl<C> ErrorPolicy<C> {
    pub(crate) fn render(&self, ctx: &C) -> String {
        match self {
            ErrorPolicy::Message(message) => message.clone(),
            ErrorPolicy::Handler(handler) => handler(ctx),
        }
    }
}

/// Walks the chain: node policy, dispatcher default, built-in formatter.
pub(crate) fn select<C>(
    node: Option<&ErrorPolicy<C>>,
    dispatcher: Option<&ErrorPolicy<C>>,
    ctx: &C,
    builtin: fn(&C) -> String,
) -> String {
    if let Some(policy) = node {
        return policy.render(ctx);
    }
    if let Some(policy) = dispatcher {
        return policy.render(ctx);
    }
    builtin(ctx)
}

/// Built-in unknown-command formatter.
///
/// First line: `Unknown command: <consumed path> "<unmatched token>"`.
/// Then, tab-indented one per line: the sibling labels within edit distance
/// 2 of the unmatched token (headed `Closest match:` for one, `Similar
/// commands:` for several), or every sibling label headed
/// `Possible commands:` when none qualify.
pub(crate) fn default_unknown_command(ctx: &PathErrorContext) -> String {
    let mut out = format!(
        "Unknown command: {} \"{}\"",
        ctx.consumed.join(" "),
        ctx.unmatched
    );

    let close = closest_matches(&ctx.unmatched, &ctx.alternatives, SUGGESTION_THRESHOLD);
    let (heading, entries): (&str, Vec<&str>) = if close.is_empty() {
        (
            "Possible commands:",
            ctx.alternatives.iter().map(String::as_str).collect(),
        )
    } else if close.len() == 1 {
        ("Closest match:", close)
    } else {
        ("Similar commands:", close)
    };

    if !entries.is_empty() {
        out.push('\n');
        out.push_str(heading);
        for entry in entries {
            out.push_str("\n\t");
            out.push_str(entry);
        }
    }
    out
}

/// Built-in invalid-arguments formatter.
///
/// First line echoes the invocation: the consumed path followed by each
/// remaining token, rejected tokens wrapped in angle brackets. Second line
/// lists the expected slots as bracketed placeholders.
pub(crate) fn default_invalid_arguments(ctx: &ArgsErrorContext) -> String {
    let mut echo = ctx.consumed.join(" ");
    for (token, accepted) in ctx.tokens.iter().zip(&ctx.accepted) {
        echo.push(' ');
        if *accepted {
            echo.push_str(token);
        } else {
            echo.push('<');
            echo.push_str(token);
            echo.push('>');
        }
    }

    let expected = ctx
        .placeholders
        .iter()
        .map(|placeholder| format!("[{}]", placeholder))
        .collect::<Vec<_>>()
        .join(" ");

    format!("Invalid arguments: {}\nExpected: {}", echo, expected)
}
