//! Argument-phase resolution.
//!
//! After the path phase has picked a command, the remaining tokens are
//! assigned to its argument slots:
//!
//! ```text
//! remaining tokens
//!   -> flag scan        (value flags fill from their registered text,
//!                        positional flags redirect the following token)
//!   -> positional fill  (leftover tokens into the lowest open slots)
//!   -> defaults         (registered defaults for anything still open)
//!   -> convert          (one combined validate-and-convert pass)
//! ```
//!
//! The pass either yields the converted values, ready for the execution
//! thunk, or a failure report with per-token acceptance for the diagnostic.

use crate::command::CommandSpec;
use crate::convert::{BoxedValue, ConversionRegistry};

/// True for tokens that name a flag: nonempty, starting with `-`.
pub(crate) fn is_flag_shaped(token: &str) -> bool {
    token.starts_with('-')
}

/// The flag name: the token with every leading `-` stripped.
pub(crate) fn flag_name(token: &str) -> &str {
    token.trim_start_matches('-')
}

/// Outcome of the argument phase.
pub(crate) enum ArgResolution {
    /// Every slot filled and converted; values are in slot order.
    Ready(Vec<BoxedValue>),
    /// The call is invalid; carries the report for the diagnostic.
    Invalid(ArgFailure),
}

/// Failure report of the argument phase.
pub(crate) struct ArgFailure {
    pub(crate) kind: ArgFailureKind,
    /// Per-token acceptance, parallel to the remaining tokens.
    pub(crate) accepted: Vec<bool>,
}

/// How the argument phase failed.
pub(crate) enum ArgFailureKind {
    /// A flag-shaped token matched no declared flag.
    UnknownFlag { flag: String },
    /// A positional flag was the last token, with nothing following it.
    MissingFlagValue { flag: String },
    /// Unfilled slots, failed conversions, or more tokens than slots.
    Unresolved,
}

/// Assigns `tokens` to the command's slots and converts them.
pub(crate) fn resolve_args(
    spec: &CommandSpec,
    tokens: &[String],
    conversions: &ConversionRegistry,
) -> ArgResolution {
    let arity = spec.arity();
    let mut slots: Vec<Option<String>> = vec![None; arity];
    // Token index that filled each slot, for rejection marking. Slots filled
    // by value flags point at the flag token; defaults have no source.
    let mut sources: Vec<Option<usize>> = vec![None; arity];
    let mut consumed = vec![false; tokens.len()];
    let mut accepted = vec![true; tokens.len()];

    // Flag scan, left to right. First matching slot wins.
    let mut i = 0;
    while i < tokens.len() {
        if !is_flag_shaped(&tokens[i]) {
            i += 1;
            continue;
        }
        let name = flag_name(&tokens[i]);
        let Some((slot, value)) = spec.find_flag(name) else {
            accepted[i] = false;
            return ArgResolution::Invalid(ArgFailure {
                kind: ArgFailureKind::UnknownFlag {
                    flag: name.to_string(),
                },
                accepted,
            });
        };
        consumed[i] = true;
        match value {
            Some(fixed) => {
                slots[slot] = Some(fixed);
                sources[slot] = Some(i);
            }
            None => {
                if i + 1 >= tokens.len() {
                    accepted[i] = false;
                    return ArgResolution::Invalid(ArgFailure {
                        kind: ArgFailureKind::MissingFlagValue {
                            flag: name.to_string(),
                        },
                        accepted,
                    });
                }
                consumed[i + 1] = true;
                slots[slot] = Some(tokens[i + 1].clone());
                sources[slot] = Some(i + 1);
                i += 1;
            }
        }
        i += 1;
    }

    let mut unresolved = false;

    // Positional fill: remaining tokens into the lowest open slots.
    let mut next_slot = 0;
    for (i, token) in tokens.iter().enumerate() {
        if consumed[i] {
            continue;
        }
        while next_slot < arity && slots[next_slot].is_some() {
            next_slot += 1;
        }
        if next_slot == arity {
            // More tokens than open slots.
            accepted[i] = false;
            unresolved = true;
            continue;
        }
        slots[next_slot] = Some(token.clone());
        sources[next_slot] = Some(i);
    }

    // Defaults for anything still open.
    for (slot, param) in slots.iter_mut().zip(&spec.params) {
        if slot.is_none() {
            *slot = param.default.clone();
        }
    }

    // Combined validate-and-convert pass.
    let mut values: Vec<Option<BoxedValue>> = Vec::with_capacity(arity);
    for (idx, slot) in slots.iter().enumerate() {
        match slot {
            None => {
                unresolved = true;
                values.push(None);
            }
            Some(raw) => match conversions.convert(spec.params[idx].type_id, raw) {
                Ok(value) => values.push(Some(value)),
                Err(_) => {
                    unresolved = true;
                    if let Some(token) = sources[idx] {
                        accepted[token] = false;
                    }
                    values.push(None);
                }
            },
        }
    }

    if unresolved {
        return ArgResolution::Invalid(ArgFailure {
            kind: ArgFailureKind::Unresolved,
            accepted,
        });
    }
    ArgResolution::Ready(values.into_iter().flatten().collect())
}
