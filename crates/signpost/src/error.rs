//! Error types for registration and dispatch.

use thiserror::Error;

/// Errors raised while building the command tree.
///
/// These indicate programmer mistakes in the registration sequence and are
/// returned eagerly, before the bad state can reach a dispatch.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A registration call named a path with no node at it.
    #[error("path not found: {path}")]
    PathNotFound {
        /// The space-joined path that failed to resolve.
        path: String,
    },

    /// The path resolves to a node, but no command is registered there.
    #[error("no command registered at: {path}")]
    NoCommand {
        /// The space-joined path of the node.
        path: String,
    },

    /// An argument index is out of range for the command's arity.
    #[error("argument index {idx} out of range for command with {arity} argument(s)")]
    IndexOutOfRange {
        /// The offending index.
        idx: usize,
        /// The command's arity.
        arity: usize,
    },

    /// A command was registered with a parameter type that has no converter.
    #[error("no conversion registered for type {type_name}")]
    NoConverter {
        /// Name of the type missing a converter.
        type_name: &'static str,
    },

    /// An alias collides with a label already used under the same parent.
    #[error("label '{label}' already used by a sibling command")]
    DuplicateLabel {
        /// The colliding label.
        label: String,
    },
}

/// A failed dispatch.
///
/// Every variant carries the diagnostic text produced by the message/handler
/// override chain; `Display` renders exactly that text. Dispatch failures
/// are recoverable by construction: the dispatcher reports and returns, it
/// never terminates the process.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The token sequence does not reach a node with a command.
    #[error("{message}")]
    CommandNotFound {
        /// The rendered unknown-command diagnostic.
        message: String,
    },

    /// One or more argument slots were left unfilled or failed to convert.
    #[error("{message}")]
    InvalidArguments {
        /// The rendered invalid-arguments diagnostic.
        message: String,
    },

    /// A flag-shaped token matched no declared flag on the command.
    #[error("{message}")]
    UnknownFlag {
        /// The flag name, with its `-` prefix stripped.
        flag: String,
        /// The rendered diagnostic.
        message: String,
    },

    /// A positional flag was the last token, with no value following it.
    #[error("{message}")]
    MissingFlagValue {
        /// The flag name, with its `-` prefix stripped.
        flag: String,
        /// The rendered diagnostic.
        message: String,
    },
}

impl DispatchError {
    /// The diagnostic text, as produced by the message/handler chain.
    pub fn message(&self) -> &str {
        match self {
            DispatchError::CommandNotFound { message }
            | DispatchError::InvalidArguments { message }
            | DispatchError::UnknownFlag { message, .. }
            | DispatchError::MissingFlagValue { message, .. } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_the_diagnostic() {
        let err = DispatchError::CommandNotFound {
            message: "Unknown command: prog \"x\"".into(),
        };
        assert_eq!(err.to_string(), "Unknown command: prog \"x\"");
        assert_eq!(err.message(), err.to_string());
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::IndexOutOfRange { idx: 4, arity: 2 };
        assert_eq!(
            err.to_string(),
            "argument index 4 out of range for command with 2 argument(s)"
        );

        let err = ConfigError::PathNotFound {
            path: "bar baz".into(),
        };
        assert!(err.to_string().contains("bar baz"));
    }
}
