//! The dispatcher: registration surface and the two-phase dispatch.
//!
//! A [`Dispatcher`] owns the command tree and the conversion registry. The
//! build phase populates both through the `add_*` methods; the dispatch
//! phase walks them without structural mutation:
//!
//! ```text
//! tokens (program name first)
//!   -> path phase      greedy walk of the command tree
//!   -> argument phase  flags, positionals, defaults, conversion
//!   -> handler call    the one observable effect of a successful dispatch
//! ```
//!
//! Either phase can fail; failures are rendered through the error-policy
//! chain and returned (or printed by [`Dispatcher::execute_command`]),
//! never escalated to a process exit.

use crate::command::{CommandSpec, IntoCommand, Param};
use crate::convert::ConversionRegistry;
use crate::error::{ConfigError, DispatchError};
use crate::policy::{self, ArgsErrorContext, ErrorPolicy, PathErrorContext};
use crate::resolve::{self, ArgFailureKind, ArgResolution};
use crate::tree::{join_path, CommandTree, Node};

/// Command dispatcher: a tree of path-named commands with typed arguments.
///
/// Registration happens up front (`add_command`, `add_conversion`,
/// `add_alias`, flag and default setters); afterwards
/// [`dispatch`](Dispatcher::dispatch) or
/// [`execute_command`](Dispatcher::execute_command) resolve token sequences
/// against the registered commands. Registration mistakes surface
/// immediately as [`ConfigError`]; bad input at dispatch time is reported
/// as [`DispatchError`] and is never fatal.
///
/// # Example
///
/// ```
/// use signpost::Dispatcher;
///
/// let mut dispatcher = Dispatcher::new();
/// dispatcher.add_command(&["math", "add"], |a: i32, b: i32| {
///     println!("{}", a + b);
/// })?;
/// dispatcher.add_alias(&["math", "add"], "sum")?;
///
/// // Token zero is the program name, as in std::env::args().
/// dispatcher.execute_command(["calc", "math", "sum", "2", "40"]);
/// # Ok::<(), signpost::ConfigError>(())
/// ```
pub struct Dispatcher {
    tree: CommandTree,
    conversions: ConversionRegistry,
    default_invalid_command: Option<ErrorPolicy<PathErrorContext>>,
    default_invalid_args: Option<ErrorPolicy<ArgsErrorContext>>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Creates a dispatcher with an empty command tree and the primitive
    /// conversions pre-registered.
    pub fn new() -> Self {
        Self {
            tree: CommandTree::new(),
            conversions: ConversionRegistry::new(),
            default_invalid_command: None,
            default_invalid_args: None,
        }
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Registers `handler` at `path`, creating tree nodes as needed.
    ///
    /// Arity and per-slot types are taken from the handler's signature.
    /// Registering again at the same path replaces the command but leaves
    /// the node and its children untouched.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NoConverter`] if any argument type of the handler has
    /// no registered conversion. Register conversions first.
    pub fn add_command<S, A, H>(&mut self, path: &[S], handler: H) -> Result<(), ConfigError>
    where
        S: AsRef<str>,
        H: IntoCommand<A>,
    {
        for param in H::param_types() {
            if !self.conversions.contains(param.id) {
                return Err(ConfigError::NoConverter {
                    type_name: param.name,
                });
            }
        }
        let node = self.tree.insert(path);
        node.spec = Some(CommandSpec::new(handler));
        Ok(())
    }

    /// Registers a conversion from token text to `T`, replacing any
    /// existing converter for `T`.
    ///
    /// The built-in set covers `i32`, `i64`, `u32`, `u64`, `f32`, `f64`,
    /// `bool` and `String`; any other argument type used by a command needs
    /// a conversion registered before the command is added.
    ///
    /// # Example
    ///
    /// ```
    /// use signpost::Dispatcher;
    ///
    /// struct Celsius(f64);
    ///
    /// let mut dispatcher = Dispatcher::new();
    /// dispatcher.add_conversion(|token: &str| token.parse::<f64>().map(Celsius));
    /// dispatcher.add_command(&["warm"], |c: Celsius| {
    ///     println!("{}", c.0 > 25.0);
    /// })?;
    /// # Ok::<(), signpost::ConfigError>(())
    /// ```
    pub fn add_conversion<T, E>(&mut self, convert: impl Fn(&str) -> Result<T, E> + 'static)
    where
        T: 'static,
        E: Into<anyhow::Error>,
    {
        self.conversions.register(convert);
    }

    /// Adds `alias` as an alternative spelling of the final segment of
    /// `path`. Dispatching through the alias reaches the identical node.
    ///
    /// # Errors
    ///
    /// [`ConfigError::PathNotFound`] if the path does not exist;
    /// [`ConfigError::DuplicateLabel`] if the alias is already a label of
    /// any sibling.
    pub fn add_alias<S: AsRef<str>>(&mut self, path: &[S], alias: &str) -> Result<(), ConfigError> {
        self.tree.add_alias(path, alias)
    }

    /// Declares `flag` as a positional flag for slot `idx` of the command
    /// at `path`: when the flag appears, the token following it becomes the
    /// slot's value.
    ///
    /// # Errors
    ///
    /// [`ConfigError::PathNotFound`], [`ConfigError::NoCommand`], or
    /// [`ConfigError::IndexOutOfRange`].
    pub fn add_positional_flag<S: AsRef<str>>(
        &mut self,
        path: &[S],
        idx: usize,
        flag: &str,
    ) -> Result<(), ConfigError> {
        let param = self.param_mut(path, idx)?;
        param.flags.push(crate::command::Flag {
            name: flag.to_string(),
            value: None,
        });
        Ok(())
    }

    /// Declares `flag` as a value flag for slot `idx` of the command at
    /// `path`: when the flag appears, the slot is filled with `value`
    /// without consuming a following token. The value is stored as token
    /// text and converted like any other argument at dispatch time.
    ///
    /// # Errors
    ///
    /// Same as [`add_positional_flag`](Dispatcher::add_positional_flag).
    pub fn add_value_flag<S: AsRef<str>>(
        &mut self,
        path: &[S],
        idx: usize,
        flag: &str,
        value: impl ToString,
    ) -> Result<(), ConfigError> {
        let param = self.param_mut(path, idx)?;
        param.flags.push(crate::command::Flag {
            name: flag.to_string(),
            value: Some(value.to_string()),
        });
        Ok(())
    }

    /// Registers a default for slot `idx` of the command at `path`, used
    /// only when the slot is left unfilled by flags and positional tokens.
    /// Stored as token text and converted at dispatch time.
    ///
    /// # Errors
    ///
    /// Same as [`add_positional_flag`](Dispatcher::add_positional_flag).
    pub fn add_default<S: AsRef<str>>(
        &mut self,
        path: &[S],
        idx: usize,
        value: impl ToString,
    ) -> Result<(), ConfigError> {
        let param = self.param_mut(path, idx)?;
        param.default = Some(value.to_string());
        Ok(())
    }

    /// Sets the display name used for slot `idx` in diagnostics (the
    /// `Expected:` line shows `[name]` instead of `[argN]`).
    ///
    /// # Errors
    ///
    /// Same as [`add_positional_flag`](Dispatcher::add_positional_flag).
    pub fn set_arg_name<S: AsRef<str>>(
        &mut self,
        path: &[S],
        idx: usize,
        name: &str,
    ) -> Result<(), ConfigError> {
        let param = self.param_mut(path, idx)?;
        param.display_name = Some(name.to_string());
        Ok(())
    }

    // ------------------------------------------------------------------
    // Error-reporting overrides
    // ------------------------------------------------------------------

    /// Sets a fixed message for invalid arguments at the node at `path`,
    /// replacing any previously set message or handler for that node.
    pub fn add_specific_invalid_args_message<S: AsRef<str>>(
        &mut self,
        path: &[S],
        message: &str,
    ) -> Result<(), ConfigError> {
        let node = self.node_mut(path)?;
        node.invalid_args = Some(ErrorPolicy::Message(message.to_string()));
        Ok(())
    }

    /// Sets a callback rendering the invalid-arguments message at the node
    /// at `path`, replacing any previously set message or handler.
    pub fn add_specific_invalid_args_func<S: AsRef<str>>(
        &mut self,
        path: &[S],
        handler: impl Fn(&ArgsErrorContext) -> String + 'static,
    ) -> Result<(), ConfigError> {
        let node = self.node_mut(path)?;
        node.invalid_args = Some(ErrorPolicy::Handler(Box::new(handler)));
        Ok(())
    }

    /// Sets a fixed message for "no command ends here" at the node at
    /// `path`, replacing any previously set message or handler.
    pub fn add_specific_invalid_command_message<S: AsRef<str>>(
        &mut self,
        path: &[S],
        message: &str,
    ) -> Result<(), ConfigError> {
        let node = self.node_mut(path)?;
        node.invalid_command = Some(ErrorPolicy::Message(message.to_string()));
        Ok(())
    }

    /// Sets a callback rendering the unknown-command message at the node at
    /// `path`, replacing any previously set message or handler.
    pub fn add_specific_invalid_command_func<S: AsRef<str>>(
        &mut self,
        path: &[S],
        handler: impl Fn(&PathErrorContext) -> String + 'static,
    ) -> Result<(), ConfigError> {
        let node = self.node_mut(path)?;
        node.invalid_command = Some(ErrorPolicy::Handler(Box::new(handler)));
        Ok(())
    }

    /// Sets the dispatcher-wide invalid-arguments message, used when the
    /// stop node has no override of its own.
    pub fn add_default_invalid_args_message(&mut self, message: &str) {
        self.default_invalid_args = Some(ErrorPolicy::Message(message.to_string()));
    }

    /// Sets the dispatcher-wide invalid-arguments handler.
    pub fn add_default_invalid_args_func(
        &mut self,
        handler: impl Fn(&ArgsErrorContext) -> String + 'static,
    ) {
        self.default_invalid_args = Some(ErrorPolicy::Handler(Box::new(handler)));
    }

    /// Sets the dispatcher-wide unknown-command message, used when the stop
    /// node has no override of its own.
    pub fn add_default_invalid_command_message(&mut self, message: &str) {
        self.default_invalid_command = Some(ErrorPolicy::Message(message.to_string()));
    }

    /// Sets the dispatcher-wide unknown-command handler.
    pub fn add_default_invalid_command_func(
        &mut self,
        handler: impl Fn(&PathErrorContext) -> String + 'static,
    ) {
        self.default_invalid_command = Some(ErrorPolicy::Handler(Box::new(handler)));
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Resolves `tokens` and invokes the matched handler.
    ///
    /// `tokens[0]` is the program name: it is excluded from path matching
    /// but echoed in diagnostics, matching `std::env::args()` conventions.
    ///
    /// # Errors
    ///
    /// [`DispatchError`] carrying the diagnostic rendered through the
    /// node-specific/dispatcher-default policy chain. Failures are
    /// recoverable; the dispatcher state is unaffected.
    pub fn dispatch<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<(), DispatchError> {
        let tokens: Vec<String> = tokens.iter().map(|t| t.as_ref().to_string()).collect();
        let program = tokens.first().cloned().unwrap_or_default();
        let rest = tokens.get(1..).unwrap_or_default();

        let Self {
            tree,
            conversions,
            default_invalid_command,
            default_invalid_args,
        } = self;

        let (matched, node) = tree.resolve_prefix_mut(rest);

        let mut consumed = Vec::with_capacity(matched + 1);
        consumed.push(program);
        consumed.extend(rest[..matched].iter().cloned());

        let Node {
            spec,
            children,
            invalid_command,
            invalid_args,
            ..
        } = node;

        // Phase 1: the walk must end on a node with a command attached.
        let spec = match spec {
            Some(spec) => spec,
            None => {
                let ctx = PathErrorContext {
                    consumed,
                    alternatives: children
                        .iter()
                        .map(|child| child.primary_label().to_string())
                        .collect(),
                    unmatched: rest.get(matched).cloned().unwrap_or_default(),
                };
                let message = policy::select(
                    invalid_command.as_ref(),
                    default_invalid_command.as_ref(),
                    &ctx,
                    policy::default_unknown_command,
                );
                return Err(DispatchError::CommandNotFound { message });
            }
        };

        // Phase 2: assign, convert, invoke.
        let remaining = &rest[matched..];
        match resolve::resolve_args(spec, remaining, conversions) {
            ArgResolution::Ready(values) => match (spec.execute)(values) {
                Ok(()) => Ok(()),
                Err(_slot) => {
                    // A converter produced a value the handler's signature
                    // does not accept; report rather than crash.
                    let ctx = ArgsErrorContext {
                        consumed,
                        tokens: remaining.to_vec(),
                        accepted: vec![true; remaining.len()],
                        placeholders: placeholders(&spec.params),
                    };
                    let message = policy::select(
                        invalid_args.as_ref(),
                        default_invalid_args.as_ref(),
                        &ctx,
                        policy::default_invalid_arguments,
                    );
                    Err(DispatchError::InvalidArguments { message })
                }
            },
            ArgResolution::Invalid(failure) => {
                let ctx = ArgsErrorContext {
                    consumed,
                    tokens: remaining.to_vec(),
                    accepted: failure.accepted,
                    placeholders: placeholders(&spec.params),
                };
                let message = policy::select(
                    invalid_args.as_ref(),
                    default_invalid_args.as_ref(),
                    &ctx,
                    policy::default_invalid_arguments,
                );
                Err(match failure.kind {
                    ArgFailureKind::UnknownFlag { flag } => {
                        DispatchError::UnknownFlag { flag, message }
                    }
                    ArgFailureKind::MissingFlagValue { flag } => {
                        DispatchError::MissingFlagValue { flag, message }
                    }
                    ArgFailureKind::Unresolved => DispatchError::InvalidArguments { message },
                })
            }
        }
    }

    /// Like [`dispatch`](Dispatcher::dispatch), but prints the diagnostic
    /// of a failed dispatch to stdout and returns nothing. This is the
    /// drop-in entry point for `main`:
    ///
    /// ```no_run
    /// # let mut dispatcher = signpost::Dispatcher::new();
    /// dispatcher.execute_command(std::env::args());
    /// ```
    pub fn execute_command<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        if let Err(err) = self.dispatch(&tokens) {
            println!("{}", err);
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn node_mut<S: AsRef<str>>(&mut self, path: &[S]) -> Result<&mut Node, ConfigError> {
        self.tree.find_mut(path).ok_or_else(|| ConfigError::PathNotFound {
            path: join_path(path),
        })
    }

    fn param_mut<S: AsRef<str>>(
        &mut self,
        path: &[S],
        idx: usize,
    ) -> Result<&mut Param, ConfigError> {
        let node = self
            .tree
            .find_mut(path)
            .ok_or_else(|| ConfigError::PathNotFound {
                path: join_path(path),
            })?;
        let spec = match node.spec.as_mut() {
            Some(spec) => spec,
            None => {
                return Err(ConfigError::NoCommand {
                    path: join_path(path),
                })
            }
        };
        let arity = spec.arity();
        spec.params
            .get_mut(idx)
            .ok_or(ConfigError::IndexOutOfRange { idx, arity })
    }
}

fn placeholders(params: &[Param]) -> Vec<String> {
    params
        .iter()
        .enumerate()
        .map(|(idx, param)| param.placeholder(idx))
        .collect()
}
