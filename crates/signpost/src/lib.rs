//! Path-routed command dispatch with typed argument conversion.
//!
//! `signpost` maps command-line token sequences onto handlers registered
//! under multi-segment paths. Handlers are plain functions or closures;
//! their signatures decide how many arguments a command takes and which
//! types the raw tokens must convert into.
//!
//! # Features
//!
//! - **Command tree**: commands live at paths like `["db", "migrate"]`;
//!   any segment can carry aliases that resolve to the identical node.
//! - **Typed arguments**: tokens are converted through a per-type registry
//!   seeded with the primitives and open to caller-defined types.
//! - **Flags and defaults**: a slot can be addressed by positional flags
//!   (`-y 20`), filled by value flags (`-fast`), or fall back to a
//!   registered default.
//! - **Precise diagnostics**: unknown commands list near matches by edit
//!   distance; invalid invocations are echoed token by token with the
//!   expected parameter list. Both formats can be overridden per node or
//!   dispatcher-wide, by fixed message or callback.
//!
//! # Example
//!
//! ```
//! use signpost::Dispatcher;
//!
//! let mut dispatcher = Dispatcher::new();
//!
//! dispatcher.add_command(&["todo", "add"], |title: String, priority: i32| {
//!     println!("added {} at priority {}", title, priority);
//! })?;
//! dispatcher.add_default(&["todo", "add"], 1, 3)?;
//! dispatcher.add_positional_flag(&["todo", "add"], 1, "p")?;
//! dispatcher.set_arg_name(&["todo", "add"], 0, "title")?;
//!
//! // "-p 1" fills the priority slot; "groceries" lands positionally.
//! dispatcher.execute_command(["todo", "todo", "add", "-p", "1", "groceries"]);
//! # Ok::<(), signpost::ConfigError>(())
//! ```
//!
//! # Dispatch pipeline
//!
//! ```text
//! tokens
//!   -> path phase       walk the tree while tokens match child labels
//!   -> argument phase   flags, positional fill, defaults, conversion
//!   -> handler call
//! ```
//!
//! Registration completes before dispatching begins; dispatch itself never
//! mutates the tree. All dispatch-time failures are recoverable: the
//! dispatcher renders a diagnostic and returns control to the caller.

mod command;
mod convert;
mod dispatch;
mod error;
mod policy;
mod resolve;
mod suggest;
mod tree;

pub use command::{ExecuteFn, IntoCommand, ParamType};
pub use dispatch::Dispatcher;
pub use error::{ConfigError, DispatchError};
pub use policy::{ArgsErrorContext, PathErrorContext};
