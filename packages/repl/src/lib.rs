//! # navbridge-repl
//!
//! An interactive shell around the navbridge demo app.
//!
//! The app mounts a legacy `Switch` under a modern route tree, both reading
//! the same router. The shell navigates through either API, edits the draft
//! of the guarded page and prints the view tree each time it changes.
//!
//! ## Features
//!
//! - Legacy (`push`, `replace`) and modern (`navigate`, `go`) navigation
//! - Confirmation prompts from guarded pages, answered on the terminal
//! - Tab completion for commands and demo pages
//! - Syntax highlighting for targets and JSON state
//! - Vi mode support (detected from EDITOR, .inputrc, or NAVBRIDGE_EDIT_MODE)
//! - Command history
//!
//! ## Usage
//!
//! ```bash
//! navbridge --entry / --entry /a/blocker
//!
//! # Inside the shell:
//! > type unsaved
//! > push /a
//! Are you sure you want to go to /a? [y/N]
//! > state
//! ```

pub mod commands;
pub mod completer;
pub mod context;
pub mod demo;
pub mod error;
pub mod highlighter;
pub mod host;
pub mod io;
pub mod repl;
pub mod session;

pub use context::ShellContext;
pub use error::ShellError;
pub use repl::run;
pub use session::ReplCore;
