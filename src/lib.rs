//! doctestr - run documentation examples and publish JUnit XML results
//!
//! A plain documentation-example run only reports a single pass/fail
//! summary, which CI systems cannot render per example. doctestr discovers
//! the prompt-style examples embedded in a module's doc comments, executes
//! each one, and writes a JUnit XML report with one suite per doctest and
//! one case per example.
//!
//! # Architecture
//!
//! - [`module`]: dotted module name resolution against search roots
//! - [`discover`]: doc comment scanning and example parsing
//! - [`eval`]: the example expression language and its execution context
//! - [`runner`]: sequential execution and outcome classification
//! - [`report`]: the in-memory suite/case model and XML serialization
//! - [`commands`]: the user-facing run command
//! - [`ui`]: user interface abstraction for output
//! - [`error`]: error types and Result alias
//!
//! # Example
//!
//! ```no_run
//! use doctestr::commands::{Command, RunCommand};
//! use doctestr::ui::CliUI;
//! use std::path::PathBuf;
//!
//! # fn main() -> doctestr::error::Result<()> {
//! let cmd = RunCommand::new(
//!     vec!["pkg.math".to_string()],
//!     PathBuf::from("doctest_results.xml"),
//!     vec![PathBuf::from("src")],
//! );
//! let mut ui = CliUI::new();
//! let exit_code = cmd.execute(&mut ui)?;
//! # let _ = exit_code;
//! # Ok(())
//! # }
//! ```

pub mod commands;
pub mod discover;
pub mod error;
pub mod eval;
pub mod module;
pub mod report;
pub mod runner;
pub mod ui;

pub use error::{Error, Result};
