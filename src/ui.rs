//! Terminal output seam between commands and the process
//!
//! Commands report through [`UI`] rather than printing directly: the run
//! summary and the saved-report confirmation go to `output`, anything that
//! should reach the user on stderr goes to `error` or `warning`. Tests
//! substitute a capturing implementation to assert on exact lines.

use crate::error::Result;
use std::io::{self, Write};

/// Sink for the lines a command emits while it runs.
pub trait UI {
    /// An informational line: summary counts, report location.
    fn output(&mut self, message: &str) -> Result<()>;

    /// An error line, for problems the command keeps running through.
    fn error(&mut self, message: &str) -> Result<()>;

    /// A warning line.
    fn warning(&mut self, message: &str) -> Result<()>;
}

/// [`UI`] backed by a pair of streams, stdout and stderr by default.
pub struct CliUI {
    stdout: Box<dyn Write>,
    stderr: Box<dyn Write>,
}

impl CliUI {
    pub fn new() -> Self {
        Self::with_streams(Box::new(io::stdout()), Box::new(io::stderr()))
    }

    /// Route output elsewhere, e.g. capture buffers in tests.
    pub fn with_streams(stdout: Box<dyn Write>, stderr: Box<dyn Write>) -> Self {
        CliUI { stdout, stderr }
    }
}

impl Default for CliUI {
    fn default() -> Self {
        Self::new()
    }
}

impl UI for CliUI {
    fn output(&mut self, message: &str) -> Result<()> {
        writeln!(self.stdout, "{}", message)?;
        Ok(())
    }

    fn error(&mut self, message: &str) -> Result<()> {
        writeln!(self.stderr, "Error: {}", message)?;
        Ok(())
    }

    fn warning(&mut self, message: &str) -> Result<()> {
        writeln!(self.stderr, "Warning: {}", message)?;
        Ok(())
    }
}
