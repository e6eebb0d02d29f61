//! Command system for doctestr
//!
//! Commands are executed through the Command trait so they can be driven
//! both from main() and from tests with a capturing UI.

use crate::error::Result;
use crate::ui::UI;

pub mod run;

pub use run::RunCommand;

/// Trait that all commands must implement
pub trait Command {
    /// Execute the command, returning the process exit code
    fn execute(&self, ui: &mut dyn UI) -> Result<i32>;

    /// Get the command name
    fn name(&self) -> &str;

    /// Get command help text
    fn help(&self) -> &str;
}
