//! Run documentation examples and write the JUnit XML report

use crate::commands::Command;
use crate::discover::DocTestFinder;
use crate::error::{Error, Result};
use crate::module;
use crate::runner::ReportRunner;
use crate::ui::UI;
use std::fs;
use std::path::PathBuf;

/// The single doctestr command: discover, run, report.
///
/// Module resolution happens before any example executes, so a bad module
/// name aborts the run without writing a partial report. Example failures
/// never abort; they only affect the exit code (unless status reporting is
/// disabled).
pub struct RunCommand {
    modules: Vec<String>,
    output: PathBuf,
    roots: Vec<PathBuf>,
    status: bool,
}

impl RunCommand {
    pub fn new(modules: Vec<String>, output: PathBuf, roots: Vec<PathBuf>) -> Self {
        RunCommand {
            modules,
            output,
            roots,
            status: true,
        }
    }

    /// Control whether failed examples affect the exit code (`--no-status`).
    pub fn with_status(mut self, status: bool) -> Self {
        self.status = status;
        self
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UI) -> Result<i32> {
        // Resolve and scan everything up front; discovery errors are fatal
        // and must precede all execution.
        let mut finder = DocTestFinder::new();
        let mut tests = Vec::new();
        for name in &self.modules {
            let module = module::resolve(module::strip_extension(name), &self.roots)?;
            tests.extend(finder.find(&module));
        }

        let mut runner = ReportRunner::new();
        for test in &tests {
            runner.run(test);
        }

        if let Some(parent) = self.output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| Error::OutputWrite {
                    path: self.output.clone(),
                    source,
                })?;
            }
        }
        fs::write(&self.output, runner.report().to_xml_string()).map_err(|source| {
            Error::OutputWrite {
                path: self.output.clone(),
                source,
            }
        })?;

        let summary = runner.summary();
        ui.output(&format!(
            "{} examples attempted, {} failed, {} errored",
            summary.attempted, summary.failed, summary.errored
        ))?;
        let absolute = fs::canonicalize(&self.output)?;
        ui.output(&format!("Test results saved to {}", absolute.display()))?;

        if self.status && summary.failed_or_errored() {
            Ok(1)
        } else {
            Ok(0)
        }
    }

    fn name(&self) -> &str {
        "run"
    }

    fn help(&self) -> &str {
        "Run documentation examples and write a JUnit XML report"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct TestUI {
        output: Vec<String>,
        errors: Vec<String>,
    }

    impl TestUI {
        fn new() -> Self {
            TestUI {
                output: Vec::new(),
                errors: Vec::new(),
            }
        }
    }

    impl UI for TestUI {
        fn output(&mut self, message: &str) -> Result<()> {
            self.output.push(message.to_string());
            Ok(())
        }

        fn error(&mut self, message: &str) -> Result<()> {
            self.errors.push(message.to_string());
            Ok(())
        }

        fn warning(&mut self, message: &str) -> Result<()> {
            self.errors.push(format!("Warning: {}", message));
            Ok(())
        }
    }

    fn write_module(dir: &TempDir, name: &str, source: &str) {
        fs::write(dir.path().join(format!("{}.rs", name)), source).unwrap();
    }

    #[test]
    fn test_run_passing_module() {
        let temp = TempDir::new().unwrap();
        write_module(&temp, "m", "//! >>> 1 + 1\n//! 2\n");
        let output = temp.path().join("results.xml");

        let cmd = RunCommand::new(
            vec!["m".to_string()],
            output.clone(),
            vec![temp.path().to_path_buf()],
        );
        let mut ui = TestUI::new();
        let code = cmd.execute(&mut ui).unwrap();

        assert_eq!(code, 0);
        assert_eq!(ui.output[0], "1 examples attempted, 0 failed, 0 errored");
        assert!(ui.output[1].starts_with("Test results saved to "));
        assert!(output.exists());
    }

    #[test]
    fn test_run_failing_module_sets_exit_code() {
        let temp = TempDir::new().unwrap();
        write_module(&temp, "m", "//! >>> 1 + 1\n//! 3\n");
        let output = temp.path().join("results.xml");

        let cmd = RunCommand::new(
            vec!["m".to_string()],
            output.clone(),
            vec![temp.path().to_path_buf()],
        );
        let mut ui = TestUI::new();
        assert_eq!(cmd.execute(&mut ui).unwrap(), 1);

        let xml = fs::read_to_string(&output).unwrap();
        assert!(xml.contains("Expected '3'. Got '2'."));
    }

    #[test]
    fn test_no_status_keeps_exit_code_zero() {
        let temp = TempDir::new().unwrap();
        write_module(&temp, "m", "//! >>> 1 + 1\n//! 3\n");
        let output = temp.path().join("results.xml");

        let cmd = RunCommand::new(
            vec!["m".to_string()],
            output.clone(),
            vec![temp.path().to_path_buf()],
        )
        .with_status(false);
        let mut ui = TestUI::new();
        assert_eq!(cmd.execute(&mut ui).unwrap(), 0);

        // The failure is still recorded in the report file.
        let xml = fs::read_to_string(&output).unwrap();
        assert!(xml.contains("<failure"));
    }

    #[test]
    fn test_missing_module_aborts_without_report() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("results.xml");

        let cmd = RunCommand::new(
            vec!["missing".to_string()],
            output.clone(),
            vec![temp.path().to_path_buf()],
        );
        let mut ui = TestUI::new();
        let result = cmd.execute(&mut ui);

        assert!(matches!(result, Err(Error::ModuleNotFound(_))));
        assert!(!output.exists());
        assert!(ui.output.is_empty());
    }

    #[test]
    fn test_output_parent_directories_created() {
        let temp = TempDir::new().unwrap();
        write_module(&temp, "m", "//! >>> 1 + 1\n//! 2\n");
        let output = temp.path().join("reports/nested/results.xml");

        let cmd = RunCommand::new(
            vec!["m".to_string()],
            output.clone(),
            vec![temp.path().to_path_buf()],
        );
        let mut ui = TestUI::new();
        cmd.execute(&mut ui).unwrap();
        assert!(output.exists());
    }

    #[test]
    fn test_duplicate_module_argument_yields_one_suite() {
        let temp = TempDir::new().unwrap();
        write_module(&temp, "m", "//! >>> 1 + 1\n//! 2\n");
        let output = temp.path().join("results.xml");

        let cmd = RunCommand::new(
            vec!["m".to_string(), "m.rs".to_string()],
            output.clone(),
            vec![temp.path().to_path_buf()],
        );
        let mut ui = TestUI::new();
        assert_eq!(cmd.execute(&mut ui).unwrap(), 0);
        assert_eq!(ui.output[0], "1 examples attempted, 0 failed, 0 errored");

        let xml = fs::read_to_string(&output).unwrap();
        assert_eq!(xml.matches("<testsuite ").count(), 1);
    }
}
