//! Report-generating example runner
//!
//! [`ReportRunner`] executes doctests one at a time and accumulates one
//! report suite per doctest, one case per example. Examples within a
//! doctest share one [`Context`], in order, so later examples may use
//! bindings established by earlier ones; doctests run strictly
//! sequentially.
//!
//! Nothing that happens inside an example aborts the run: wrong output
//! becomes a failure case, an evaluation error becomes an error case, and
//! execution continues with the next example.

use crate::discover::{DocTest, Example};
use crate::eval::{repr_str, Context, EvalError};
use crate::report::{Report, TestCase, TestSuite};
use std::collections::HashSet;

/// Counts produced by [`ReportRunner::summary`], the basis for the exit
/// status decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Examples that began execution.
    pub attempted: usize,
    /// Examples whose output did not match.
    pub failed: usize,
    /// Examples that raised an evaluation error.
    pub errored: usize,
}

impl RunSummary {
    pub fn failed_or_errored(&self) -> bool {
        self.failed > 0 || self.errored > 0
    }
}

/// Runs doctests and accumulates a JUnit report
#[derive(Debug, Default)]
pub struct ReportRunner {
    report: Report,
    seen: HashSet<u64>,
    attempted: usize,
    failed: usize,
    errored: usize,
}

impl ReportRunner {
    pub fn new() -> Self {
        ReportRunner {
            report: Report::new(),
            seen: HashSet::new(),
            attempted: 0,
            failed: 0,
            errored: 0,
        }
    }

    /// Run every example in `test` and append one suite to the report.
    ///
    /// A doctest that has already been run is skipped entirely: the check
    /// is keyed on the doctest's discovery identity, so a doctest reachable
    /// from more than one supplied module is counted once, while two
    /// distinct doctests sharing a name both run (and produce two
    /// same-named suites).
    pub fn run(&mut self, test: &DocTest) {
        if !self.seen.insert(test.id) {
            return;
        }

        let mut context = Context::new();
        let mut cases = Vec::with_capacity(test.examples.len());
        for example in &test.examples {
            self.attempted += 1;
            cases.push(self.run_example(test, example, &mut context));
        }

        self.report
            .add_test_suite(TestSuite::new(test.name.clone(), cases));
    }

    fn run_example(&mut self, test: &DocTest, example: &Example, context: &mut Context) -> TestCase {
        let name = format!("Example: {}", example.source.trim_end());
        let line = test.lineno + example.lineno;

        match context.eval_source(&example.source) {
            Ok(got) if got == example.want => TestCase::success(name, test.filename.clone(), line),
            Ok(got) => {
                self.failed += 1;
                let message = format!(
                    "Expected {}. Got {}.",
                    repr_str(&example.want),
                    repr_str(&got)
                );
                TestCase::failure(name, test.filename.clone(), line, message)
            }
            Err(err) => {
                self.errored += 1;
                let message = format_trace(test, example, line, &err);
                TestCase::error(name, test.filename.clone(), line, message)
            }
        }
    }

    /// Counts of attempted, failed and errored examples so far.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            attempted: self.attempted,
            failed: self.failed,
            errored: self.errored,
        }
    }

    /// The accumulated report, for serialization.
    pub fn report(&self) -> &Report {
        &self.report
    }
}

/// Diagnostic trace for an example that raised: names the doctest, points
/// at the file and line, quotes the source, and ends with the error.
fn format_trace(test: &DocTest, example: &Example, line: usize, err: &EvalError) -> String {
    let mut trace = format!(
        "Error in doctest {} ({}, line {}):\n",
        test.name, test.filename, line
    );
    for (i, source_line) in example.source.lines().enumerate() {
        let prompt = if i == 0 { ">>>" } else { "..." };
        trace.push_str(&format!("    {} {}\n", prompt, source_line));
    }
    trace.push_str(&err.to_string());
    trace
}
