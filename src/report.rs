//! In-memory JUnit report model and XML serialization
//!
//! A [`Report`] is an ordered list of [`TestSuite`]s, each an ordered list
//! of [`TestCase`]s. One suite corresponds to one doctest and one case to
//! one example. Suites and cases are appended during the run and never
//! mutated afterwards; the report is serialized once, at the end.
//!
//! The XML follows the JUnit schema CI systems consume: `<testsuites>`
//! with aggregate counts, `<testsuite name= tests= failures= errors=>`,
//! `<testcase name= file= line=>` with an optional `<failure>`/`<error>`
//! child. The `message` attribute carries the first diagnostic line; the
//! element text carries the full diagnostic, so multi-line traces survive
//! attribute newline normalization in downstream parsers.

use crate::error::Result;
use quick_xml::escape::{escape, partial_escape};
use std::fmt::Write as _;
use std::io::Write;

/// Whether a non-successful case is a failure (wrong output) or an error
/// (the example raised)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonSuccessKind {
    Failure,
    Error,
}

/// Outcome of one case
#[derive(Debug, Clone, PartialEq)]
pub enum TestCaseStatus {
    Success,
    NonSuccess {
        kind: NonSuccessKind,
        message: String,
    },
}

/// One example's outcome as a named report entry
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    pub name: String,
    pub file: String,
    pub line: usize,
    pub status: TestCaseStatus,
}

impl TestCase {
    pub fn success(name: impl Into<String>, file: impl Into<String>, line: usize) -> Self {
        TestCase {
            name: name.into(),
            file: file.into(),
            line,
            status: TestCaseStatus::Success,
        }
    }

    pub fn failure(
        name: impl Into<String>,
        file: impl Into<String>,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        TestCase {
            name: name.into(),
            file: file.into(),
            line,
            status: TestCaseStatus::NonSuccess {
                kind: NonSuccessKind::Failure,
                message: message.into(),
            },
        }
    }

    pub fn error(
        name: impl Into<String>,
        file: impl Into<String>,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        TestCase {
            name: name.into(),
            file: file.into(),
            line,
            status: TestCaseStatus::NonSuccess {
                kind: NonSuccessKind::Error,
                message: message.into(),
            },
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self.status,
            TestCaseStatus::NonSuccess {
                kind: NonSuccessKind::Failure,
                ..
            }
        )
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self.status,
            TestCaseStatus::NonSuccess {
                kind: NonSuccessKind::Error,
                ..
            }
        )
    }
}

/// One doctest's cases, named after the doctest
#[derive(Debug, Clone, Default)]
pub struct TestSuite {
    pub name: String,
    pub cases: Vec<TestCase>,
}

impl TestSuite {
    pub fn new(name: impl Into<String>, cases: Vec<TestCase>) -> Self {
        TestSuite {
            name: name.into(),
            cases,
        }
    }

    pub fn failures(&self) -> usize {
        self.cases.iter().filter(|c| c.is_failure()).count()
    }

    pub fn errors(&self) -> usize {
        self.cases.iter().filter(|c| c.is_error()).count()
    }
}

/// The complete output artifact: an ordered sequence of suites
#[derive(Debug, Clone, Default)]
pub struct Report {
    suites: Vec<TestSuite>,
}

impl Report {
    pub fn new() -> Self {
        Report { suites: Vec::new() }
    }

    pub fn add_test_suite(&mut self, suite: TestSuite) {
        self.suites.push(suite);
    }

    pub fn suites(&self) -> &[TestSuite] {
        &self.suites
    }

    pub fn tests(&self) -> usize {
        self.suites.iter().map(|s| s.cases.len()).sum()
    }

    pub fn failures(&self) -> usize {
        self.suites.iter().map(TestSuite::failures).sum()
    }

    pub fn errors(&self) -> usize {
        self.suites.iter().map(TestSuite::errors).sum()
    }

    /// Render the report as a JUnit XML document.
    ///
    /// Well-formed even with zero suites or zero cases.
    pub fn to_xml_string(&self) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        let _ = writeln!(
            out,
            "<testsuites tests=\"{}\" failures=\"{}\" errors=\"{}\">",
            self.tests(),
            self.failures(),
            self.errors()
        );

        for suite in &self.suites {
            let _ = writeln!(
                out,
                "    <testsuite name=\"{}\" tests=\"{}\" failures=\"{}\" errors=\"{}\">",
                escape(suite.name.as_str()),
                suite.cases.len(),
                suite.failures(),
                suite.errors()
            );

            for case in &suite.cases {
                // Attribute values need full escaping: a bare `"` would end
                // the attribute early. Element text only needs `&<>`.
                let attrs = format!(
                    "name=\"{}\" file=\"{}\" line=\"{}\"",
                    escape(case.name.as_str()),
                    escape(case.file.as_str()),
                    case.line
                );
                match &case.status {
                    TestCaseStatus::Success => {
                        let _ = writeln!(out, "        <testcase {}/>", attrs);
                    }
                    TestCaseStatus::NonSuccess { kind, message } => {
                        let element = match kind {
                            NonSuccessKind::Failure => "failure",
                            NonSuccessKind::Error => "error",
                        };
                        let first_line = message.lines().next().unwrap_or("");
                        let _ = writeln!(out, "        <testcase {}>", attrs);
                        let _ = writeln!(
                            out,
                            "            <{} message=\"{}\">{}</{}>",
                            element,
                            escape(first_line),
                            partial_escape(message.as_str()),
                            element
                        );
                        let _ = writeln!(out, "        </testcase>");
                    }
                }
            }

            let _ = writeln!(out, "    </testsuite>");
        }

        out.push_str("</testsuites>\n");
        out
    }

    /// Write the XML document to `writer`.
    pub fn write_xml<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(self.to_xml_string().as_bytes())?;
        Ok(())
    }
}
