//! Discovery of documentation examples
//!
//! Scans module source for doc comments and collects prompt-style examples
//! out of them. A run of `//!` lines forms a module-level doctest; a run of
//! `///` lines attached to an item declaration forms an item doctest named
//! `module.item`.
//!
//! Inside a doc block, a line starting with `>>> ` begins an example,
//! `... ` lines continue its source, and the following non-blank lines are
//! the expected output, terminated by a blank line, the next prompt, or the
//! end of the block:
//!
//! ```text
//! /// Adds one.
//! ///
//! /// >>> x = 41
//! /// >>> x + 1
//! /// 42
//! fn add_one(...)
//! ```

use crate::module::LoadedModule;
use regex::Regex;
use std::collections::HashMap;
use std::path::PathBuf;

/// One interactive example inside a doctest
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    /// Source text; continuation lines are joined with newlines.
    pub source: String,
    /// Expected output, lines joined with `\n`, no trailing newline.
    /// Empty when the example expects no output.
    pub want: String,
    /// 0-based offset of the prompt line from the start of the doc block.
    pub lineno: usize,
}

/// An ordered sequence of examples sharing one doc comment and one
/// execution namespace
#[derive(Debug, Clone)]
pub struct DocTest {
    /// Run-unique identity assigned at discovery time. The runner keys its
    /// already-seen check on this, never on the name: two distinct doctests
    /// may share a name.
    pub id: u64,
    /// `module` for module-level docs, `module.item` for item docs.
    pub name: String,
    /// Originating file.
    pub filename: String,
    /// 1-based file line of the first line of the doc block.
    pub lineno: usize,
    pub examples: Vec<Example>,
}

/// Finds doctests in loaded modules, assigning each a run-unique identity.
///
/// Finds are cached per canonical source path: a module reached through two
/// different arguments yields the same doctests with the same identities,
/// so the runner's already-seen check skips the duplicates.
pub struct DocTestFinder {
    next_id: u64,
    cache: HashMap<PathBuf, Vec<DocTest>>,
    item_re: Regex,
}

impl DocTestFinder {
    pub fn new() -> Self {
        let item_re = Regex::new(
            r"^\s*(?:pub(?:\([^)]*\))?\s+)?(?:(?:const|async|unsafe)\s+)*(?:fn|struct|enum|trait|mod|const|static|type)\s+([A-Za-z_][A-Za-z0-9_]*)",
        )
        .expect("item declaration regex is valid");
        DocTestFinder {
            next_id: 0,
            cache: HashMap::new(),
            item_re,
        }
    }

    /// Find all doctests in `module`, in source order.
    ///
    /// Doc blocks without any examples still produce a (empty) doctest, so
    /// documented items show up in the report even when nothing runs.
    pub fn find(&mut self, module: &LoadedModule) -> Vec<DocTest> {
        let key = module
            .path
            .canonicalize()
            .unwrap_or_else(|_| module.path.clone());
        if let Some(tests) = self.cache.get(&key) {
            return tests.clone();
        }
        let tests = self.parse_module(module);
        self.cache.insert(key, tests.clone());
        tests
    }

    fn parse_module(&mut self, module: &LoadedModule) -> Vec<DocTest> {
        let filename = module.path.display().to_string();
        let lines: Vec<&str> = module.source.lines().collect();
        let mut tests = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            let trimmed = lines[i].trim_start();
            let marker = if trimmed.starts_with("//!") {
                "//!"
            } else if trimmed.starts_with("///") {
                "///"
            } else {
                i += 1;
                continue;
            };

            let block_start = i; // 0-based
            let mut doc_lines = Vec::new();
            while i < lines.len() {
                let t = lines[i].trim_start();
                if let Some(rest) = t.strip_prefix(marker) {
                    doc_lines.push(rest.strip_prefix(' ').unwrap_or(rest));
                    i += 1;
                } else {
                    break;
                }
            }

            let name = if marker == "//!" {
                Some(module.name.clone())
            } else {
                self.item_name(module, &lines, i)
            };

            if let Some(name) = name {
                let id = self.next_id;
                self.next_id += 1;
                tests.push(DocTest {
                    id,
                    name,
                    filename: filename.clone(),
                    lineno: block_start + 1,
                    examples: parse_examples(&doc_lines),
                });
            }
        }

        tests
    }

    /// Name for a `///` block: the declaration it documents, allowing
    /// attribute lines in between. Blocks attached to nothing are dropped.
    fn item_name(&self, module: &LoadedModule, lines: &[&str], mut i: usize) -> Option<String> {
        while i < lines.len() && lines[i].trim_start().starts_with("#[") {
            i += 1;
        }
        let line = lines.get(i)?;
        let captures = self.item_re.captures(line)?;
        Some(format!("{}.{}", module.name, &captures[1]))
    }
}

impl Default for DocTestFinder {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the prompt/expected-output example syntax out of stripped doc lines.
fn parse_examples(doc_lines: &[&str]) -> Vec<Example> {
    let mut examples = Vec::new();
    let mut j = 0;

    while j < doc_lines.len() {
        let line = doc_lines[j].trim_start();
        let Some(first) = strip_prompt(line, ">>>") else {
            j += 1;
            continue;
        };

        let lineno = j;
        let mut source = first.to_string();
        j += 1;
        while j < doc_lines.len() {
            let t = doc_lines[j].trim_start();
            if let Some(cont) = strip_prompt(t, "...") {
                source.push('\n');
                source.push_str(cont);
                j += 1;
            } else {
                break;
            }
        }

        let mut want_lines = Vec::new();
        while j < doc_lines.len() {
            let raw = doc_lines[j];
            let t = raw.trim_start();
            if t.is_empty() || t.starts_with(">>>") {
                break;
            }
            want_lines.push(t);
            j += 1;
        }

        examples.push(Example {
            source,
            want: want_lines.join("\n"),
            lineno,
        });
    }

    examples
}

/// `>>> expr` yields `expr`; a bare `>>>` yields the empty string; anything
/// else is not a prompt line. Text after the prompt and its single
/// separating space is kept verbatim, indentation included.
fn strip_prompt<'a>(line: &'a str, prompt: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(prompt)?;
    if rest.is_empty() {
        Some("")
    } else {
        rest.strip_prefix(' ')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn module(name: &str, source: &str) -> LoadedModule {
        LoadedModule {
            name: name.to_string(),
            path: PathBuf::from(format!("{}.rs", name)),
            source: source.to_string(),
        }
    }

    #[test]
    fn test_module_level_doctest() {
        let source = "\
//! Math helpers.
//!
//! >>> 1 + 1
//! 2

pub fn unrelated() {}
";
        let mut finder = DocTestFinder::new();
        let tests = finder.find(&module("pkg.math", source));

        assert_eq!(tests.len(), 1);
        assert_eq!(tests[0].name, "pkg.math");
        assert_eq!(tests[0].lineno, 1);
        assert_eq!(tests[0].examples.len(), 1);
        assert_eq!(tests[0].examples[0].source, "1 + 1");
        assert_eq!(tests[0].examples[0].want, "2");
        assert_eq!(tests[0].examples[0].lineno, 2);
    }

    #[test]
    fn test_item_doctest_named_after_item() {
        let source = "\
/// Doubles a number.
///
/// >>> double = 2 * 21
/// >>> double
/// 42
pub fn double(n: i64) -> i64 {
    n * 2
}
";
        let mut finder = DocTestFinder::new();
        let tests = finder.find(&module("m", source));

        assert_eq!(tests.len(), 1);
        assert_eq!(tests[0].name, "m.double");
        assert_eq!(tests[0].examples.len(), 2);
        assert_eq!(tests[0].examples[0].want, "");
        assert_eq!(tests[0].examples[1].source, "double");
        assert_eq!(tests[0].examples[1].want, "42");
    }

    #[test]
    fn test_attributes_between_docs_and_item() {
        let source = "\
/// >>> 1 + 1
/// 2
#[derive(Debug)]
#[allow(dead_code)]
struct Marker;
";
        let mut finder = DocTestFinder::new();
        let tests = finder.find(&module("m", source));
        assert_eq!(tests.len(), 1);
        assert_eq!(tests[0].name, "m.Marker");
    }

    #[test]
    fn test_unattached_doc_block_is_dropped() {
        let source = "\
/// >>> 1 + 1
/// 2

// not an item
let x = 1;
";
        let mut finder = DocTestFinder::new();
        let tests = finder.find(&module("m", source));
        assert!(tests.is_empty());
    }

    #[test]
    fn test_doc_block_without_examples_is_kept() {
        let source = "\
/// Just prose, no examples.
fn documented() {}
";
        let mut finder = DocTestFinder::new();
        let tests = finder.find(&module("m", source));
        assert_eq!(tests.len(), 1);
        assert_eq!(tests[0].name, "m.documented");
        assert!(tests[0].examples.is_empty());
    }

    #[test]
    fn test_continuation_lines() {
        let source = "\
/// >>> total = 1 +
/// ...     2 +
/// ...     3
/// >>> total
/// 6
fn sum() {}
";
        let mut finder = DocTestFinder::new();
        let tests = finder.find(&module("m", source));
        assert_eq!(tests[0].examples.len(), 2);
        // Indentation after the continuation prompt is preserved.
        assert_eq!(tests[0].examples[0].source, "total = 1 +\n    2 +\n    3");
    }

    #[test]
    fn test_want_ends_at_blank_line() {
        let source = "\
/// >>> print('a')
/// a
///
/// Prose after the example.
fn f() {}
";
        let mut finder = DocTestFinder::new();
        let tests = finder.find(&module("m", source));
        assert_eq!(tests[0].examples.len(), 1);
        assert_eq!(tests[0].examples[0].want, "a");
    }

    #[test]
    fn test_multiline_want() {
        let source = "\
/// >>> print('a'); print('b')
/// a
/// b
fn f() {}
";
        let mut finder = DocTestFinder::new();
        let tests = finder.find(&module("m", source));
        assert_eq!(tests[0].examples[0].want, "a\nb");
    }

    #[test]
    fn test_ids_are_unique_across_modules() {
        let mut finder = DocTestFinder::new();
        let a = finder.find(&module("a", "//! >>> 1\n//! 1\n"));
        let b = finder.find(&module("b", "//! >>> 2\n//! 2\n"));
        assert_ne!(a[0].id, b[0].id);
    }

    #[test]
    fn test_line_numbers_point_at_prompts() {
        let source = "\
// leading comment

/// Docs.
///
/// >>> 1 + 1
/// 2
fn f() {}
";
        let mut finder = DocTestFinder::new();
        let tests = finder.find(&module("m", source));
        // Doc block starts on file line 3; prompt offset 2 -> file line 5.
        assert_eq!(tests[0].lineno, 3);
        assert_eq!(tests[0].examples[0].lineno, 2);
        assert_eq!(tests[0].lineno + tests[0].examples[0].lineno, 5);
    }
}
