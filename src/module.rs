//! Module resolution - mapping dotted module identifiers to source files
//!
//! A module identifier like `pkg.math` is resolved against an ordered list
//! of search roots to either `<root>/pkg/math.rs` or `<root>/pkg/math/mod.rs`.
//! The supplied roots are searched first, in order, then the current
//! directory.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// A module whose source has been loaded and is ready for example discovery
#[derive(Debug, Clone)]
pub struct LoadedModule {
    /// Dotted module name as given on the command line (extension stripped)
    pub name: String,
    /// Path of the resolved source file
    pub path: PathBuf,
    /// Full source text
    pub source: String,
}

/// Strip a trailing `.rs` suffix from a module argument.
///
/// Users often tab-complete file names; `pkg.math.rs` means `pkg.math`.
pub fn strip_extension(name: &str) -> &str {
    name.strip_suffix(".rs").unwrap_or(name)
}

/// Candidate file paths for a dotted module name under one root
fn candidates(root: &Path, name: &str) -> [PathBuf; 2] {
    let mut rel = PathBuf::new();
    for part in name.split('.') {
        rel.push(part);
    }
    [
        root.join(rel.with_extension("rs")),
        root.join(rel.join("mod.rs")),
    ]
}

/// Resolve a dotted module name against the search roots and load its source.
///
/// Returns [`Error::ModuleNotFound`] when no candidate file exists under any
/// root. A file that exists but cannot be read surfaces as an I/O error.
pub fn resolve(name: &str, roots: &[PathBuf]) -> Result<LoadedModule> {
    let mut search: Vec<&Path> = roots.iter().map(PathBuf::as_path).collect();
    search.push(Path::new("."));

    for root in search {
        for candidate in candidates(root, name) {
            if candidate.is_file() {
                let source = fs::read_to_string(&candidate)?;
                return Ok(LoadedModule {
                    name: name.to_string(),
                    path: candidate,
                    source,
                });
            }
        }
    }

    Err(Error::ModuleNotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("pkg.math.rs"), "pkg.math");
        assert_eq!(strip_extension("pkg.math"), "pkg.math");
        assert_eq!(strip_extension("math"), "math");
    }

    #[test]
    fn test_resolve_plain_file() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("pkg")).unwrap();
        fs::write(temp.path().join("pkg/math.rs"), "//! docs\n").unwrap();

        let module = resolve("pkg.math", &[temp.path().to_path_buf()]).unwrap();
        assert_eq!(module.name, "pkg.math");
        assert_eq!(module.source, "//! docs\n");
        assert!(module.path.ends_with("pkg/math.rs"));
    }

    #[test]
    fn test_resolve_mod_rs() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("pkg/math")).unwrap();
        fs::write(temp.path().join("pkg/math/mod.rs"), "//! docs\n").unwrap();

        let module = resolve("pkg.math", &[temp.path().to_path_buf()]).unwrap();
        assert!(module.path.ends_with("pkg/math/mod.rs"));
    }

    #[test]
    fn test_resolve_not_found() {
        let temp = TempDir::new().unwrap();
        let result = resolve("no.such.module", &[temp.path().to_path_buf()]);
        assert!(matches!(result, Err(Error::ModuleNotFound(name)) if name == "no.such.module"));
    }

    #[test]
    fn test_roots_searched_in_order() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(first.path().join("m.rs"), "//! first\n").unwrap();
        fs::write(second.path().join("m.rs"), "//! second\n").unwrap();

        let roots = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        let module = resolve("m", &roots).unwrap();
        assert_eq!(module.source, "//! first\n");
    }
}
