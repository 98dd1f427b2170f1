//! File eligibility from include/exclude configuration.
//!
//! Evaluation order, first match wins:
//!
//! 1. an exclude-path pattern matching the path (or one of its parent
//!    directories) rejects the file;
//! 2. a non-empty include-extension set accepts exactly its members;
//! 3. otherwise an extension in the exclude-extension set rejects the file;
//! 4. everything else is accepted.
//!
//! Exclude-path patterns are matched both as a path prefix (`vendor` excludes
//! `vendor/lib.go`) and as a glob (`**/generated/**`).

use std::collections::BTreeSet;

use glob::Pattern;

use crate::error::PolylocError;
use crate::Result;

/// A compiled exclude-path pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
    prefix: String,
    glob: Pattern,
}

impl PathPattern {
    /// Compile a pattern. Leading `./` and trailing `/` are ignored.
    pub fn new(pattern: &str) -> Result<Self> {
        let prefix = normalize_pattern(pattern);
        let glob = Pattern::new(&prefix).map_err(|e| PolylocError::InvalidGlob {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { prefix, glob })
    }

    /// The pattern as given, normalized.
    pub fn as_str(&self) -> &str {
        &self.prefix
    }

    /// Whether `relative_path` or any of its ancestors matches.
    pub fn matches(&self, relative_path: &str) -> bool {
        if self.prefix.is_empty() {
            return false;
        }
        if relative_path == self.prefix
            || relative_path
                .strip_prefix(self.prefix.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
        {
            return true;
        }

        ancestors(relative_path).any(|candidate| self.glob.matches(candidate))
    }
}

fn normalize_pattern(pattern: &str) -> String {
    let trimmed = pattern.trim();
    let trimmed = trimmed.strip_prefix("./").unwrap_or(trimmed);
    trimmed.trim_end_matches('/').replace('\\', "/")
}

/// `a/b/c.go` yields `a`, `a/b`, `a/b/c.go`.
fn ancestors(path: &str) -> impl Iterator<Item = &str> {
    path.match_indices('/')
        .map(move |(idx, _)| &path[..idx])
        .chain(std::iter::once(path))
}

/// Normalize an extension: drop the leading dot and lowercase it.
pub fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_lowercase()
}

/// Configuration for file filtering.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    /// Path patterns that always exclude
    pub exclude_paths: Vec<PathPattern>,
    /// Extensions to skip (ignored when `include_extensions` is non-empty)
    pub exclude_extensions: BTreeSet<String>,
    /// Extensions to keep; when non-empty nothing else is counted
    pub include_extensions: BTreeSet<String>,
}

impl FilterConfig {
    /// Create a new empty filter config (accepts everything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an exclude-path pattern.
    pub fn exclude_path(mut self, pattern: &str) -> Result<Self> {
        self.exclude_paths.push(PathPattern::new(pattern)?);
        Ok(self)
    }

    /// Add multiple exclude-path patterns.
    pub fn exclude_paths<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self> {
        for pattern in patterns {
            self = self.exclude_path(pattern.as_ref())?;
        }
        Ok(self)
    }

    /// Add an extension to the exclude set (`.md` and `md` are equivalent).
    pub fn exclude_extension(mut self, extension: &str) -> Self {
        let ext = normalize_extension(extension);
        if !ext.is_empty() {
            self.exclude_extensions.insert(ext);
        }
        self
    }

    /// Add an extension to the include set.
    pub fn include_extension(mut self, extension: &str) -> Self {
        let ext = normalize_extension(extension);
        if !ext.is_empty() {
            self.include_extensions.insert(ext);
        }
        self
    }

    /// Whether a relative path is excluded by any exclude-path pattern.
    ///
    /// Also used to prune whole directories during the walk.
    pub fn is_path_excluded(&self, relative_path: &str) -> bool {
        self.exclude_paths.iter().any(|p| p.matches(relative_path))
    }

    /// Decide whether a file is eligible for counting.
    ///
    /// `extension` is the file's extension without the dot, if any.
    pub fn is_eligible(&self, relative_path: &str, extension: Option<&str>) -> bool {
        if self.is_path_excluded(relative_path) {
            return false;
        }

        let ext = extension.map(normalize_extension);

        if !self.include_extensions.is_empty() {
            return ext.is_some_and(|e| self.include_extensions.contains(&e));
        }

        !ext.is_some_and(|e| self.exclude_extensions.contains(&e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_accepts_everything() {
        let filter = FilterConfig::new();

        assert!(filter.is_eligible("src/main.go", Some("go")));
        assert!(filter.is_eligible("Makefile", None));
    }

    #[test]
    fn test_exclude_path_prefix() {
        let filter = FilterConfig::new().exclude_path("vendor").unwrap();

        assert!(!filter.is_eligible("vendor/lib.go", Some("go")));
        assert!(!filter.is_eligible("vendor/a/b.go", Some("go")));
        assert!(filter.is_eligible("vendors/lib.go", Some("go")));
        assert!(filter.is_eligible("src/vendor.go", Some("go")));
    }

    #[test]
    fn test_exclude_path_normalization() {
        let filter = FilterConfig::new().exclude_path("./build/").unwrap();

        assert!(!filter.is_eligible("build/out.c", Some("c")));
        assert!(filter.is_eligible("src/build.c", Some("c")));
    }

    #[test]
    fn test_exclude_path_glob() {
        let filter = FilterConfig::new()
            .exclude_path("**/generated/**")
            .unwrap()
            .exclude_path("*.min.js")
            .unwrap();

        assert!(!filter.is_eligible("a/generated/x.rs", Some("rs")));
        assert!(!filter.is_eligible("app.min.js", Some("js")));
        assert!(filter.is_eligible("app.js", Some("js")));
    }

    #[test]
    fn test_glob_matches_directory_ancestor() {
        let filter = FilterConfig::new().exclude_path("**/node_modules").unwrap();

        assert!(!filter.is_eligible("web/node_modules/react/index.js", Some("js")));
        assert!(filter.is_path_excluded("web/node_modules"));
    }

    #[test]
    fn test_include_extensions_are_authoritative() {
        let filter = FilterConfig::new()
            .include_extension(".go")
            .exclude_extension("go");

        assert!(filter.is_eligible("main.go", Some("go")));
        assert!(!filter.is_eligible("README.md", Some("md")));
        assert!(!filter.is_eligible("Makefile", None));
    }

    #[test]
    fn test_exclude_path_beats_include_extension() {
        let filter = FilterConfig::new()
            .include_extension("go")
            .exclude_path("third_party")
            .unwrap();

        assert!(!filter.is_eligible("third_party/x.go", Some("go")));
        assert!(filter.is_eligible("cmd/x.go", Some("go")));
    }

    #[test]
    fn test_exclude_extensions() {
        let filter = FilterConfig::new()
            .exclude_extension(".md")
            .exclude_extension("JSON");

        assert!(!filter.is_eligible("README.md", Some("md")));
        assert!(!filter.is_eligible("data.json", Some("json")));
        assert!(!filter.is_eligible("DATA.JSON", Some("JSON")));
        assert!(filter.is_eligible("main.rs", Some("rs")));
        assert!(filter.is_eligible("Dockerfile", None));
    }

    #[test]
    fn test_invalid_glob_pattern() {
        let result = FilterConfig::new().exclude_path("[invalid");

        assert!(result.is_err());
        if let Err(PolylocError::InvalidGlob { pattern, .. }) = result {
            assert_eq!(pattern, "[invalid");
        } else {
            panic!("Expected InvalidGlob error");
        }
    }

    #[test]
    fn test_ancestors() {
        let parts: Vec<&str> = ancestors("a/b/c.go").collect();
        assert_eq!(parts, vec!["a", "a/b", "a/b/c.go"]);
    }
}
