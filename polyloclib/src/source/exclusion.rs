//! `.clocignore`-style exclusion files.
//!
//! One entry per line. Blank lines and lines starting with `#` are ignored.
//! `*.log` and `.log` exclude an extension. Any other entry, including
//! `*.min.js` and `.github/`, is an exclude-path pattern.

use std::fs;
use std::path::Path;

use crate::error::PolylocError;
use crate::query::ScanConfig;
use crate::Result;

/// Parsed exclusion entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionList {
    /// Exclude-path patterns
    pub paths: Vec<String>,
    /// Extensions, without the dot
    pub extensions: Vec<String>,
}

impl ExclusionList {
    pub fn parse(text: &str) -> Self {
        let mut list = Self::default();

        for line in text.lines() {
            let entry = line.trim();
            if entry.is_empty() || entry.starts_with('#') {
                continue;
            }

            match extension_entry(entry) {
                Some(ext) => list.extensions.push(ext.to_string()),
                None => list.paths.push(entry.to_string()),
            }
        }
        list
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| PolylocError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.extensions.is_empty()
    }

    /// Add every entry to a configuration's filter.
    pub fn apply(&self, mut config: ScanConfig) -> Result<ScanConfig> {
        for pattern in &self.paths {
            config = config.exclude_path(pattern)?;
        }
        for ext in &self.extensions {
            config = config.exclude_extension(ext);
        }
        Ok(config)
    }
}

/// `*.log` and `.log` are extension entries; `*.min.js` and `.github/` are not.
fn extension_entry(entry: &str) -> Option<&str> {
    let ext = entry
        .strip_prefix("*.")
        .or_else(|| entry.strip_prefix('.'))?;
    let is_plain = !ext.is_empty()
        && ext
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '+');
    is_plain.then_some(ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = "\
# generated code
vendor
**/node_modules

*.log
.md
*.min.js
.github/
";

    #[test]
    fn test_parse() {
        let list = ExclusionList::parse(SAMPLE);

        assert_eq!(list.extensions, vec!["log", "md"]);
        assert_eq!(
            list.paths,
            vec!["vendor", "**/node_modules", "*.min.js", ".github/"]
        );
    }

    #[test]
    fn test_parse_empty() {
        assert!(ExclusionList::parse("# only comments\n\n").is_empty());
    }

    #[test]
    fn test_apply() {
        let config = ExclusionList::parse(SAMPLE)
            .apply(ScanConfig::new("."))
            .unwrap();

        let filter = &config.filter;
        assert!(!filter.is_eligible("vendor/x.go", Some("go")));
        assert!(!filter.is_eligible("web/node_modules/a.js", Some("js")));
        assert!(!filter.is_eligible("out.log", Some("log")));
        assert!(!filter.is_eligible("app.min.js", Some("js")));
        assert!(!filter.is_eligible(".github/workflows/ci.yml", Some("yml")));
        assert!(filter.is_eligible("app.js", Some("js")));
    }

    #[test]
    fn test_apply_invalid_glob() {
        let result = ExclusionList::parse("[broken\n").apply(ScanConfig::new("."));
        assert!(matches!(result, Err(PolylocError::InvalidGlob { .. })));
    }

    #[test]
    fn test_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".clocignore");
        fs::write(&path, SAMPLE).unwrap();

        let list = ExclusionList::from_file(&path).unwrap();
        assert_eq!(list.paths.len(), 4);

        let missing = ExclusionList::from_file(dir.path().join("nope"));
        assert!(matches!(missing, Err(PolylocError::FileRead { .. })));
    }
}
