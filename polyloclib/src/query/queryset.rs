//! Presentation ordering of report rows.
//!
//! Rows are sorted with a stable sort on the configured key. Ties on the key
//! are broken by the row's name ascending (language name for aggregate rows,
//! path for file rows), regardless of direction, so output is reproducible.

use std::cmp::Ordering as CmpOrdering;

use crate::data::stats::{FileRecord, LanguageAggregate, Report};

use super::options::{Ordering, SortDirection, SortKey};

/// A row that can be ordered by any [`SortKey`].
pub trait SortableRow {
    /// Name used for tie-breaking: language name or file path.
    fn tie_break(&self) -> &str;

    /// Language of the row, compared for [`SortKey::Language`].
    fn language(&self) -> &str;

    /// Numeric value for a count key.
    fn value(&self, key: SortKey) -> u64;
}

impl SortableRow for LanguageAggregate {
    fn tie_break(&self) -> &str {
        &self.language
    }

    fn language(&self) -> &str {
        &self.language
    }

    fn value(&self, key: SortKey) -> u64 {
        match key {
            SortKey::Language => 0,
            SortKey::FileCount => self.file_count,
            SortKey::TotalLines => self.stats.total(),
            SortKey::BlankLines => self.stats.blank,
            SortKey::CommentLines => self.stats.comments,
            SortKey::CodeLines => self.stats.code,
        }
    }
}

impl SortableRow for FileRecord {
    fn tie_break(&self) -> &str {
        &self.path
    }

    fn language(&self) -> &str {
        &self.language
    }

    fn value(&self, key: SortKey) -> u64 {
        match key {
            SortKey::Language => 0,
            SortKey::FileCount => 1,
            SortKey::TotalLines => self.stats.total(),
            SortKey::BlankLines => self.stats.blank,
            SortKey::CommentLines => self.stats.comments,
            SortKey::CodeLines => self.stats.code,
        }
    }
}

fn compare<T: SortableRow>(a: &T, b: &T, ordering: Ordering) -> CmpOrdering {
    let primary = match ordering.key {
        SortKey::Language => a.language().cmp(b.language()),
        key => a.value(key).cmp(&b.value(key)),
    };
    let primary = match ordering.direction {
        SortDirection::Ascending => primary,
        SortDirection::Descending => primary.reverse(),
    };
    primary.then_with(|| a.tie_break().cmp(b.tie_break()))
}

/// Sort rows in place by the given ordering.
pub fn sort_rows<T: SortableRow>(rows: &mut [T], ordering: Ordering) {
    rows.sort_by(|a, b| compare(a, b, ordering));
}

/// Put every row sequence of a report into presentation order.
pub fn sort_report(report: &mut Report, ordering: Ordering) {
    sort_rows(&mut report.languages, ordering);
    sort_rows(&mut report.files, ordering);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::stats::Locs;

    fn lang(name: &str, files: u64, blank: u64, comments: u64, code: u64) -> LanguageAggregate {
        LanguageAggregate {
            language: name.to_string(),
            file_count: files,
            stats: Locs {
                blank,
                comments,
                code,
            },
        }
    }

    fn names(rows: &[LanguageAggregate]) -> Vec<&str> {
        rows.iter().map(|r| r.language.as_str()).collect()
    }

    #[test]
    fn test_language_ascending() {
        let mut rows = vec![lang("Go", 1, 0, 0, 5), lang("C", 1, 0, 0, 3)];
        sort_rows(&mut rows, Ordering::by_language());
        assert_eq!(names(&rows), vec!["C", "Go"]);
    }

    #[test]
    fn test_language_descending() {
        let mut rows = vec![
            lang("C", 1, 0, 0, 3),
            lang("Rust", 1, 0, 0, 3),
            lang("Go", 1, 0, 0, 5),
        ];
        sort_rows(&mut rows, Ordering::by_language().descending());
        assert_eq!(names(&rows), vec!["Rust", "Go", "C"]);
    }

    #[test]
    fn test_code_descending_with_ties_by_name() {
        let mut rows = vec![
            lang("Python", 2, 0, 0, 10),
            lang("C", 1, 0, 0, 40),
            lang("Go", 3, 0, 0, 10),
            lang("Awk", 1, 0, 0, 10),
        ];
        sort_rows(&mut rows, Ordering::by_code());
        assert_eq!(names(&rows), vec!["C", "Awk", "Go", "Python"]);

        for pair in rows.windows(2) {
            assert!(pair[0].stats.code >= pair[1].stats.code);
        }
    }

    #[test]
    fn test_ties_ascending_in_both_directions() {
        let mut rows = vec![lang("Go", 1, 0, 0, 10), lang("C", 1, 0, 0, 10)];
        sort_rows(&mut rows, Ordering::by_code().ascending());
        assert_eq!(names(&rows), vec!["C", "Go"]);
        sort_rows(&mut rows, Ordering::by_code());
        assert_eq!(names(&rows), vec!["C", "Go"]);
    }

    #[test]
    fn test_file_count_and_totals() {
        let mut rows = vec![
            lang("Go", 3, 1, 1, 1),
            lang("C", 1, 10, 0, 0),
            lang("Rust", 2, 0, 0, 2),
        ];
        sort_rows(
            &mut rows,
            Ordering::new(SortKey::FileCount, SortDirection::Ascending),
        );
        assert_eq!(names(&rows), vec!["C", "Rust", "Go"]);

        sort_rows(&mut rows, Ordering::by_total());
        assert_eq!(names(&rows), vec!["C", "Go", "Rust"]);
    }

    #[test]
    fn test_file_rows_by_language_then_path() {
        let mut files = vec![
            FileRecord::new("src/b.go", "Go", Locs::new()),
            FileRecord::new("main.c", "C", Locs::new()),
            FileRecord::new("src/a.go", "Go", Locs::new()),
        ];
        sort_rows(&mut files, Ordering::by_language());
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["main.c", "src/a.go", "src/b.go"]);
    }

    #[test]
    fn test_sort_report_orders_both_sequences() {
        let mut report = Report::new("/root");
        report.languages = vec![lang("Go", 1, 0, 0, 1), lang("C", 1, 0, 0, 2)];
        report.files = vec![
            FileRecord::new(
                "x.go",
                "Go",
                Locs {
                    blank: 0,
                    comments: 0,
                    code: 1,
                },
            ),
            FileRecord::new(
                "y.c",
                "C",
                Locs {
                    blank: 0,
                    comments: 0,
                    code: 2,
                },
            ),
        ];

        sort_report(&mut report, Ordering::by_code());
        assert_eq!(names(&report.languages), vec!["C", "Go"]);
        assert_eq!(report.files[0].path, "y.c");
    }
}
