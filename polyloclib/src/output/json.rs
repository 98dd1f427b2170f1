//! The canonical JSON report.
//!
//! Downstream tooling sums these documents across many runs, so field names,
//! nesting and field order are fixed:
//!
//! ```json
//! {
//!   "TotalFiles": 2,
//!   "TotalLines": 30,
//!   "TotalBlankLines": 4,
//!   "TotalComments": 6,
//!   "TotalCodeLines": 20,
//!   "Results": [
//!     { "Language": "Go", "Files": 1, "Lines": 18, "BlankLines": 2, "Comments": 4, "CodeLines": 12 }
//!   ]
//! }
//! ```
//!
//! In per-file mode each entry of `Results` is a file row with a leading
//! `File` field instead of `Files`.

use serde::{Deserialize, Serialize};

use crate::data::stats::{FileRecord, LanguageAggregate, Report};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JsonReport {
    pub total_files: u64,
    pub total_lines: u64,
    pub total_blank_lines: u64,
    pub total_comments: u64,
    pub total_code_lines: u64,
    pub results: JsonResults,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonResults {
    Languages(Vec<JsonLanguageRow>),
    Files(Vec<JsonFileRow>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JsonLanguageRow {
    pub language: String,
    pub files: u64,
    pub lines: u64,
    pub blank_lines: u64,
    pub comments: u64,
    pub code_lines: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JsonFileRow {
    pub file: String,
    pub language: String,
    pub lines: u64,
    pub blank_lines: u64,
    pub comments: u64,
    pub code_lines: u64,
}

impl From<&LanguageAggregate> for JsonLanguageRow {
    fn from(row: &LanguageAggregate) -> Self {
        Self {
            language: row.language.clone(),
            files: row.file_count,
            lines: row.stats.total(),
            blank_lines: row.stats.blank,
            comments: row.stats.comments,
            code_lines: row.stats.code,
        }
    }
}

impl From<&FileRecord> for JsonFileRow {
    fn from(row: &FileRecord) -> Self {
        Self {
            file: row.path.clone(),
            language: row.language.clone(),
            lines: row.stats.total(),
            blank_lines: row.stats.blank,
            comments: row.stats.comments,
            code_lines: row.stats.code,
        }
    }
}

impl From<&Report> for JsonReport {
    fn from(report: &Report) -> Self {
        let results = if report.per_file {
            JsonResults::Files(report.files.iter().map(JsonFileRow::from).collect())
        } else {
            JsonResults::Languages(report.languages.iter().map(JsonLanguageRow::from).collect())
        };

        Self {
            total_files: report.file_count,
            total_lines: report.total.total(),
            total_blank_lines: report.total.blank,
            total_comments: report.total.comments,
            total_code_lines: report.total.code,
            results,
        }
    }
}

/// Serialize a report to pretty-printed JSON, newline-terminated.
pub fn to_json(report: &Report) -> Result<String> {
    let mut body = serde_json::to_string_pretty(&JsonReport::from(report))?;
    body.push('\n');
    Ok(body)
}
