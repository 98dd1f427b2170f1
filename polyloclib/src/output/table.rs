//! Table-ready data structures for human-oriented output.
//!
//! `LOCTable` is a presentation-only projection of a [`Report`]: rows are
//! already sorted and counted, this module only turns numbers into strings
//! and lays them out as text, CSV or Markdown.

use serde::{Deserialize, Serialize};

use crate::data::stats::{Locs, Report};

/// Name columns are never narrower or wider than this.
const MIN_NAME_WIDTH: usize = 12;
const MAX_NAME_WIDTH: usize = 60;
const MIN_CELL_WIDTH: usize = 10;

/// A single row in the table (data row or footer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// Row label (language name, file path, "Total (N files)")
    pub label: String,
    /// Values for each column after the label
    pub values: Vec<String>,
}

/// Table-ready LOC data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LOCTable {
    /// Optional title, e.g. the scanned root and branch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Column headers: [label_header, ...value headers]
    pub headers: Vec<String>,
    /// Data rows
    pub rows: Vec<TableRow>,
    /// Summary/footer row
    pub footer: TableRow,
}

fn count_values(locs: &Locs) -> [String; 4] {
    [
        locs.total().to_string(),
        locs.blank.to_string(),
        locs.comments.to_string(),
        locs.code.to_string(),
    ]
}

impl LOCTable {
    /// Build the table for a report. Per-file reports get one row per file,
    /// others one row per language.
    pub fn from_report(report: &Report) -> Self {
        let (headers, rows, footer_values) = if report.per_file {
            let rows: Vec<TableRow> = report
                .files
                .iter()
                .map(|file| {
                    let mut values = vec![file.language.clone()];
                    values.extend(count_values(&file.stats));
                    TableRow {
                        label: file.path.clone(),
                        values,
                    }
                })
                .collect();
            let mut footer = vec![String::new()];
            footer.extend(count_values(&report.total));
            (["File", "Language"], rows, footer)
        } else {
            let rows: Vec<TableRow> = report
                .languages
                .iter()
                .map(|lang| {
                    let mut values = vec![lang.file_count.to_string()];
                    values.extend(count_values(&lang.stats));
                    TableRow {
                        label: lang.language.clone(),
                        values,
                    }
                })
                .collect();
            let mut footer = vec![report.file_count.to_string()];
            footer.extend(count_values(&report.total));
            (["Language", "Files"], rows, footer)
        };

        let headers = headers
            .into_iter()
            .chain(["Lines", "Blank", "Comment", "Code"])
            .map(String::from)
            .collect();

        let title = match &report.branch {
            Some(branch) => format!("{} ({})", report.root.display(), branch),
            None => report.root.display().to_string(),
        };

        LOCTable {
            title: Some(title),
            headers,
            rows,
            footer: TableRow {
                label: format!("Total ({} files)", report.file_count),
                values: footer_values,
            },
        }
    }

    /// Padded plain-text table: left-aligned names, right-aligned values.
    pub fn to_text(&self) -> String {
        let name_width = self
            .rows
            .iter()
            .map(|r| r.label.chars().count())
            .chain([self.headers[0].len(), self.footer.label.len()])
            .max()
            .unwrap_or(0)
            .saturating_add(2)
            .clamp(MIN_NAME_WIDTH, MAX_NAME_WIDTH);
        let cell_width = self
            .rows
            .iter()
            .chain(std::iter::once(&self.footer))
            .flat_map(|r| r.values.iter().map(|v| v.chars().count()))
            .chain(self.headers.iter().skip(1).map(|h| h.len()))
            .max()
            .unwrap_or(0)
            .saturating_add(1)
            .max(MIN_CELL_WIDTH);

        let line = |label: &str, values: &[String]| -> String {
            let mut out = format!(
                "{:<width$}",
                truncate_name(label, name_width - 2),
                width = name_width
            );
            for value in values {
                out.push_str(&format!(" {:>width$}", value, width = cell_width));
            }
            out.trim_end().to_string()
        };
        let separator = "-".repeat(name_width + (cell_width + 1) * (self.headers.len() - 1));

        let mut output = String::new();
        if let Some(title) = &self.title {
            output.push_str(title);
            output.push('\n');
        }
        output.push_str(&separator);
        output.push('\n');
        output.push_str(&line(&self.headers[0], &self.headers[1..]));
        output.push('\n');
        output.push_str(&separator);
        output.push('\n');
        for row in &self.rows {
            output.push_str(&line(&row.label, &row.values));
            output.push('\n');
        }
        output.push_str(&separator);
        output.push('\n');
        output.push_str(&line(&self.footer.label, &self.footer.values));
        output.push('\n');
        output
    }

    /// CSV with a lowercase header row and a final `total` row.
    pub fn to_csv(&self) -> String {
        let mut output = self
            .headers
            .iter()
            .map(|h| h.to_lowercase())
            .collect::<Vec<_>>()
            .join(",");
        output.push('\n');

        let row = |label: &str, values: &[String]| -> String {
            let mut out = csv_field(label);
            for value in values {
                out.push(',');
                out.push_str(&csv_field(value));
            }
            out.push('\n');
            out
        };

        for r in &self.rows {
            output.push_str(&row(&r.label, &r.values));
        }
        output.push_str(&row("total", &self.footer.values));
        output
    }

    /// GitHub-flavoured Markdown table with a bold footer.
    pub fn to_markdown(&self) -> String {
        let mut output = String::new();
        if let Some(title) = &self.title {
            output.push_str(&format!("### {}\n\n", markdown_cell(title)));
        }

        output.push_str(&format!("| {} |\n", self.headers.join(" | ")));
        let alignment: Vec<&str> = self
            .headers
            .iter()
            .enumerate()
            .map(|(idx, _)| if idx == 0 || self.is_text_column(idx) { ":---" } else { "---:" })
            .collect();
        output.push_str(&format!("| {} |\n", alignment.join(" | ")));

        for row in &self.rows {
            let cells: Vec<String> = std::iter::once(&row.label)
                .chain(&row.values)
                .map(|c| markdown_cell(c))
                .collect();
            output.push_str(&format!("| {} |\n", cells.join(" | ")));
        }

        let footer: Vec<String> = std::iter::once(&self.footer.label)
            .chain(&self.footer.values)
            .map(|c| {
                if c.is_empty() {
                    String::new()
                } else {
                    format!("**{}**", markdown_cell(c))
                }
            })
            .collect();
        output.push_str(&format!("| {} |\n", footer.join(" | ")));
        output
    }

    /// The `Language` column of a per-file table holds text.
    fn is_text_column(&self, idx: usize) -> bool {
        self.headers.get(idx).is_some_and(|h| h == "Language")
    }
}

/// Truncate a name to fit within max_len, adding ".." prefix if needed
fn truncate_name(name: &str, max_len: usize) -> String {
    let len = name.chars().count();
    if len > max_len {
        let tail: String = name.chars().skip(len - max_len + 2).collect();
        format!("..{}", tail)
    } else {
        name.to_string()
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn markdown_cell(value: &str) -> String {
    value.replace('|', "\\|")
}
