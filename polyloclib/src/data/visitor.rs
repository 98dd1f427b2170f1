//! Line classifier.
//!
//! Every physical line is classified as blank, comment, or code according to
//! the lexical rules of its [`LanguageDef`]. The classifier is a reducer over
//! lines: [`classify_line`] takes the scan state left by the previous line and
//! returns the state for the next one along with the line's [`LineKind`]. No
//! other state is carried between lines, so a grammar can be exercised one line
//! at a time.
//!
//! A line counts as code if anything code-bearing appears on it, even when it
//! also holds a comment (`x = 1 // note` is code). Otherwise it is a comment
//! if a comment token or an open block comment touches it, and blank if
//! neither applies.

use log::warn;

use super::languages::LanguageDef;
use super::stats::{LineKind, Locs};

/// Lexical state carried from one line to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    /// Outside comments and strings
    #[default]
    Code,
    /// Inside the block comment pair at index `pair`, `depth` levels deep
    InBlockComment { pair: usize, depth: u32 },
    /// Inside the string opened by the quote at index `quote`
    InString { quote: usize },
}

/// Tracks what kind of content has been seen on the current line.
#[derive(Default, Debug, Copy, Clone)]
struct LineContext {
    has_code: bool,
    has_comment: bool,
}

impl LineContext {
    fn kind(&self) -> LineKind {
        if self.has_code {
            LineKind::Code
        } else if self.has_comment {
            LineKind::Comment
        } else {
            LineKind::Blank
        }
    }
}

/// Classify one line given the state left by the previous line.
///
/// `line` must not contain the terminating newline.
pub fn classify_line(language: &LanguageDef, state: ScanState, line: &str) -> (ScanState, LineKind) {
    let mut line_context = LineContext::default();
    match state {
        ScanState::Code if line.trim().is_empty() => return (state, LineKind::Blank),
        ScanState::Code => {}
        ScanState::InBlockComment { .. } => line_context.has_comment = true,
        ScanState::InString { .. } => line_context.has_code = true,
    }

    let mut state = state;
    let mut pos = 0;

    while let Some(next_char) = line[pos..].chars().next() {
        let rest = &line[pos..];
        match state {
            ScanState::Code => {
                if let Some(len) = language.match_char_literal(rest) {
                    line_context.has_code = true;
                    pos += len;
                } else if let Some(quote) = language.match_quote(rest) {
                    line_context.has_code = true;
                    state = ScanState::InString { quote };
                    pos += language.quotes[quote].open.len();
                } else if let Some(pair) = language.match_block_open(rest) {
                    line_context.has_comment = true;
                    state = ScanState::InBlockComment { pair, depth: 1 };
                    pos += language.block_comments[pair].open.len();
                } else if language.match_line_comment(rest) {
                    line_context.has_comment = true;
                    break;
                } else {
                    if !next_char.is_whitespace() {
                        line_context.has_code = true;
                    }
                    pos += next_char.len_utf8();
                }
            }
            ScanState::InString { quote } => {
                let q = &language.quotes[quote];
                if q.escape == Some(next_char) {
                    pos += next_char.len_utf8();
                    if let Some(escaped) = line[pos..].chars().next() {
                        pos += escaped.len_utf8();
                    }
                } else if rest.starts_with(q.close.as_str()) {
                    state = ScanState::Code;
                    pos += q.close.len();
                } else {
                    pos += next_char.len_utf8();
                }
            }
            ScanState::InBlockComment { pair, depth } => {
                let block = &language.block_comments[pair];
                if rest.starts_with(block.close.as_str()) {
                    state = if depth <= 1 {
                        ScanState::Code
                    } else {
                        ScanState::InBlockComment {
                            pair,
                            depth: depth - 1,
                        }
                    };
                    pos += block.close.len();
                } else if block.nested && rest.starts_with(block.open.as_str()) {
                    state = ScanState::InBlockComment {
                        pair,
                        depth: depth + 1,
                    };
                    pos += block.open.len();
                } else {
                    pos += next_char.len_utf8();
                }
            }
        }
    }

    // Single-line literals close implicitly at the end of the line.
    if let ScanState::InString { quote } = state {
        if !language.quotes[quote].multiline {
            state = ScanState::Code;
        }
    }

    (state, line_context.kind())
}

/// A visitor that feeds the lines of one file through [`classify_line`].
pub struct Visitor<'a> {
    language: &'a LanguageDef,
    label: &'a str,
    state: ScanState,
    stats: Locs,
    curr_line_no: usize,
    debug: bool,
}

impl<'a> Visitor<'a> {
    /// Create a visitor. `label` names the file in log messages.
    pub fn new(language: &'a LanguageDef, label: &'a str) -> Self {
        Self {
            language,
            label,
            state: ScanState::Code,
            stats: Locs::new(),
            curr_line_no: 0,
            debug: false,
        }
    }

    /// Print every classified line to stderr.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Classify the next physical line.
    pub fn visit_line(&mut self, line: &str) -> LineKind {
        self.curr_line_no += 1;

        let kind = if self.curr_line_no == 1 && self.language.is_shebang(line) {
            LineKind::Comment
        } else {
            let (state, kind) = classify_line(self.language, self.state, line);
            self.state = state;
            kind
        };

        if self.debug {
            eprintln!("{}: {:?}: {}", self.curr_line_no, kind, line);
        }

        self.stats.record(kind);
        kind
    }

    /// Visit every line of `source`.
    pub fn visit_source(&mut self, source: &str) {
        for line in source.lines() {
            self.visit_line(line);
        }
    }

    /// Current lexical state.
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Finish the file and return its counts.
    ///
    /// An unterminated block comment or string is reported as a warning; the
    /// lines it covered are already counted under the open state.
    pub fn finish(self) -> Locs {
        match self.state {
            ScanState::Code => {}
            ScanState::InBlockComment { .. } => {
                warn!(
                    "{}: unterminated block comment at end of file",
                    self.label
                );
            }
            ScanState::InString { .. } => {
                warn!("{}: unterminated string at end of file", self.label);
            }
        }
        self.stats
    }
}

/// Classify source text and return its line counts.
///
/// # Example
///
/// ```rust
/// use polyloclib::{parse_string, LanguageRegistry};
///
/// let registry = LanguageRegistry::builtin();
/// let c = registry.by_name("C").unwrap();
///
/// let stats = parse_string("// header comment\nint main() { return 0; } // trailing\n", c);
/// assert_eq!(stats.comments, 1);
/// assert_eq!(stats.code, 1);
/// ```
pub fn parse_string(source: &str, language: &LanguageDef) -> Locs {
    let mut visitor = Visitor::new(language, "<string>");
    visitor.visit_source(source);
    visitor.finish()
}
