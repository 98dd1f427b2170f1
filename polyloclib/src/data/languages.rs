//! Language registry: lexical rules per language.
//!
//! A [`LanguageDef`] describes just enough of a language's lexical grammar to
//! tell comments from code: line-comment tokens, block-comment delimiter pairs
//! (optionally nesting) and string quotes (with an escape character and a flag
//! telling whether the literal may span several lines).
//!
//! The [`LanguageRegistry`] maps file extensions and exact file names to those
//! definitions. It is built once, never mutated during a scan, and passed by
//! reference to every worker.

use std::collections::HashMap;
use std::path::Path;

/// A block comment delimiter pair such as `/*` … `*/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockComment {
    pub open: String,
    pub close: String,
    /// Whether an `open` token inside the comment starts a nested comment
    pub nested: bool,
}

/// A string literal delimiter. Unless built with [`Quote::closed_by`], the
/// same token opens and closes the literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub open: String,
    pub close: String,
    /// Character that makes the following character literal (usually `\`)
    pub escape: Option<char>,
    /// Whether the literal may continue past the end of a line
    pub multiline: bool,
}

impl Quote {
    /// Single-line quote with `\` escapes.
    pub fn escaped(delimiter: &str) -> Self {
        Self {
            open: delimiter.to_string(),
            close: delimiter.to_string(),
            escape: Some('\\'),
            multiline: false,
        }
    }

    /// Single-line quote without any escape character.
    pub fn raw(delimiter: &str) -> Self {
        Self {
            open: delimiter.to_string(),
            close: delimiter.to_string(),
            escape: None,
            multiline: false,
        }
    }

    /// Use a closing token different from the opening one (`r#"` … `"#`).
    pub fn closed_by(mut self, close: &str) -> Self {
        self.close = close.to_string();
        self
    }

    /// Allow the literal to span multiple lines.
    pub fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    /// Replace the escape character.
    pub fn with_escape(mut self, escape: char) -> Self {
        self.escape = Some(escape);
        self
    }
}

/// Longest escape body accepted in a char literal (`\u{10FFFF}`).
const MAX_CHAR_ESCAPE_LEN: usize = 10;

/// Byte length of the char literal at the start of `rest`, if there is one.
///
/// `'x'`, `'\''` and `'\u{1F600}'` are literals; `'a` in `&'a str` is not.
fn char_literal_len(rest: &str) -> Option<usize> {
    let body = rest.strip_prefix('\'')?;
    let mut chars = body.char_indices();
    let (_, first) = chars.next()?;

    match first {
        '\'' => None,
        '\\' => {
            let (_, escaped) = chars.next()?;
            if escaped == '\'' {
                let (idx, c) = chars.next()?;
                return (c == '\'').then_some(1 + idx + 1);
            }
            chars
                .take(MAX_CHAR_ESCAPE_LEN)
                .find(|&(_, c)| c == '\'')
                .map(|(idx, _)| 1 + idx + 1)
        }
        _ => {
            let (idx, c) = chars.next()?;
            (c == '\'').then_some(1 + idx + 1)
        }
    }
}

/// Immutable lexical rules for one recognized language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageDef {
    pub name: String,
    /// Extensions without the leading dot
    pub extensions: Vec<String>,
    /// Exact file names for extensionless conventions (`Makefile`, `Dockerfile`)
    pub filenames: Vec<String>,
    /// Whether extensions must match with exact case
    pub case_sensitive: bool,
    /// Line comment tokens, in priority order
    pub line_comments: Vec<String>,
    /// Block comment pairs, in priority order
    pub block_comments: Vec<BlockComment>,
    /// String quotes, in priority order (longer delimiters first)
    pub quotes: Vec<Quote>,
    /// Whether `'x'` char literals are recognized (and `'a` lifetimes are code)
    pub char_literals: bool,
    /// First-line prefixes that look like a shebang but are code (`#![`)
    pub shebang_exceptions: Vec<String>,
}

impl LanguageDef {
    /// Create a language with no extensions and no lexical rules.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            extensions: Vec::new(),
            filenames: Vec::new(),
            case_sensitive: false,
            line_comments: Vec::new(),
            block_comments: Vec::new(),
            quotes: Vec::new(),
            char_literals: false,
            shebang_exceptions: Vec::new(),
        }
    }

    pub fn extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions
            .extend(extensions.iter().map(|e| e.trim_start_matches('.').to_string()));
        self
    }

    pub fn filenames(mut self, filenames: &[&str]) -> Self {
        self.filenames
            .extend(filenames.iter().map(|f| f.to_string()));
        self
    }

    /// Require extensions to match with exact case.
    pub fn case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }

    pub fn line_comments(mut self, tokens: &[&str]) -> Self {
        self.line_comments
            .extend(tokens.iter().map(|t| t.to_string()));
        self
    }

    /// Add a non-nesting block comment pair.
    pub fn block_comment(mut self, open: &str, close: &str) -> Self {
        self.block_comments.push(BlockComment {
            open: open.to_string(),
            close: close.to_string(),
            nested: false,
        });
        self
    }

    /// Add a nesting block comment pair.
    pub fn nested_block_comment(mut self, open: &str, close: &str) -> Self {
        self.block_comments.push(BlockComment {
            open: open.to_string(),
            close: close.to_string(),
            nested: true,
        });
        self
    }

    pub fn quote(mut self, quote: Quote) -> Self {
        self.quotes.push(quote);
        self
    }

    /// Recognize Rust-style char literals.
    pub fn char_literals(mut self) -> Self {
        self.char_literals = true;
        self
    }

    /// A first line starting with `prefix` is code even though it starts
    /// with `#!`.
    pub fn shebang_exception(mut self, prefix: &str) -> Self {
        self.shebang_exceptions.push(prefix.to_string());
        self
    }

    /// Whether the first line of a file is an interpreter directive.
    pub fn is_shebang(&self, line: &str) -> bool {
        line.starts_with("#!")
            && !self
                .shebang_exceptions
                .iter()
                .any(|prefix| line.starts_with(prefix.as_str()))
    }

    /// `"` and `'` with backslash escapes, single line.
    fn c_quotes(self) -> Self {
        self.quote(Quote::escaped("\"")).quote(Quote::escaped("'"))
    }

    /// `//` and `/* */`.
    fn c_comments(self) -> Self {
        self.line_comments(&["//"]).block_comment("/*", "*/")
    }

    /// First quote whose opening token starts `rest`.
    pub(crate) fn match_quote(&self, rest: &str) -> Option<usize> {
        self.quotes
            .iter()
            .position(|q| rest.starts_with(q.open.as_str()))
    }

    /// Length of a char literal starting `rest`, for languages that have them.
    pub(crate) fn match_char_literal(&self, rest: &str) -> Option<usize> {
        if !self.char_literals {
            return None;
        }
        char_literal_len(rest)
    }

    /// First block comment whose open token starts `rest`.
    pub(crate) fn match_block_open(&self, rest: &str) -> Option<usize> {
        self.block_comments
            .iter()
            .position(|b| rest.starts_with(b.open.as_str()))
    }

    pub(crate) fn match_line_comment(&self, rest: &str) -> bool {
        self.line_comments
            .iter()
            .any(|t| rest.starts_with(t.as_str()))
    }
}

/// Lookup table from file names to language definitions.
#[derive(Debug, Clone, Default)]
pub struct LanguageRegistry {
    languages: Vec<LanguageDef>,
    exact_extensions: HashMap<String, usize>,
    folded_extensions: HashMap<String, usize>,
    filenames: HashMap<String, usize>,
}

impl LanguageRegistry {
    /// Create a registry with no languages.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register a language. Later registrations win on conflicting keys.
    pub fn register(&mut self, language: LanguageDef) {
        let idx = self.languages.len();
        for ext in &language.extensions {
            if language.case_sensitive {
                self.exact_extensions.insert(ext.clone(), idx);
            } else {
                self.folded_extensions.insert(ext.to_lowercase(), idx);
            }
        }
        for name in &language.filenames {
            self.filenames.insert(name.clone(), idx);
        }
        self.languages.push(language);
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, language: LanguageDef) -> Self {
        self.register(language);
        self
    }

    /// Resolve the language of a file from its name.
    ///
    /// Matches by extension first, then by exact file name. `None` means the
    /// file should be skipped.
    pub fn language_for(&self, file_name: &str) -> Option<&LanguageDef> {
        let path = Path::new(file_name);
        let by_extension = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|ext| {
                self.exact_extensions
                    .get(ext)
                    .or_else(|| self.folded_extensions.get(&ext.to_lowercase()))
            });

        let idx = by_extension.or_else(|| {
            path.file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| self.filenames.get(n))
        })?;

        self.languages.get(*idx)
    }

    /// Look up a language by its display name.
    pub fn by_name(&self, name: &str) -> Option<&LanguageDef> {
        self.languages.iter().find(|l| l.name == name)
    }

    pub fn all(&self) -> &[LanguageDef] {
        &self.languages
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// The built-in language table.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for language in builtin_languages() {
            registry.register(language);
        }
        registry
    }
}

fn hash_language(name: &str, extensions: &[&str]) -> LanguageDef {
    LanguageDef::new(name)
        .extensions(extensions)
        .line_comments(&["#"])
        .c_quotes()
}

fn builtin_languages() -> Vec<LanguageDef> {
    vec![
        LanguageDef::new("C")
            .extensions(&["c", "h"])
            .c_comments()
            .c_quotes(),
        LanguageDef::new("C++")
            .extensions(&["cpp", "cc", "cxx", "c++", "hpp", "hh", "hxx", "h++", "ino"])
            .c_comments()
            .c_quotes(),
        LanguageDef::new("C#")
            .extensions(&["cs", "csx"])
            .c_comments()
            .c_quotes(),
        LanguageDef::new("Objective-C")
            .extensions(&["m", "mm"])
            .c_comments()
            .c_quotes(),
        LanguageDef::new("Java")
            .extensions(&["java"])
            .c_comments()
            .quote(Quote::escaped("\"\"\"").multiline())
            .c_quotes(),
        LanguageDef::new("Kotlin")
            .extensions(&["kt", "kts"])
            .line_comments(&["//"])
            .nested_block_comment("/*", "*/")
            .quote(Quote::raw("\"\"\"").multiline())
            .c_quotes(),
        LanguageDef::new("Scala")
            .extensions(&["scala", "sc"])
            .line_comments(&["//"])
            .nested_block_comment("/*", "*/")
            .quote(Quote::raw("\"\"\"").multiline())
            .c_quotes(),
        LanguageDef::new("Groovy")
            .extensions(&["groovy", "gradle"])
            .c_comments()
            .quote(Quote::escaped("\"\"\"").multiline())
            .quote(Quote::escaped("'''").multiline())
            .c_quotes(),
        LanguageDef::new("Go")
            .extensions(&["go"])
            .c_comments()
            .quote(Quote::escaped("\""))
            .quote(Quote::escaped("'"))
            .quote(Quote::raw("`").multiline()),
        LanguageDef::new("Rust")
            .extensions(&["rs"])
            .line_comments(&["//"])
            .nested_block_comment("/*", "*/")
            .quote(Quote::raw("r###\"").closed_by("\"###").multiline())
            .quote(Quote::raw("r##\"").closed_by("\"##").multiline())
            .quote(Quote::raw("r#\"").closed_by("\"#").multiline())
            .quote(Quote::raw("r\"").multiline())
            .quote(Quote::escaped("\"").multiline())
            .char_literals()
            .shebang_exception("#!["),
        LanguageDef::new("Swift")
            .extensions(&["swift"])
            .line_comments(&["//"])
            .nested_block_comment("/*", "*/")
            .quote(Quote::escaped("\"\"\"").multiline())
            .quote(Quote::escaped("\"")),
        LanguageDef::new("Dart")
            .extensions(&["dart"])
            .c_comments()
            .quote(Quote::escaped("\"\"\"").multiline())
            .quote(Quote::escaped("'''").multiline())
            .c_quotes(),
        LanguageDef::new("Zig")
            .extensions(&["zig"])
            .line_comments(&["//"])
            .c_quotes(),
        LanguageDef::new("JavaScript")
            .extensions(&["js", "mjs", "cjs", "jsx"])
            .c_comments()
            .c_quotes()
            .quote(Quote::escaped("`").multiline()),
        LanguageDef::new("TypeScript")
            .extensions(&["ts", "tsx", "mts", "cts"])
            .c_comments()
            .c_quotes()
            .quote(Quote::escaped("`").multiline()),
        LanguageDef::new("PHP")
            .extensions(&["php", "phtml"])
            .line_comments(&["//", "#"])
            .block_comment("/*", "*/")
            .c_quotes(),
        LanguageDef::new("Python")
            .extensions(&["py", "pyw", "pyi"])
            .line_comments(&["#"])
            .quote(Quote::escaped("\"\"\"").multiline())
            .quote(Quote::escaped("'''").multiline())
            .c_quotes(),
        LanguageDef::new("Ruby")
            .extensions(&["rb", "rake", "gemspec"])
            .filenames(&["Rakefile", "Gemfile"])
            .line_comments(&["#"])
            .c_quotes(),
        hash_language("Perl", &["pl", "pm"]),
        LanguageDef::new("Shell")
            .extensions(&["sh", "bash", "zsh", "ksh"])
            .filenames(&[".bashrc", ".bash_profile", ".zshrc", ".profile"])
            .line_comments(&["#"])
            .quote(Quote::escaped("\"").multiline())
            .quote(Quote::raw("'").multiline()),
        LanguageDef::new("PowerShell")
            .extensions(&["ps1", "psm1", "psd1"])
            .line_comments(&["#"])
            .block_comment("<#", "#>")
            .quote(Quote::raw("\"").with_escape('`'))
            .quote(Quote::raw("'")),
        LanguageDef::new("Lua")
            .extensions(&["lua"])
            .line_comments(&["--"])
            .block_comment("--[[", "]]")
            .c_quotes(),
        LanguageDef::new("SQL")
            .extensions(&["sql"])
            .line_comments(&["--"])
            .block_comment("/*", "*/")
            .quote(Quote::raw("'"))
            .quote(Quote::raw("\"")),
        LanguageDef::new("Haskell")
            .extensions(&["hs", "lhs"])
            .line_comments(&["--"])
            .nested_block_comment("{-", "-}")
            .quote(Quote::escaped("\"")),
        LanguageDef::new("OCaml")
            .extensions(&["ml", "mli"])
            .nested_block_comment("(*", "*)")
            .quote(Quote::escaped("\"").multiline()),
        LanguageDef::new("F#")
            .extensions(&["fs", "fsi", "fsx"])
            .line_comments(&["//"])
            .nested_block_comment("(*", "*)")
            .quote(Quote::escaped("\"")),
        LanguageDef::new("Elixir")
            .extensions(&["ex", "exs"])
            .line_comments(&["#"])
            .quote(Quote::escaped("\"\"\"").multiline())
            .quote(Quote::escaped("\"")),
        LanguageDef::new("Erlang")
            .extensions(&["erl", "hrl"])
            .line_comments(&["%"])
            .quote(Quote::escaped("\"")),
        LanguageDef::new("Clojure")
            .extensions(&["clj", "cljs", "cljc", "edn"])
            .line_comments(&[";"])
            .quote(Quote::escaped("\"").multiline()),
        LanguageDef::new("Lisp")
            .extensions(&["lisp", "lsp", "el"])
            .line_comments(&[";"])
            .nested_block_comment("#|", "|#")
            .quote(Quote::escaped("\"").multiline()),
        LanguageDef::new("Julia")
            .extensions(&["jl"])
            .line_comments(&["#"])
            .nested_block_comment("#=", "=#")
            .quote(Quote::escaped("\"\"\"").multiline())
            .quote(Quote::escaped("\"")),
        hash_language("R", &["r"]),
        LanguageDef::new("Visual Basic")
            .extensions(&["vb", "vbs"])
            .line_comments(&["'"])
            .quote(Quote::raw("\"")),
        LanguageDef::new("Assembly")
            .extensions(&["asm", "nasm"])
            .line_comments(&[";"])
            .c_quotes(),
        LanguageDef::new("HTML")
            .extensions(&["html", "htm", "xhtml"])
            .block_comment("<!--", "-->"),
        LanguageDef::new("XML")
            .extensions(&["xml", "xsd", "xsl", "xslt", "svg", "plist"])
            .block_comment("<!--", "-->"),
        LanguageDef::new("CSS")
            .extensions(&["css"])
            .block_comment("/*", "*/")
            .c_quotes(),
        LanguageDef::new("SCSS")
            .extensions(&["scss", "less"])
            .c_comments()
            .c_quotes(),
        LanguageDef::new("YAML")
            .extensions(&["yaml", "yml"])
            .line_comments(&["#"])
            .quote(Quote::escaped("\""))
            .quote(Quote::raw("'")),
        LanguageDef::new("TOML")
            .extensions(&["toml"])
            .line_comments(&["#"])
            .quote(Quote::escaped("\"\"\"").multiline())
            .quote(Quote::raw("'''").multiline())
            .quote(Quote::escaped("\""))
            .quote(Quote::raw("'")),
        LanguageDef::new("JSON")
            .extensions(&["json"])
            .quote(Quote::escaped("\"")),
        LanguageDef::new("Protocol Buffers")
            .extensions(&["proto"])
            .c_comments()
            .c_quotes(),
        LanguageDef::new("HCL")
            .extensions(&["tf", "tfvars", "hcl"])
            .line_comments(&["#", "//"])
            .block_comment("/*", "*/")
            .quote(Quote::escaped("\"")),
        LanguageDef::new("Markdown").extensions(&["md", "markdown"]),
        LanguageDef::new("Makefile")
            .extensions(&["mk", "mak"])
            .filenames(&["Makefile", "makefile", "GNUmakefile"])
            .line_comments(&["#"]),
        LanguageDef::new("Dockerfile")
            .extensions(&["dockerfile"])
            .filenames(&["Dockerfile", "Containerfile"])
            .line_comments(&["#"])
            .c_quotes(),
        LanguageDef::new("CMake")
            .extensions(&["cmake"])
            .filenames(&["CMakeLists.txt"])
            .line_comments(&["#"])
            .quote(Quote::escaped("\"").multiline()),
    ]
}
