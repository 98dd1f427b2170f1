//! # polyloc
//!
//! A CLI tool for counting blank, comment and code lines in multi-language
//! source trees.
//!
//! ## Overview
//!
//! polyloc is built on top of polyloclib. It scans a directory, prints a
//! per-language summary table and writes the report to
//! `<output-path>/<output-name>.<ext>` in every requested format.
//!
//! ## Usage
//!
//! ```bash
//! # Count the current directory, write ./polyloc.json
//! polyloc .
//!
//! # Only Go files, one row per file, ordered by path
//! polyloc ./checkout --include-ext go --by-file --order-by-lang --order ASC
//!
//! # Skip vendored code and everything listed in .clocignore
//! polyloc . --exclude-path vendor --exclude-from .clocignore
//!
//! # Write JSON and Markdown reports into ./reports
//! polyloc . --output-path reports --output-name Result_api_main --report-formats json,md
//! ```

mod logger;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use console::style;
use log::{debug, info};
use polyloclib::query::DEFAULT_OUTPUT_NAME;
use polyloclib::{
    render, run, ExclusionList, LanguageRegistry, ReportFormat, ScanConfig, SortSelectors,
};

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("polyloc")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Arthur Debert")
        .about("Multi-language lines of code counter: blank, comment and code lines per language")
        .arg(
            Arg::new("path")
                .help("Directory to analyze (defaults to current directory)")
                .default_value("."),
        )
        .arg(
            Arg::new("branch")
                .short('b')
                .long("branch")
                .help("Branch the tree was checked out at (recorded, not interpreted)"),
        )
        .arg(
            Arg::new("by-file")
                .short('f')
                .long("by-file")
                .action(ArgAction::SetTrue)
                .help("Report one row per file instead of per language"),
        )
        .arg(
            Arg::new("exclude-path")
                .short('e')
                .long("exclude-path")
                .action(ArgAction::Append)
                .help("Exclude paths by prefix or glob (can be specified multiple times)"),
        )
        .arg(
            Arg::new("exclude-ext")
                .long("exclude-ext")
                .action(ArgAction::Append)
                .value_delimiter(',')
                .help("Exclude file extensions (comma-separated)"),
        )
        .arg(
            Arg::new("include-ext")
                .short('i')
                .long("include-ext")
                .action(ArgAction::Append)
                .value_delimiter(',')
                .help("Only count these file extensions (comma-separated)"),
        )
        .arg(
            Arg::new("exclude-from")
                .long("exclude-from")
                .value_name("FILE")
                .help("Read exclusions from a .clocignore-style file"),
        )
        .arg(order_flag("order-by-lang", "Order rows by language name"))
        .arg(order_flag("order-by-file", "Order rows by file count"))
        .arg(order_flag("order-by-line", "Order rows by total lines"))
        .arg(order_flag("order-by-blank", "Order rows by blank lines"))
        .arg(order_flag("order-by-comment", "Order rows by comment lines"))
        .arg(order_flag(
            "order-by-code",
            "Order rows by code lines (default)",
        ))
        .arg(
            Arg::new("order")
                .long("order")
                .default_value("DESC")
                .help("Sort direction: ASC or DESC"),
        )
        .arg(
            Arg::new("output-name")
                .short('o')
                .long("output-name")
                .default_value(DEFAULT_OUTPUT_NAME)
                .help("Base name of written reports"),
        )
        .arg(
            Arg::new("output-path")
                .long("output-path")
                .default_value(".")
                .help("Directory reports are written to"),
        )
        .arg(
            Arg::new("report-formats")
                .long("report-formats")
                .value_delimiter(',')
                .default_value("json")
                .help("Report formats to write (comma-separated: json,table,csv,markdown)"),
        )
        .arg(
            Arg::new("no-report")
                .long("no-report")
                .action(ArgAction::SetTrue)
                .help("Do not write any report file"),
        )
        .arg(
            Arg::new("print")
                .long("print")
                .default_value("table")
                .value_parser(["table", "json", "csv", "markdown", "none"])
                .help("Format printed to stdout"),
        )
        .arg(
            Arg::new("threads")
                .short('j')
                .long("threads")
                .value_parser(value_parser!(usize))
                .help("Worker threads (defaults to available parallelism)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Log more (repeat for more detail)"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose")
                .help("Only log errors"),
        )
}

fn order_flag(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .action(ArgAction::SetTrue)
        .help(help)
}

fn strings<'a>(matches: &'a ArgMatches, id: &str) -> impl Iterator<Item = &'a String> {
    matches.get_many::<String>(id).into_iter().flatten()
}

/// Build the scan configuration from matches
fn build_config(matches: &ArgMatches) -> anyhow::Result<ScanConfig> {
    let root = matches
        .get_one::<String>("path")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut config = ScanConfig::new(root).per_file(matches.get_flag("by-file"));

    if let Some(branch) = matches.get_one::<String>("branch") {
        config = config.branch(branch);
    }
    for pattern in strings(matches, "exclude-path") {
        config = config.exclude_path(pattern)?;
    }
    for ext in strings(matches, "exclude-ext") {
        config = config.exclude_extension(ext);
    }
    for ext in strings(matches, "include-ext") {
        config = config.include_extension(ext);
    }
    if let Some(file) = matches.get_one::<String>("exclude-from") {
        let list = ExclusionList::from_file(file)
            .with_context(|| format!("cannot load exclusion list {}", file))?;
        debug!(
            "{}: {} path patterns, {} extensions",
            file,
            list.paths.len(),
            list.extensions.len()
        );
        config = list.apply(config)?;
    }

    let selectors = SortSelectors {
        by_language: matches.get_flag("order-by-lang"),
        by_files: matches.get_flag("order-by-file"),
        by_lines: matches.get_flag("order-by-line"),
        by_blank: matches.get_flag("order-by-blank"),
        by_comment: matches.get_flag("order-by-comment"),
        by_code: matches.get_flag("order-by-code"),
    };
    config = config.sort_selectors(selectors)?;
    if let Some(order) = matches.get_one::<String>("order") {
        config = config.direction_str(order)?;
    }

    if let Some(name) = matches.get_one::<String>("output-name") {
        config = config.output_name(name);
    }
    if let Some(dir) = matches.get_one::<String>("output-path") {
        config = config.output_dir(dir);
    }

    config = if matches.get_flag("no-report") {
        config.without_reports()
    } else {
        let formats = strings(matches, "report-formats")
            .map(|f| f.parse::<ReportFormat>())
            .collect::<Result<Vec<_>, _>>()?;
        config.formats(formats)
    };

    if let Some(&threads) = matches.get_one::<usize>("threads") {
        config = config.threads(threads);
    }

    Ok(config)
}

fn print_format(matches: &ArgMatches) -> anyhow::Result<Option<ReportFormat>> {
    match matches.get_one::<String>("print").map(String::as_str) {
        None | Some("none") => Ok(None),
        Some(name) => Ok(Some(name.parse()?)),
    }
}

fn run_cli(matches: &ArgMatches) -> anyhow::Result<()> {
    let config = build_config(matches)?;
    let printed = print_format(matches)?;
    let registry = LanguageRegistry::builtin();

    let outcome = run(&config, &registry)?;

    if let Some(format) = printed {
        print!("{}", render(&outcome.report, format)?);
    }
    if !outcome.report.skipped.is_empty() {
        info!(
            "{} files skipped (use -vv to list them)",
            outcome.report.skipped.len()
        );
    }

    let written = outcome
        .artifacts
        .context("report computed but could not be written")?;
    for path in written {
        debug!("artifact: {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();

    if let Err(e) = logger::init(matches.get_count("verbose"), matches.get_flag("quiet")) {
        eprintln!("warning: logging disabled: {}", e);
    }

    match run_cli(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", style("Error:").red().bold().for_stderr(), e);
            ExitCode::FAILURE
        }
    }
}
