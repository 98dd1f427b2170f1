//! Stderr backend for the `log` facade.

use console::style;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level() && metadata.target().starts_with("polyloc")
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let tag = match record.level() {
            Level::Error => style("error").red().bold(),
            Level::Warn => style("warning").yellow().bold(),
            Level::Info => style("info").green(),
            Level::Debug => style("debug").cyan(),
            Level::Trace => style("trace").dim(),
        };
        eprintln!("{}: {}", tag.for_stderr(), record.args());
    }

    fn flush(&self) {}
}

/// Level for `-v` repetitions; `-q` wins over any `-v`.
pub fn level_for(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn init(verbosity: u8, quiet: bool) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level_for(verbosity, quiet));
    Ok(())
}
