//! The program logger.
//!
//! Messages go to the terminal (warnings and errors on stderr, everything else on stdout) and,
//! for runs which produce results, to two log files in the output folder. The log level can be set
//! in the settings file or overridden with the `ELECOST_LOG_LEVEL` environment variable.
use anyhow::{Context, Result, anyhow};
use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{LevelFilter, Record};
use std::env;
use std::fmt::Arguments;
use std::fs::File;
use std::io::IsTerminal;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

static LOGGER_INIT: OnceLock<()> = OnceLock::new();

/// The environment variable which overrides the log level given in the settings file
pub const LOG_LEVEL_ENV_VAR: &str = "ELECOST_LOG_LEVEL";

/// The log level used if neither the settings file nor the environment specify one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Everything at info level and below (more verbose) is recorded here
const LOG_INFO_FILE_NAME: &str = "elecost_info.log";

/// Warnings and errors are recorded here
const LOG_ERROR_FILE_NAME: &str = "elecost_error.log";

/// Whether [`init`] has completed successfully
pub fn is_logger_initialised() -> bool {
    LOGGER_INIT.get().is_some()
}

/// Convert a case-insensitive level name (`off`, `error`, `warn`, `info`, `debug` or `trace`)
fn parse_log_level(log_level: &str) -> Result<LevelFilter> {
    LevelFilter::from_str(log_level).map_err(|_| anyhow!("Unknown log level: {log_level}"))
}

/// Initialise the program logger.
///
/// # Arguments
///
/// * `log_level_from_settings` - Level to use unless `ELECOST_LOG_LEVEL` is set
/// * `log_file_dir` - Folder in which to create log files, if any
pub fn init(log_level_from_settings: &str, log_file_dir: Option<&Path>) -> Result<()> {
    let log_level = match env::var(LOG_LEVEL_ENV_VAR) {
        Ok(level) => parse_log_level(&level)
            .with_context(|| format!("Invalid value for {LOG_LEVEL_ENV_VAR}"))?,
        Err(_) => parse_log_level(log_level_from_settings)?,
    };

    let mut dispatch = Dispatch::new().chain(terminal_dispatch(log_level));
    if let Some(dir) = log_file_dir {
        dispatch = dispatch.chain(file_dispatch(dir, log_level)?);
    }
    dispatch.apply().context("Logger already initialised")?;

    LOGGER_INIT.get_or_init(|| ());

    Ok(())
}

/// Output to stdout and stderr, coloured if writing to a terminal
fn terminal_dispatch(log_level: LevelFilter) -> Dispatch {
    let colours = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);
    let stdout_colour = std::io::stdout().is_terminal();
    let stderr_colour = std::io::stderr().is_terminal();

    let stdout = Dispatch::new()
        .level(log_level)
        .filter(|metadata| metadata.level() > LevelFilter::Warn)
        .format(move |out, message, record| {
            format_terminal(out, message, record, stdout_colour.then_some(&colours));
        })
        .chain(std::io::stdout());
    let stderr = Dispatch::new()
        .level(log_level.min(LevelFilter::Warn))
        .format(move |out, message, record| {
            format_terminal(out, message, record, stderr_colour.then_some(&colours));
        })
        .chain(std::io::stderr());

    Dispatch::new().chain(stdout).chain(stderr)
}

/// Output to the two log files in `dir`.
///
/// The info log always records at least info-level messages, even if the terminal is quieter.
fn file_dispatch(dir: &Path, log_level: LevelFilter) -> Result<Dispatch> {
    let create = |file_name: &str| {
        let path = dir.join(file_name);
        File::create(&path).with_context(|| format!("Could not create {}", path.display()))
    };

    let info_log = Dispatch::new()
        .level(log_level.max(LevelFilter::Info))
        .filter(|metadata| metadata.level() > LevelFilter::Warn)
        .format(format_file)
        .chain(create(LOG_INFO_FILE_NAME)?);
    let error_log = Dispatch::new()
        .level(LevelFilter::Warn)
        .format(format_file)
        .chain(create(LOG_ERROR_FILE_NAME)?);

    Ok(Dispatch::new().chain(info_log).chain(error_log))
}

fn format_terminal(
    out: FormatCallback,
    message: &Arguments,
    record: &Record,
    colours: Option<&ColoredLevelConfig>,
) {
    let time = Local::now().format("%H:%M:%S");
    match colours {
        Some(colours) => out.finish(format_args!(
            "[{time} {}] {message}",
            colours.color(record.level())
        )),
        None => out.finish(format_args!("[{time} {}] {message}", record.level())),
    }
}

fn format_file(out: FormatCallback, message: &Arguments, record: &Record) {
    out.finish(format_args!(
        "[{} {} {}] {message}",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        record.level(),
        record.target()
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use rstest::rstest;

    #[rstest]
    #[case("off", LevelFilter::Off)]
    #[case("error", LevelFilter::Error)]
    #[case("WARN", LevelFilter::Warn)]
    #[case("info", LevelFilter::Info)]
    #[case("Debug", LevelFilter::Debug)]
    #[case("trace", LevelFilter::Trace)]
    fn test_parse_log_level(#[case] input: &str, #[case] expected: LevelFilter) {
        assert_eq!(parse_log_level(input).unwrap(), expected);
    }

    #[test]
    fn test_parse_log_level_unknown() {
        assert_error!(parse_log_level("loud"), "Unknown log level: loud");
    }

    #[test]
    fn test_file_dispatch_creates_log_files() {
        let dir = tempfile::tempdir().unwrap();
        let _dispatch = file_dispatch(dir.path(), LevelFilter::Off).unwrap();
        assert!(dir.path().join(LOG_INFO_FILE_NAME).is_file());
        assert!(dir.path().join(LOG_ERROR_FILE_NAME).is_file());
    }
}
