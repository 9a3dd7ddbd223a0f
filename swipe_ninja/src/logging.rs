//! Terminal logging via `fern`.

use std::thread;

use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use snafu::ResultExt;

use crate::error::{LoggerSnafu, Result};

/// Install a colored stderr logger at `level`.
///
/// Fruit spawn/slice/expiry lines from `fruit_field` are `debug!`, so they
/// only show with `--verbose`.
pub fn setup(level: LevelFilter) -> Result<()> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Magenta)
        .trace(Color::BrightBlack);

    fern::Dispatch::new()
        .format(move |out, msg, record| {
            out.finish(format_args!(
                "{color}{target} | {thread} | {level} | {message}\x1B[0m",
                color   = format_args!("\x1B[{}m", colors.get_color(&record.level()).to_fg_str()),
                target  = record.target(),
                thread  = thread::current().name().unwrap_or("unnamed"),
                level   = record.level(),
                message = msg
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
        .context(LoggerSnafu)
}
