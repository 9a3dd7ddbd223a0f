//! Command-line overrides for [`AppConfig`].

use log::LevelFilter;

use crate::app::AppConfig;

pub const USAGE: &str = "\
usage: swipe_ninja [--width N] [--height N] [--seed N] [--no-mirror] [--mute]
                   [--verbose | -v] [--quiet]";

/// Build an [`AppConfig`] from command-line arguments (program name
/// already stripped).  Frame size flags also resize the field.
pub fn parse_args<I, S>(args: I) -> Result<AppConfig, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut width  = 640usize;
    let mut height = 480usize;
    let mut seed   = None;
    let mut mirror = true;
    let mut muted  = false;
    let mut level  = LevelFilter::Info;

    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        let arg = arg.as_ref();
        let mut number = |name: &str| -> Result<u64, String> {
            let v = it.next().ok_or_else(|| format!("{} needs a value", name))?;
            v.as_ref().parse::<u64>().map_err(|e| format!("{} {:?}: {}", name, v.as_ref(), e))
        };
        match arg {
            "--width"      => width  = number("--width")? as usize,
            "--height"     => height = number("--height")? as usize,
            "--seed"       => seed   = Some(number("--seed")?),
            "--no-mirror"  => mirror = false,
            "--mute"       => muted  = true,
            "--verbose" | "-v" => level = LevelFilter::Debug,
            "--quiet"      => level = LevelFilter::Warn,
            other => return Err(format!("unknown argument {:?}", other)),
        }
    }

    if width < 64 || height < 64 {
        return Err(format!("playfield {}x{} is too small (minimum 64x64)", width, height));
    }

    let mut cfg = AppConfig::for_frame(width, height);
    cfg.seed      = seed;
    cfg.mirror    = mirror;
    cfg.muted     = muted;
    cfg.log_level = level;
    Ok(cfg)
}
