//! Diagnostic logging to stderr, off unless asked for.

use std::str::FromStr;

use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

use crate::flags::Flags;

/// Overrides the level picked from the command line, e.g. `MINISH_LOG=trace`.
pub const LOG_ENV: &str = "MINISH_LOG";

pub fn level(flags: &Flags, env_value: Option<&str>) -> LevelFilter {
    if let Some(value) = env_value {
        match LevelFilter::from_str(value.trim()) {
            Ok(level) => return level,
            Err(_) => eprintln!("minish: ignoring invalid {}={:?}", LOG_ENV, value),
        }
    }
    if flags.is_set("debug") {
        LevelFilter::Debug
    } else {
        LevelFilter::Off
    }
}

pub fn init(flags: &Flags) {
    let env_value = std::env::var(LOG_ENV).ok();
    let level = level(flags, env_value.as_deref());
    if level == LevelFilter::Off {
        return;
    }

    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build();
    if let Err(e) = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto) {
        eprintln!("minish: logging disabled: {}", e);
    }
}
