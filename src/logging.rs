use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::OnceLock;

/// Environment variable consulted when no `--log-level` flag is given.
pub const LOG_ENV_VAR: &str = "NGX_TRANSLATE_ASSIST_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
}

impl LogLevel {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warn" | "warning" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            _ => None,
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Error,
            2 => Self::Warn,
            4 => Self::Debug,
            _ => Self::Info,
        }
    }
}

fn level_cell() -> &'static AtomicU8 {
    static CELL: OnceLock<AtomicU8> = OnceLock::new();
    CELL.get_or_init(|| AtomicU8::new(LogLevel::Info as u8))
}

pub fn set_level(level: LogLevel) {
    level_cell().store(level as u8, Ordering::Relaxed);
}

pub fn level() -> LogLevel {
    LogLevel::from_u8(level_cell().load(Ordering::Relaxed))
}

/// Resolve the log level from an explicit flag, falling back to the
/// environment. An unknown flag value is reported back to the caller;
/// an unknown environment value is ignored with a warning.
pub fn init(flag: Option<&str>) -> Result<LogLevel, String> {
    if let Some(raw) = flag {
        let parsed = LogLevel::parse(raw)
            .ok_or_else(|| format!("Unknown log level '{}' (expected error, warn, info or debug)", raw))?;
        set_level(parsed);
        return Ok(parsed);
    }

    if let Ok(raw) = std::env::var(LOG_ENV_VAR) {
        match LogLevel::parse(&raw) {
            Some(parsed) => set_level(parsed),
            None => warn(&format!("Ignoring {}={}: unknown log level", LOG_ENV_VAR, raw)),
        }
    }

    Ok(level())
}

pub fn enabled(level: LogLevel) -> bool {
    (level as u8) <= level_cell().load(Ordering::Relaxed)
}

pub fn error(message: &str) {
    if enabled(LogLevel::Error) {
        eprintln!("ERROR: {}", message);
    }
}

pub fn warn(message: &str) {
    if enabled(LogLevel::Warn) {
        eprintln!("Warning: {}", message);
    }
}

/// Informational output goes to stdout so it reads alongside command results.
pub fn info(message: &str) {
    if enabled(LogLevel::Info) {
        println!("{}", message);
    }
}

pub fn debug(message: &str) {
    if enabled(LogLevel::Debug) {
        eprintln!("DEBUG: {}", message);
    }
}
