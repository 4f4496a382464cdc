
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn to_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

/// Installs the env_logger backend.
///
/// The backend accepts every level; `log::set_max_level` does the filtering so the level can
/// change at runtime. `RUST_LOG` still narrows individual modules.
pub fn init_logging(level: LogLevel) {
    let result = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Trace)
        .parse_default_env()
        .format_timestamp_secs()
        .try_init();
    if result.is_err() {
        log::debug!("logger already installed");
    }
    log::set_max_level(level.to_filter());
}

/// Changes the log level at runtime (not persisted)
pub fn set_store_log_level(level: &str) -> Result<(), String> {
    let lf = match level.to_lowercase().as_str() {
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "info" => log::LevelFilter::Info,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        "off" => log::LevelFilter::Off,
        other => return Err(format!("invalid log level: {}", other)),
    };
    log::set_max_level(lf);
    Ok(())
}

/// Current log level
pub fn get_store_log_level() -> LogLevel {
    let level = log::max_level();
    match level {
        log::LevelFilter::Error => LogLevel::Error,
        log::LevelFilter::Warn => LogLevel::Warn,
        log::LevelFilter::Info => LogLevel::Info,
        log::LevelFilter::Debug => LogLevel::Debug,
        log::LevelFilter::Trace => LogLevel::Trace,
        log::LevelFilter::Off => LogLevel::Off,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_level_round_trips() {
        set_store_log_level("WARN").unwrap();
        assert_eq!(get_store_log_level(), LogLevel::Warn);
        set_store_log_level("debug").unwrap();
        assert_eq!(get_store_log_level(), LogLevel::Debug);
        assert!(set_store_log_level("loud").is_err());
        assert_eq!(get_store_log_level(), LogLevel::Debug);
    }
}
