use clap::ValueEnum;

/// Verbosity accepted by the `--log-level` flag of both binaries.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Installs the `env_logger` backend; `level` overrides whatever `RUST_LOG` sets.
pub fn init_logging(level: LogLevel) {
    env_logger::Builder::from_default_env()
        .filter_level(level.into())
        .init();
}
