use std::sync::{Arc, OnceLock};

/// Log sink implemented by the host application.
///
/// Crumbkit logs through the `log` facade. Once a `Logger` is installed with
/// [`set_logger`], records are forwarded to it.
///
/// # Examples
///
/// ```rust
/// use crumbkit_core::logger::{LogLevel, Logger};
///
/// struct StderrLogger;
///
/// impl Logger for StderrLogger {
///     fn log(&self, level: LogLevel, message: String) {
///         eprintln!("[{level:?}] {message}");
///     }
/// }
/// ```
///
/// ## Kotlin
///
/// ```kotlin
/// object CrumbkitLogBridge : Logger {
///     override fun log(level: LogLevel, message: String) {
///         Log.println(level.toAndroidPriority(), "crumbkit", message)
///     }
/// }
///
/// setLogger(CrumbkitLogBridge) // once, in Application.onCreate
/// ```
#[uniffi::export(with_foreign)]
pub trait Logger: Sync + Send {
    /// Logs `message` at `level`.
    fn log(&self, level: LogLevel, message: String);
}

/// Severity of a forwarded record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum LogLevel {
    /// Very detailed diagnostics.
    Trace,
    /// Debugging information.
    Debug,
    /// Normal progress.
    Info,
    /// Recoverable problems, such as a swallowed storage failure.
    Warn,
    /// Failures.
    Error,
}

/// `log::Log` implementation forwarding to the installed [`Logger`].
struct ForeignLogger;

impl log::Log for ForeignLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        if !forwards(record.level(), record.module_path()) {
            return;
        }

        if let Some(logger) = LOGGER_INSTANCE.get() {
            logger.log(log_level(record.level()), format!("{}", record.args()));
        } else {
            eprintln!("Logger not set: {}", record.args());
        }
    }

    fn flush(&self) {}
}

/// Debug and trace records are only forwarded from crumbkit's own modules.
fn forwards(level: log::Level, module_path: Option<&str>) -> bool {
    let from_crumbkit = module_path.is_some_and(|path| path.starts_with("crumbkit"));
    from_crumbkit || level <= log::Level::Info
}

const fn log_level(level: log::Level) -> LogLevel {
    match level {
        log::Level::Error => LogLevel::Error,
        log::Level::Warn => LogLevel::Warn,
        log::Level::Info => LogLevel::Info,
        log::Level::Debug => LogLevel::Debug,
        log::Level::Trace => LogLevel::Trace,
    }
}

static LOGGER_INSTANCE: OnceLock<Arc<dyn Logger>> = OnceLock::new();

/// Installs the host logger.
///
/// Only the first call takes effect; later calls are ignored.
#[uniffi::export]
pub fn set_logger(logger: Arc<dyn Logger>) {
    if LOGGER_INSTANCE.set(logger).is_err() {
        eprintln!("Logger already set");
        return;
    }

    if let Err(e) = init_logger() {
        eprintln!("Failed to set logger: {e}");
    }
}

/// Registers [`ForeignLogger`] with the `log` facade.
///
/// # Errors
///
/// Returns a `log::SetLoggerError` if another `log` implementation is
/// already installed.
fn init_logger() -> Result<(), log::SetLoggerError> {
    static LOGGER: ForeignLogger = ForeignLogger;
    log::set_logger(&LOGGER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}
