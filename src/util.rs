use flexi_logger::{FlexiLoggerError, Logger, LoggerHandle};

/// Starts logging to stderr. `RUST_LOG` wins over `spec` when set.
///
/// Keep the returned handle alive for the whole run.
pub fn init_log(spec: &str) -> Result<LoggerHandle, FlexiLoggerError> {
    Logger::try_with_env_or_str(spec)?.log_to_stderr().start()
}
