use thiserror::Error;
use tracing_subscriber::filter::ParseError;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("unknown log format `{0}`, expected text, json or journald")]
    InvalidFormat(String),

    #[error("journald output needs linux and the `journald` feature")]
    JournaldNotSupported,

    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,

    #[error("failed to install logger: {0}")]
    InitializationFailed(String),

    #[error("invalid log filter `{directive}`: {source}")]
    InvalidLogLevel {
        directive: String,
        #[source]
        source: ParseError,
    },
}
