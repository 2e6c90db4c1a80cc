use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("io error")]
    Io(#[from] std::io::Error),
    #[error("invalid key: {0:?}")]
    InvalidKey(String),
    #[error("writer lock poisoned")]
    Poisoned,
    #[error("unknown level: {0}")]
    UnknownLevel(String),
    #[error("failed to install global subscriber")]
    SubscriberInit(#[from] tracing_subscriber::util::TryInitError),
}

pub type LogResult<T, E = LogError> = Result<T, E>;
