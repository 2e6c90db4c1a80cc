use kv_logger::{init_logger, LogError, LoggerConfig};

#[test]
fn init_logger_only_once() {
    let config = LoggerConfig::default();
    assert!(init_logger(&config).is_ok());
    tracing::info!(user = "alice", "logger installed");

    assert!(matches!(
        init_logger(&config),
        Err(LogError::SubscriberInit(_))
    ));
}
