use thiserror::Error;

/// Errors produced by `sp-monitor`.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The monitor task has exited; no further commands are accepted.
    #[error("shift monitor is not running")]
    Stopped,

    #[error("payload error: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("unexpected payload on {topic}: {detail}")]
    UnexpectedPayload { topic: String, detail: String },

    #[error("message bus error: {0}")]
    Bus(String),

    #[error("monitor configuration error: {0}")]
    Config(String),
}

pub type MonitorResult<T> = Result<T, MonitorError>;
