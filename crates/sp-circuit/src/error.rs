use sp_core::{CardId, CheckpointId};
use sp_graph::GraphError;
use thiserror::Error;

/// Errors produced by `sp-circuit`.
///
/// Everything except `AttemptsExhausted`, `Parse`, and `Io` is detected before
/// the first generation attempt starts.
#[derive(Debug, Error)]
pub enum CircuitError {
    #[error("invalid checkpoint graph: {0}")]
    Graph(#[from] GraphError),

    #[error("checkpoint {0} has no outgoing patrol path")]
    DeadEnd(CheckpointId),

    #[error("a shift needs at least one sentry")]
    NoSentries,

    #[error("card {0} is assigned to more than one sentry")]
    DuplicateCard(CardId),

    #[error("shift duration must be positive, got {0} s")]
    NonPositiveDuration(i64),

    #[error("shift duration {0} s is too long")]
    DurationTooLong(i64),

    #[error("generator configuration error: {0}")]
    Config(String),

    #[error("no balanced circuit found after {attempts} attempts")]
    AttemptsExhausted { attempts: u32 },

    #[error("sentry list parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CircuitResult<T> = Result<T, CircuitError>;
