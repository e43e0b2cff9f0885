//! Graph-subsystem error type.

use thiserror::Error;

use sp_core::CheckpointId;

/// Errors produced by `sp-graph`.  All of them are configuration errors: they
/// must block circuit generation before any walk is attempted.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("checkpoint graph has no checkpoints")]
    Empty,

    #[error("checkpoint graph has no patrol paths")]
    NoPaths,

    #[error("checkpoint graph is not a single circuit; unreachable: {}", join(.unreachable))]
    Disconnected { unreachable: Vec<CheckpointId> },

    #[error("patrol path {0} -> {0} is a self-loop")]
    SelfLoop(CheckpointId),

    #[error("patrol path {src} -> {dest} has zero duration")]
    ZeroDuration { src: CheckpointId, dest: CheckpointId },

    #[error("patrol path {src} -> {dest} is defined more than once")]
    DuplicatePath { src: CheckpointId, dest: CheckpointId },

    #[error("patrol path parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn join(ids: &[CheckpointId]) -> String {
    ids.iter().map(CheckpointId::as_str).collect::<Vec<_>>().join(", ")
}

pub type GraphResult<T> = Result<T, GraphError>;
