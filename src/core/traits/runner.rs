use std::io;

use crate::core::domain::{CommandSpec, ExecutionResult};

/// The command could not be started at all. A command that starts and exits
/// with a non-zero code is reported through [`ExecutionResult`] instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpawnError {
    #[error("Empty command")]
    EmptyCommand,
    #[error("Failed to spawn `{command}`: {msg}")]
    FailedToLaunch {
        command: String,
        kind: io::ErrorKind,
        msg: String,
    },
    #[error("Failed to wait for `{command}`: {msg}")]
    FailedToWait { command: String, msg: String },
}

#[mockall::automock]
#[async_trait::async_trait]
pub trait ProcessRunner: std::fmt::Debug + Send + Sync {
    async fn execute(&self, spec: &CommandSpec) -> Result<ExecutionResult, SpawnError>;
}
