use crate::core::traits::runner::SpawnError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("Unknown action: {action}")]
    InvalidAction { action: String },
    #[error("Missing required parameter: {name}")]
    MissingParameter { name: String },
    #[error(transparent)]
    Spawn(#[from] SpawnError),
}

impl DispatchError {
    /// Errors caused by the request itself rather than by the host.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DispatchError::InvalidAction { .. } | DispatchError::MissingParameter { .. }
        )
    }
}
