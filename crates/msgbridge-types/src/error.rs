use thiserror::Error;

/// Errors surfaced by the upstream message store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transient transport or IO failure talking to the store.
    #[error("message store unavailable: {0}")]
    Unavailable(String),

    /// Query arguments did not resolve to a known chat.
    #[error("chat not found: '{0}'")]
    ChatNotFound(String),

    /// The store answered, but with something we could not interpret.
    #[error("invalid response from store: {0}")]
    InvalidResponse(String),
}

impl StoreError {
    /// Whether retrying the same call later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}
