use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by the persistence collaborator
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Message not found: {id}")]
    MessageNotFound { id: String },

    #[error("Media not found: {id}")]
    MediaNotFound { id: String },

    #[error("Transaction body was invoked more than once")]
    TransactionReplayed,

    #[error("Storage backend error: {source}")]
    Backend {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl StoreError {
    /// Create a backend error from any error type
    pub fn backend<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend {
            source: Box::new(error),
        }
    }

    pub fn message_not_found<S: ToString>(id: S) -> Self {
        Self::MessageNotFound { id: id.to_string() }
    }

    pub fn media_not_found<S: ToString>(id: S) -> Self {
        Self::MediaNotFound { id: id.to_string() }
    }
}
