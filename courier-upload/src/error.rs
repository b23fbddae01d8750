use thiserror::Error;

/// Result type for pipeline operations
pub type UploadResult<T> = Result<T, UploadError>;

/// Failure delivered to the consumer of an upload pipeline.
///
/// Transport and network causes are deliberately collapsed into `Failed`;
/// `reason` is diagnostic text, not something to branch on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Upload failed: {reason}")]
    Failed { reason: String },

    #[error("Upload cancelled")]
    Cancelled,
}

impl UploadError {
    /// Create the generic upload failure
    pub fn failed<S: Into<String>>(reason: S) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Errors reported by the transport collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Resource not available: {resource}")]
    ResourceUnavailable { resource: String },

    #[error("Upload rejected: {0}")]
    Rejected(String),
}

impl TransportError {
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network(message.into())
    }

    pub fn resource_unavailable<S: Into<String>>(resource: S) -> Self {
        Self::ResourceUnavailable {
            resource: resource.into(),
        }
    }
}
