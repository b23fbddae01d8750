//! Contract of the transport collaborator.
//!
//! A transport moves the bytes of one [`MediaResource`] to the server and
//! reports progress along the way. Retries, chunking and authentication are
//! the transport's business; the pipeline only consumes the event stream.

use std::pin::Pin;

use courier_core::api::{InputEncryptedFile, InputFile, SecretFileEncryptionKey};
use courier_core::MediaResource;
use futures_core::Stream;
use serde::{Deserialize, Serialize};

use crate::error::TransportError;

/// Boxed stream type used throughout the pipeline
pub type BoxStream<T> = Pin<Box<dyn Stream<Item = T> + Send + 'static>>;

/// Event stream of one transport upload
pub type TransportStream = BoxStream<Result<TransportEvent, TransportError>>;

/// Statistics bucket an upload is accounted under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaStatsCategory {
    Image,
    Video,
    Audio,
    File,
}

/// One upload the pipeline asks the transport for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub resource: MediaResource,
    /// Seal the bytes for an end-to-end encrypted conversation
    pub encrypt: bool,
    pub size_hint: Option<u64>,
    pub category: MediaStatsCategory,
}

impl UploadRequest {
    pub fn new(resource: MediaResource, category: MediaStatsCategory) -> Self {
        Self {
            resource,
            encrypt: false,
            size_hint: None,
            category,
        }
    }

    pub fn encrypted(mut self, encrypt: bool) -> Self {
        self.encrypt = encrypt;
        self
    }

    pub fn with_size_hint(mut self, size_hint: Option<u64>) -> Self {
        self.size_hint = size_hint;
        self
    }
}

/// What a transport reports while uploading
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// Fraction of the resource uploaded so far, in `0.0..=1.0`
    Progress(f32),
    /// Terminal: the plain upload finished
    InputFile(InputFile),
    /// Terminal: the encrypted upload finished
    InputSecretFile {
        file: InputEncryptedFile,
        size: i32,
        key: SecretFileEncryptionKey,
    },
}

/// Transport collaborator
///
/// The returned stream is lazy; dropping it must abandon the upload.
pub trait UploadTransport: Send + Sync {
    fn upload(&self, request: UploadRequest) -> TransportStream;
}
