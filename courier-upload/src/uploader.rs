use std::sync::Arc;

use courier_core::{MessageStore, StoredMessage};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::classifier::{resolve_content, OutgoingMessage};
use crate::config::UploadConfig;
use crate::content::ContentResolution;
use crate::context::UploadContext;
use crate::transform::MediaTransform;
use crate::transport::UploadTransport;

/// Entry point: turns outgoing messages into sendable content
#[derive(Clone)]
pub struct ContentUploader {
    ctx: UploadContext,
}

impl ContentUploader {
    pub fn new<T, S>(transport: T, store: S, config: UploadConfig) -> Self
    where
        T: UploadTransport + 'static,
        S: MessageStore + 'static,
    {
        Self::from_shared(Arc::new(transport), Arc::new(store), config)
    }

    /// Build over collaborators that are also used elsewhere
    pub fn from_shared(
        transport: Arc<dyn UploadTransport>,
        store: Arc<dyn MessageStore>,
        config: UploadConfig,
    ) -> Self {
        Self {
            ctx: UploadContext::new(transport, store, config),
        }
    }

    pub fn with_transform<M: MediaTransform + 'static>(self, transform: M) -> Self {
        self.with_shared_transform(Arc::new(transform))
    }

    pub fn with_shared_transform(mut self, transform: Arc<dyn MediaTransform>) -> Self {
        self.ctx = self.ctx.with_transform(transform);
        self
    }

    pub fn config(&self) -> &UploadConfig {
        &self.ctx.config
    }

    pub fn context(&self) -> &UploadContext {
        &self.ctx
    }

    /// Classify `message`; pipelines stop with `Cancelled` once `cancel` fires
    #[instrument(skip_all, fields(peer = %message.peer_id, message = ?message.message_id))]
    pub fn resolve(&self, message: OutgoingMessage, cancel: CancellationToken) -> ContentResolution {
        let resolution = resolve_content(&self.ctx, message, cancel);
        debug!(ready = resolution.is_ready(), "Resolved outgoing content");
        resolution
    }

    /// Resolve a message as it is persisted
    pub fn resolve_stored(
        &self,
        message: &StoredMessage,
        cancel: CancellationToken,
    ) -> ContentResolution {
        self.resolve(OutgoingMessage::from(message), cancel)
    }
}
