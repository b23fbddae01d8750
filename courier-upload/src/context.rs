use std::sync::Arc;

use courier_core::MessageStore;

use crate::config::UploadConfig;
use crate::transform::MediaTransform;
use crate::transport::UploadTransport;

/// Collaborators shared by every stage of a pipeline
#[derive(Clone)]
pub struct UploadContext {
    pub transport: Arc<dyn UploadTransport>,
    pub store: Arc<dyn MessageStore>,
    transform: Option<Arc<dyn MediaTransform>>,
    pub config: UploadConfig,
}

impl UploadContext {
    pub fn new(
        transport: Arc<dyn UploadTransport>,
        store: Arc<dyn MessageStore>,
        config: UploadConfig,
    ) -> Self {
        Self {
            transport,
            store,
            transform: None,
            config,
        }
    }

    pub fn with_transform(mut self, transform: Arc<dyn MediaTransform>) -> Self {
        self.transform = Some(transform);
        self
    }

    /// The transform to run, if one is configured and enabled
    pub fn transform(&self) -> Option<&Arc<dyn MediaTransform>> {
        if self.config.transform_media {
            self.transform.as_ref()
        } else {
            None
        }
    }
}
