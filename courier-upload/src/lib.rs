//! # courier-upload
//!
//! Resolves what an outgoing message actually sends. Forwards, inline
//! results, text and already-uploaded media resolve immediately; photos and
//! files go through an upload pipeline that streams progress and ends with
//! exactly one content value or one failure.
//!
//! ```rust
//! use courier_core::prelude::*;
//! use courier_core::MediaResource;
//! use courier_upload::prelude::*;
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() -> UploadResult<()> {
//! let transport = MemoryTransport::new();
//! let resource = MediaResource::LocalFile { file_id: 1 };
//! transport.insert_resource(&resource, vec![0u8; 1024]);
//!
//! let uploader = ContentUploader::new(transport, MemoryStore::new(), UploadConfig::default());
//! let message = OutgoingMessage::new(PeerId::new(PeerNamespace::User, 1), "report")
//!     .with_media(FileMedia::new(resource, "application/pdf"));
//!
//! let resolution = uploader.resolve(message, CancellationToken::new());
//! let content = wait_for_content(resolution.into_stream(), |_| {}).await?;
//! assert!(matches!(content, OutgoingContent::Media(_)));
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod attributes;
mod classifier;
mod config;
mod content;
mod context;
mod error;
mod memory_transport;
pub mod pipeline;
pub mod thumbnail;
pub mod transform;
pub mod transport;
mod uploader;

#[cfg(feature = "tracing-basic")]
pub mod observability;

pub use classifier::{resolve_content, OutgoingMessage};
pub use config::UploadConfig;
pub use content::{
    wait_for_content, ContentResolution, OutgoingContent, ThumbnailState, TransformState,
    UploadEvent, UploadStream,
};
pub use context::UploadContext;
pub use error::{TransportError, UploadError, UploadResult};
pub use memory_transport::{MemoryTransport, MemoryTransportConfig, BIG_FILE_THRESHOLD};
pub use transform::MediaTransform;
pub use transport::{
    BoxStream, MediaStatsCategory, TransportEvent, TransportStream, UploadRequest, UploadTransport,
};
pub use uploader::ContentUploader;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        wait_for_content, ContentResolution, ContentUploader, MediaTransform, MemoryTransport,
        OutgoingContent, OutgoingMessage, UploadConfig, UploadError, UploadEvent, UploadResult,
        UploadTransport,
    };
}
