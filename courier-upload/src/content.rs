use std::fmt;

use courier_core::api::{InputEncryptedFile, InputFile, InputMedia, SecretFileEncryptionKey};
use courier_core::{ForwardSourceInfo, Media, OutgoingInlineResult};
use futures_util::{stream, StreamExt};

use crate::error::{UploadError, UploadResult};
use crate::transport::BoxStream;

/// What the network-request layer sends for a message
#[derive(Debug, Clone, PartialEq)]
pub enum OutgoingContent {
    /// Plain text, possibly because the media could not be represented
    Text(String),
    /// Protocol media descriptor
    Media(InputMedia),
    Forward(ForwardSourceInfo),
    InlineResult(OutgoingInlineResult),
    /// Encrypted upload for a secret conversation
    SecretMedia {
        file: InputEncryptedFile,
        size: i32,
        key: SecretFileEncryptionKey,
    },
}

/// Event of an upload pipeline: progress, then exactly one content value
#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    Progress(f32),
    Content(OutgoingContent),
}

/// Stream driven by the consumer of a [`ContentResolution::Pipeline`]
pub type UploadStream = BoxStream<UploadResult<UploadEvent>>;

/// Outcome of classifying an outgoing message
pub enum ContentResolution {
    /// Nothing left to do, send this
    Ready(OutgoingContent),
    /// Uploads are required before the content is known
    Pipeline(UploadStream),
}

impl ContentResolution {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// The ready content, if no pipeline is needed
    pub fn ready(self) -> Option<OutgoingContent> {
        match self {
            Self::Ready(content) => Some(content),
            Self::Pipeline(_) => None,
        }
    }

    /// View either shape as a pipeline stream
    pub fn into_stream(self) -> UploadStream {
        match self {
            Self::Ready(content) => Box::pin(stream::once(async move {
                Ok(UploadEvent::Content(content))
            })),
            Self::Pipeline(stream) => stream,
        }
    }
}

impl fmt::Debug for ContentResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(content) => f.debug_tuple("Ready").field(content).finish(),
            Self::Pipeline(_) => f.debug_tuple("Pipeline").field(&"..").finish(),
        }
    }
}

/// Progress of the transform stage
#[derive(Debug, Clone, PartialEq)]
pub enum TransformState {
    Pending,
    Done(Media),
}

/// Progress of the thumbnail stage
#[derive(Debug, Clone, PartialEq)]
pub enum ThumbnailState {
    Pending,
    Done(Option<InputFile>),
}

impl ThumbnailState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Drive a pipeline to its terminal value, reporting progress on the way
pub async fn wait_for_content<F>(
    mut stream: UploadStream,
    mut on_progress: F,
) -> UploadResult<OutgoingContent>
where
    F: FnMut(f32),
{
    while let Some(event) = stream.next().await {
        match event? {
            UploadEvent::Progress(progress) => on_progress(progress),
            UploadEvent::Content(content) => return Ok(content),
        }
    }
    Err(UploadError::failed("pipeline finished without content"))
}
