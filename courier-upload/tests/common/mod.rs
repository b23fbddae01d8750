#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use courier_core::api::InputFile;
use courier_core::{
    FileMedia, ImageRepresentation, Media, MediaId, MediaResource, MemoryStore, MessageId,
    MessageStore, PeerId, PeerNamespace, PixelDimensions, ResourceId,
};
use courier_upload::{
    ContentUploader, MediaTransform, TransportError, TransportEvent, TransportStream,
    UploadConfig, UploadEvent, UploadRequest, UploadResult, UploadStream, UploadTransport,
};
use futures_util::{stream, StreamExt};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

pub type TransportItem = Result<TransportEvent, TransportError>;

/// Transport whose events are pushed by the test through a channel
#[derive(Default)]
pub struct ScriptedTransport {
    scripts: Mutex<HashMap<ResourceId, mpsc::UnboundedReceiver<TransportItem>>>,
    requests: Mutex<Vec<UploadRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Script the next upload of `resource`
    pub fn script(&self, resource: &MediaResource) -> mpsc::UnboundedSender<TransportItem> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.scripts.lock().insert(resource.id(), rx);
        tx
    }

    pub fn requests(&self) -> Vec<UploadRequest> {
        self.requests.lock().clone()
    }
}

impl UploadTransport for ScriptedTransport {
    fn upload(&self, request: UploadRequest) -> TransportStream {
        let id = request.resource.id();
        self.requests.lock().push(request);
        match self.scripts.lock().remove(&id) {
            Some(rx) => Box::pin(UnboundedReceiverStream::new(rx)),
            None => Box::pin(stream::once(async move {
                Err(TransportError::resource_unavailable(id.to_string()))
            })),
        }
    }
}

/// Transform that counts invocations and hands back a fixed replacement
pub struct CountingTransform {
    calls: AtomicUsize,
    replacement: Option<Media>,
}

impl CountingTransform {
    pub fn replacing(replacement: Option<Media>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            replacement,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaTransform for CountingTransform {
    async fn transform(
        &self,
        _store: &dyn MessageStore,
        _transport: &dyn UploadTransport,
        _file: &FileMedia,
        _is_retry: bool,
    ) -> Option<Media> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.replacement.clone()
    }
}

pub fn peer() -> PeerId {
    PeerId::new(PeerNamespace::User, 1001)
}

pub fn secret_peer() -> PeerId {
    PeerId::new(PeerNamespace::SecretChat, 2002)
}

pub fn message_id(id: i32) -> MessageId {
    MessageId::local(peer(), id)
}

pub fn local_file(id: i64) -> MediaResource {
    MediaResource::LocalFile { file_id: id }
}

pub fn preview(resource: MediaResource) -> ImageRepresentation {
    ImageRepresentation::new(PixelDimensions::new(90, 90), resource)
}

/// Identified local file with an optional preview rendition
pub fn file_media(id: i64, preview_resource: Option<MediaResource>) -> FileMedia {
    let file = FileMedia::new(local_file(id), "video/quicktime")
        .with_id(MediaId::new(MediaId::LOCAL_FILE, id))
        .with_size(4096);
    match preview_resource {
        Some(resource) => file.with_preview(preview(resource)),
        None => file,
    }
}

pub fn input_file(id: i64) -> InputFile {
    InputFile::Small {
        id,
        parts: 1,
        name: format!("upload-{}", id),
        md5_checksum: String::new(),
    }
}

pub fn uploader(
    transport: Arc<dyn UploadTransport>,
    store: Arc<MemoryStore>,
    transform: Option<Arc<CountingTransform>>,
) -> ContentUploader {
    let uploader = ContentUploader::from_shared(transport, store, UploadConfig::default());
    match transform {
        Some(transform) => uploader.with_shared_transform(transform),
        None => uploader,
    }
}

/// Drain a pipeline, failing the test if it stalls
pub async fn collect_events(stream: UploadStream) -> Vec<UploadResult<UploadEvent>> {
    tokio::time::timeout(Duration::from_secs(5), stream.collect::<Vec<_>>())
        .await
        .expect("pipeline stalled")
}

/// Next event, or `None` if nothing arrives within `millis`
pub async fn next_within(
    stream: &mut UploadStream,
    millis: u64,
) -> Option<Option<UploadResult<UploadEvent>>> {
    tokio::time::timeout(Duration::from_millis(millis), stream.next())
        .await
        .ok()
}
