//! Upload orchestration for image and file media.
//!
//! The file path joins two independent results: the primary upload and the
//! thumbnail stage (which itself waits for the transform stage). Progress of
//! the primary upload is forwarded as it arrives; content is emitted once
//! both sides have settled.

use courier_core::api::{InputFile, InputMedia};
use courier_core::media::largest_image_representation;
use courier_core::{FileMedia, ImageMedia, MessageAttribute, MessageAttributes, MessageId, PeerId};
use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::adapter::{upload_resource, ResourceUploadEvent, UploadedResource};
use crate::attributes::{encode_file_attributes, stats_category};
use crate::content::{OutgoingContent, ThumbnailState, UploadEvent, UploadStream};
use crate::context::UploadContext;
use crate::error::{UploadError, UploadResult};
use crate::thumbnail::thumbnail_stage;
use crate::transform::transform_stage;
use crate::transport::{MediaStatsCategory, UploadRequest};

/// Photo descriptor for a finished plain image upload
pub fn uploaded_photo(file: InputFile, caption: String, ttl_seconds: Option<i32>) -> InputMedia {
    let mut flags = 0;
    if ttl_seconds.is_some() {
        flags |= InputMedia::HAS_TTL;
    }
    InputMedia::UploadedPhoto {
        flags,
        file,
        caption,
        stickers: None,
        ttl_seconds,
    }
}

/// Document descriptor for a finished plain file upload
pub fn uploaded_document(
    file: InputFile,
    thumb: Option<InputFile>,
    media: &FileMedia,
    caption: String,
    ttl_seconds: Option<i32>,
) -> InputMedia {
    let mut flags = 0;
    if thumb.is_some() {
        flags |= InputMedia::HAS_THUMB;
    }
    if ttl_seconds.is_some() {
        flags |= InputMedia::HAS_TTL;
    }
    InputMedia::UploadedDocument {
        flags,
        file,
        thumb,
        mime_type: media.mime_type.clone(),
        attributes: encode_file_attributes(&media.attributes),
        caption,
        stickers: None,
        ttl_seconds,
    }
}

fn secret_content(resource: UploadedResource) -> Option<OutgoingContent> {
    match resource {
        UploadedResource::Secret { file, size, key } => {
            Some(OutgoingContent::SecretMedia { file, size, key })
        }
        UploadedResource::Plain(_) => None,
    }
}

/// Single upload of the largest rendition
pub(crate) fn image_pipeline(
    ctx: UploadContext,
    peer_id: PeerId,
    image: ImageMedia,
    text: String,
    attributes: Vec<MessageAttribute>,
    cancel: CancellationToken,
) -> UploadStream {
    let Some(largest) = largest_image_representation(&image.representations) else {
        return Box::pin(futures_util::stream::once(async move {
            Ok(UploadEvent::Content(OutgoingContent::Text(text)))
        }));
    };

    let encrypt = peer_id.is_secret_chat();
    let ttl_seconds = attributes.autoremove_timeout().map(|timeout| timeout.timeout);
    let request =
        UploadRequest::new(largest.resource.clone(), MediaStatsCategory::Image).encrypted(encrypt);
    info!(peer = %peer_id, resource = %request.resource.id(), encrypt, "Uploading image");

    Box::pin(async_stream::stream! {
        let mut upload = upload_resource(ctx.transport.as_ref(), request);
        loop {
            let event = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(UploadError::Cancelled),
                event = upload.next() => event.unwrap_or_else(|| {
                    Err(UploadError::failed("transport finished without an uploaded file"))
                }),
            };
            match event {
                Ok(ResourceUploadEvent::Progress(progress)) => yield Ok(UploadEvent::Progress(progress)),
                Ok(ResourceUploadEvent::Uploaded(UploadedResource::Plain(file))) => {
                    yield Ok(UploadEvent::Content(OutgoingContent::Media(
                        uploaded_photo(file, text, ttl_seconds),
                    )));
                    return;
                }
                Ok(ResourceUploadEvent::Uploaded(secret)) => {
                    if let Some(content) = secret_content(secret) {
                        yield Ok(UploadEvent::Content(content));
                    }
                    return;
                }
                Err(err) => {
                    debug!(error = %err, "Image pipeline terminated");
                    yield Err(err);
                    return;
                }
            }
        }
    })
}

enum JoinStep {
    Cancelled,
    Upload(Option<UploadResult<ResourceUploadEvent>>),
    Thumbnail(Option<UploadResult<ThumbnailState>>),
}

/// Primary upload, transform and thumbnail, joined
pub(crate) fn file_pipeline(
    ctx: UploadContext,
    peer_id: PeerId,
    message_id: Option<MessageId>,
    file: FileMedia,
    text: String,
    attributes: Vec<MessageAttribute>,
    cancel: CancellationToken,
) -> UploadStream {
    let encrypt = peer_id.is_secret_chat();
    let ttl_seconds = attributes.autoremove_timeout().map(|timeout| timeout.timeout);
    let already_transformed = attributes.media_already_transformed();
    let request = UploadRequest::new(file.resource.clone(), stats_category(&file.attributes))
        .encrypted(encrypt)
        .with_size_hint(file.size.or_else(|| file.resource.local_reference_size()));
    info!(
        peer = %peer_id,
        resource = %request.resource.id(),
        encrypt,
        category = ?request.category,
        "Uploading file"
    );

    Box::pin(async_stream::stream! {
        let mut upload = upload_resource(ctx.transport.as_ref(), request);
        let transform = transform_stage(ctx.clone(), message_id, already_transformed, file.clone());
        let mut thumbnail = thumbnail_stage(ctx.clone(), transform);

        let mut uploaded: Option<UploadedResource> = None;
        let mut thumbnail_state = ThumbnailState::Pending;

        while uploaded.is_none() || thumbnail_state.is_pending() {
            let step = tokio::select! {
                biased;
                _ = cancel.cancelled() => JoinStep::Cancelled,
                event = upload.next(), if uploaded.is_none() => JoinStep::Upload(event),
                state = thumbnail.next(), if thumbnail_state.is_pending() => JoinStep::Thumbnail(state),
            };
            match step {
                JoinStep::Cancelled => {
                    debug!("File pipeline cancelled");
                    yield Err(UploadError::Cancelled);
                    return;
                }
                JoinStep::Upload(Some(Ok(ResourceUploadEvent::Progress(progress)))) => {
                    yield Ok(UploadEvent::Progress(progress));
                }
                JoinStep::Upload(Some(Ok(ResourceUploadEvent::Uploaded(resource)))) => {
                    if thumbnail_state.is_pending() {
                        debug!("Primary upload finished, waiting for thumbnail");
                    }
                    uploaded = Some(resource);
                }
                JoinStep::Upload(Some(Err(err))) => {
                    yield Err(err);
                    return;
                }
                JoinStep::Upload(None) => {
                    yield Err(UploadError::failed("transport finished without an uploaded file"));
                    return;
                }
                JoinStep::Thumbnail(Some(Ok(state))) => thumbnail_state = state,
                JoinStep::Thumbnail(Some(Err(err))) => {
                    warn!(error = %err, "Thumbnail upload failed");
                    yield Err(err);
                    return;
                }
                JoinStep::Thumbnail(None) => {
                    yield Err(UploadError::failed("thumbnail stage finished without a result"));
                    return;
                }
            }
        }

        let thumb = match thumbnail_state {
            ThumbnailState::Done(thumb) => thumb,
            ThumbnailState::Pending => None,
        };
        let content = match uploaded {
            Some(UploadedResource::Plain(handle)) => OutgoingContent::Media(
                uploaded_document(handle, thumb, &file, text, ttl_seconds),
            ),
            Some(secret) => match secret_content(secret) {
                Some(content) => content,
                None => {
                    yield Err(UploadError::failed("unexpected upload result"));
                    return;
                }
            },
            None => {
                yield Err(UploadError::failed("transport finished without an uploaded file"));
                return;
            }
        };
        yield Ok(UploadEvent::Content(content));
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_core::api::DocumentAttribute;
    use courier_core::{FileAttribute, MediaResource};

    fn input_file(id: i64) -> InputFile {
        InputFile::Small {
            id,
            parts: 1,
            name: format!("file-{}", id),
            md5_checksum: String::new(),
        }
    }

    #[test]
    fn photo_ttl_sets_bit_and_value() {
        let media = uploaded_photo(input_file(1), "c".into(), Some(15));
        assert_eq!(media.flags(), InputMedia::HAS_TTL);
        match media {
            InputMedia::UploadedPhoto { ttl_seconds, .. } => assert_eq!(ttl_seconds, Some(15)),
            other => panic!("unexpected media {:?}", other),
        }
        assert_eq!(uploaded_photo(input_file(1), String::new(), None).flags(), 0);
    }

    #[test]
    fn document_flags_follow_optional_fields() {
        let file = FileMedia::new(MediaResource::LocalFile { file_id: 3 }, "audio/ogg")
            .with_attribute(FileAttribute::Audio {
                is_voice: true,
                duration: 4,
                title: None,
                performer: None,
                waveform: None,
            });

        let with_thumb = uploaded_document(input_file(1), Some(input_file(2)), &file, "x".into(), None);
        assert_eq!(with_thumb.flags(), InputMedia::HAS_THUMB);

        let bare = uploaded_document(input_file(1), None, &file, "x".into(), Some(5));
        assert_eq!(bare.flags(), InputMedia::HAS_TTL);
        match bare {
            InputMedia::UploadedDocument {
                thumb,
                mime_type,
                attributes,
                caption,
                ..
            } => {
                assert_eq!(thumb, None);
                assert_eq!(mime_type, "audio/ogg");
                assert_eq!(caption, "x");
                assert_eq!(attributes[0].flags(), DocumentAttribute::AUDIO_VOICE);
            }
            other => panic!("unexpected media {:?}", other),
        }
    }
}
