use courier_core::api::InputFile;
use courier_core::media::smallest_image_representation;
use courier_core::Media;
use futures_util::StreamExt;
use tracing::{debug, instrument, warn};

use crate::adapter::{upload_resource, ResourceUploadEvent, UploadedResource};
use crate::content::{ThumbnailState, TransformState};
use crate::context::UploadContext;
use crate::error::UploadResult;
use crate::transport::{BoxStream, MediaStatsCategory, UploadRequest};

/// Thumbnail stage of the file pipeline.
///
/// Waits for the transform stage to settle, then uploads the smallest
/// preview of the resulting media. Yields `Pending` first and exactly one
/// `Done` unless the preview upload fails.
pub fn thumbnail_stage(
    ctx: UploadContext,
    mut transform: BoxStream<TransformState>,
) -> BoxStream<UploadResult<ThumbnailState>> {
    Box::pin(async_stream::stream! {
        yield Ok(ThumbnailState::Pending);

        let mut media = None;
        while let Some(state) = transform.next().await {
            if let TransformState::Done(done) = state {
                media = Some(done);
                break;
            }
        }
        let Some(media) = media else {
            warn!("Transform stage ended without a result; sending without thumbnail");
            yield Ok(ThumbnailState::Done(None));
            return;
        };

        match upload_thumbnail(&ctx, &media).await {
            Ok(thumbnail) => yield Ok(ThumbnailState::Done(thumbnail)),
            Err(err) => yield Err(err),
        }
    })
}

/// Upload the smallest preview of `media`, never encrypted
#[instrument(skip_all, fields(media = ?media.id()))]
async fn upload_thumbnail(ctx: &UploadContext, media: &Media) -> UploadResult<Option<InputFile>> {
    if !ctx.config.upload_thumbnails {
        return Ok(None);
    }
    let Some(preview) = media
        .as_file()
        .and_then(|file| smallest_image_representation(&file.preview_representations))
    else {
        return Ok(None);
    };

    let request = UploadRequest::new(preview.resource.clone(), MediaStatsCategory::Image);
    let mut events = upload_resource(ctx.transport.as_ref(), request);
    while let Some(event) = events.next().await {
        match event? {
            ResourceUploadEvent::Progress(_) => {}
            ResourceUploadEvent::Uploaded(UploadedResource::Plain(file)) => {
                debug!(file = file.id(), "Uploaded thumbnail");
                return Ok(Some(file));
            }
            ResourceUploadEvent::Uploaded(UploadedResource::Secret { .. }) => {
                warn!("Transport returned an encrypted thumbnail; ignoring it");
                return Ok(None);
            }
        }
    }
    warn!("Thumbnail upload ended without a file");
    Ok(None)
}
