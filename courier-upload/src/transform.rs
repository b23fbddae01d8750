use std::sync::Arc;

use async_trait::async_trait;
use courier_core::store::modify;
use courier_core::{
    FileMedia, ForwardInfo, Media, MessageAttribute, MessageAttributes, MessageId, MessageStore,
    MessageUpdate, OutgoingMessageFlags, OutgoingMessageInfo, StoreError, StoredMessage,
};
use tracing::{debug, error, info, instrument, warn};

use crate::context::UploadContext;
use crate::content::TransformState;
use crate::transport::{BoxStream, UploadTransport};

/// Caller-supplied rewrite of file media before upload, such as re-encoding.
///
/// Returning `None` keeps the original media. Failures are expected to be
/// handled here and reported as `None`.
#[async_trait]
pub trait MediaTransform: Send + Sync {
    async fn transform(
        &self,
        store: &dyn MessageStore,
        transport: &dyn UploadTransport,
        file: &FileMedia,
        is_retry: bool,
    ) -> Option<Media>;
}

/// Transform stage of the file pipeline.
///
/// Yields `Pending` first, then exactly one `Done`. Without a transform or a
/// message id, or when the message is already marked, `Done` carries the
/// original media and nothing is persisted.
pub fn transform_stage(
    ctx: UploadContext,
    message_id: Option<MessageId>,
    already_transformed: bool,
    file: FileMedia,
) -> BoxStream<TransformState> {
    Box::pin(async_stream::stream! {
        let runnable = match (ctx.transform(), message_id) {
            (Some(transform), Some(id)) if !already_transformed => Some((transform.clone(), id)),
            _ => None,
        };
        yield TransformState::Pending;
        match runnable {
            Some((transform, id)) => {
                yield TransformState::Done(run_transform(&ctx, transform, id, file).await);
            }
            None => yield TransformState::Done(Media::File(file)),
        }
    })
}

#[instrument(skip_all, fields(message = %message_id))]
async fn run_transform(
    ctx: &UploadContext,
    transform: Arc<dyn MediaTransform>,
    message_id: MessageId,
    file: FileMedia,
) -> Media {
    // The caller's attribute snapshot may be stale after a retry.
    match modify(ctx.store.as_ref(), move |txn| Ok(txn.message(&message_id))).await {
        Ok(Some(message)) if message.attributes.media_already_transformed() => {
            debug!("Media already transformed by an earlier attempt");
            return first_file(message).unwrap_or(Media::File(file));
        }
        Ok(_) => {}
        Err(err) => warn!(error = %err, "Could not read message before transform"),
    }

    let replacement = match transform
        .transform(ctx.store.as_ref(), ctx.transport.as_ref(), &file, false)
        .await
    {
        Some(replacement) => replacement,
        None => {
            debug!("Transform kept the original media");
            return Media::File(file);
        }
    };

    let Some(media_id) = replacement.id() else {
        warn!("Transformed media has no id; uploading it without persisting");
        return replacement;
    };

    let persisted = replacement.clone();
    let outcome = modify(ctx.store.as_ref(), move |txn| {
        let current = txn
            .message(&message_id)
            .ok_or_else(|| StoreError::message_not_found(message_id))?;
        if current.attributes.media_already_transformed() {
            return Ok(Some(first_file(current)));
        }
        txn.update_media(&media_id, persisted);
        txn.update_message(&message_id, &mut mark_media_transformed)?;
        Ok(None)
    })
    .await;

    match outcome {
        Ok(None) => {
            info!(media = %media_id, "Persisted transformed media");
            replacement
        }
        Ok(Some(existing)) => {
            debug!("Another attempt persisted its transform first");
            existing.unwrap_or(replacement)
        }
        Err(err) => {
            error!(media = %media_id, error = %err, "Failed to persist transformed media");
            Media::File(file)
        }
    }
}

fn first_file(message: StoredMessage) -> Option<Media> {
    message
        .media
        .into_iter()
        .next()
        .filter(|media| matches!(media, Media::File(_)))
}

/// Set the transformed marker, leaving every other field as it was.
///
/// Forward provenance is carried over without its author signature.
fn mark_media_transformed(current: &StoredMessage) -> MessageUpdate {
    let mut attributes = current.attributes.clone();
    let existing = attributes.iter_mut().find_map(|attribute| match attribute {
        MessageAttribute::OutgoingInfo(info) => Some(info),
        _ => None,
    });
    match existing {
        Some(info) => {
            *info =
                info.with_updated_flags(info.flags.union(OutgoingMessageFlags::TRANSFORMED_MEDIA));
        }
        None => attributes.push(MessageAttribute::OutgoingInfo(OutgoingMessageInfo::new(
            rand::random(),
            OutgoingMessageFlags::TRANSFORMED_MEDIA,
        ))),
    }

    let forward_info = current.forward_info.as_ref().map(|info| ForwardInfo {
        author_signature: None,
        ..info.clone()
    });

    MessageUpdate::Update(StoredMessage {
        attributes,
        forward_info,
        ..current.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_core::{MessageFlags, PeerId, PeerNamespace, ReplyInfo};

    fn message() -> StoredMessage {
        let peer = PeerId::new(PeerNamespace::User, 5);
        StoredMessage::outgoing(MessageId::local(peer, 1), 100, "caption")
    }

    fn updated(message: &StoredMessage) -> StoredMessage {
        match mark_media_transformed(message) {
            MessageUpdate::Update(updated) => updated,
            MessageUpdate::Skip => panic!("marker update skipped"),
        }
    }

    #[test]
    fn existing_outgoing_info_keeps_unique_id() {
        let original = message().with_attribute(MessageAttribute::OutgoingInfo(
            OutgoingMessageInfo::new(77, OutgoingMessageFlags::empty()),
        ));
        let result = updated(&original);
        let info = result.attributes.outgoing_info().unwrap();
        assert_eq!(info.unique_id, 77);
        assert!(result.attributes.media_already_transformed());
        assert_eq!(result.attributes.len(), 1);
    }

    #[test]
    fn missing_outgoing_info_is_appended() {
        let peer = PeerId::new(PeerNamespace::User, 5);
        let reply = MessageAttribute::Reply(ReplyInfo {
            message_id: MessageId::local(peer, 0),
        });
        let original = message().with_attribute(reply.clone());
        let result = updated(&original);
        assert_eq!(result.attributes.len(), 2);
        assert_eq!(result.attributes[0], reply);
        assert!(result.attributes.media_already_transformed());
    }

    #[test]
    fn other_fields_survive_and_signature_is_dropped() {
        let mut original = message().with_forward_info(ForwardInfo {
            author_id: PeerId::new(PeerNamespace::Channel, 9),
            source_id: None,
            source_message_id: None,
            date: 42,
            author_signature: Some("editor".into()),
        });
        original.flags = MessageFlags::UNSENT;
        original.tags = 3;

        let result = updated(&original);
        assert_eq!(result.text, original.text);
        assert_eq!(result.timestamp, original.timestamp);
        assert_eq!(result.flags, original.flags);
        assert_eq!(result.tags, 3);
        let forward = result.forward_info.unwrap();
        assert_eq!(forward.date, 42);
        assert_eq!(forward.author_signature, None);
    }
}
