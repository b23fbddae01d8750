use courier_core::api::{InputGeoPoint, InputMedia};
use courier_core::media::largest_image_representation;
use courier_core::{MapMedia, Media, MessageAttribute, MessageAttributes, MessageId, PeerId, StoredMessage};
use tokio_util::sync::CancellationToken;

use crate::content::{ContentResolution, OutgoingContent};
use crate::context::UploadContext;
use crate::pipeline::{file_pipeline, image_pipeline};

/// Inputs of content resolution for one message
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMessage {
    pub peer_id: PeerId,
    /// Absent for previews and drafts; disables the transform stage
    pub message_id: Option<MessageId>,
    pub attributes: Vec<MessageAttribute>,
    pub text: String,
    pub media: Vec<Media>,
}

impl OutgoingMessage {
    pub fn new(peer_id: PeerId, text: impl Into<String>) -> Self {
        Self {
            peer_id,
            message_id: None,
            attributes: Vec::new(),
            text: text.into(),
            media: Vec::new(),
        }
    }

    pub fn with_message_id(mut self, message_id: MessageId) -> Self {
        self.message_id = Some(message_id);
        self
    }

    pub fn with_attribute(mut self, attribute: MessageAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_media(mut self, media: impl Into<Media>) -> Self {
        self.media.push(media.into());
        self
    }
}

impl From<&StoredMessage> for OutgoingMessage {
    fn from(message: &StoredMessage) -> Self {
        Self {
            peer_id: message.id.peer_id,
            message_id: Some(message.id),
            attributes: message.attributes.clone(),
            text: message.text.clone(),
            media: message.media.clone(),
        }
    }
}

/// Decide how a message is sent. Nothing runs until a returned pipeline is
/// polled.
pub fn resolve_content(
    ctx: &UploadContext,
    message: OutgoingMessage,
    cancel: CancellationToken,
) -> ContentResolution {
    let OutgoingMessage {
        peer_id,
        message_id,
        attributes,
        text,
        media,
    } = message;

    if let Some(source) = attributes.forward_source() {
        return ContentResolution::Ready(OutgoingContent::Forward(source.clone()));
    }
    if let Some(result) = attributes.inline_result() {
        return ContentResolution::Ready(OutgoingContent::InlineResult(result.clone()));
    }

    // Only the first media item is sent.
    let Some(first) = media.into_iter().next() else {
        return ContentResolution::Ready(OutgoingContent::Text(text));
    };

    match first {
        Media::Image(image) if largest_image_representation(&image.representations).is_some() => {
            ContentResolution::Pipeline(image_pipeline(
                ctx.clone(),
                peer_id,
                image,
                text,
                attributes,
                cancel,
            ))
        }
        Media::File(file) => match file.resource.server_document() {
            Some(document) => ContentResolution::Ready(OutgoingContent::Media(InputMedia::Document {
                id: document,
                caption: text,
            })),
            None => ContentResolution::Pipeline(file_pipeline(
                ctx.clone(),
                peer_id,
                message_id,
                file,
                text,
                attributes,
                cancel,
            )),
        },
        Media::Contact(contact) => ContentResolution::Ready(OutgoingContent::Media(InputMedia::Contact {
            phone_number: contact.phone_number,
            first_name: contact.first_name,
            last_name: contact.last_name,
        })),
        Media::Map(map) => ContentResolution::Ready(OutgoingContent::Media(map_media(map))),
        Media::Image(_) | Media::WebPage(_) => ContentResolution::Ready(OutgoingContent::Text(text)),
    }
}

fn map_media(map: MapMedia) -> InputMedia {
    let geo_point = InputGeoPoint {
        lat: map.latitude,
        long: map.longitude,
    };
    match map.venue {
        Some(venue) => InputMedia::Venue {
            geo_point,
            title: venue.title,
            address: venue.address.unwrap_or_default(),
            provider: venue.provider.unwrap_or_default(),
            venue_id: venue.id.unwrap_or_default(),
            venue_type: venue.venue_type.unwrap_or_default(),
        },
        None => InputMedia::GeoPoint { geo_point },
    }
}
