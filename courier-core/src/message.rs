use serde::{Deserialize, Serialize};

use crate::ids::{MessageId, PeerId};
use crate::media::Media;

/// Where a forwarded message originally came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForwardSourceInfo {
    pub message_id: MessageId,
}

/// Result of an inline bot query picked by the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutgoingInlineResult {
    pub query_id: i64,
    pub result_id: String,
}

/// Self-destruct timer requested for the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AutoremoveTimeout {
    /// Seconds until removal
    pub timeout: i32,
    pub countdown_began_at: Option<i32>,
}

/// Flag set carried by [`OutgoingMessageInfo`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct OutgoingMessageFlags(u32);

impl OutgoingMessageFlags {
    /// The media transform already ran for this message
    pub const TRANSFORMED_MEDIA: Self = Self(1 << 0);

    pub fn empty() -> Self {
        Self(0)
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// Client-side bookkeeping for a message that is still being sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutgoingMessageInfo {
    pub unique_id: i64,
    pub flags: OutgoingMessageFlags,
}

impl OutgoingMessageInfo {
    pub fn new(unique_id: i64, flags: OutgoingMessageFlags) -> Self {
        Self { unique_id, flags }
    }

    pub fn with_updated_flags(self, flags: OutgoingMessageFlags) -> Self {
        Self { flags, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReplyInfo {
    pub message_id: MessageId,
}

/// Closed set of attributes a message can carry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageAttribute {
    ForwardSource(ForwardSourceInfo),
    InlineResult(OutgoingInlineResult),
    Autoremove(AutoremoveTimeout),
    OutgoingInfo(OutgoingMessageInfo),
    Reply(ReplyInfo),
}

/// Typed lookups over a message's attribute list.
pub trait MessageAttributes {
    fn forward_source(&self) -> Option<&ForwardSourceInfo>;
    fn inline_result(&self) -> Option<&OutgoingInlineResult>;
    fn autoremove_timeout(&self) -> Option<&AutoremoveTimeout>;
    fn outgoing_info(&self) -> Option<&OutgoingMessageInfo>;

    /// Whether the transform marker is set on the outgoing info attribute
    fn media_already_transformed(&self) -> bool {
        self.outgoing_info()
            .map(|info| info.flags.contains(OutgoingMessageFlags::TRANSFORMED_MEDIA))
            .unwrap_or(false)
    }
}

// Later attributes win, matching how repeated attributes overwrite each other on save.
impl MessageAttributes for [MessageAttribute] {
    fn forward_source(&self) -> Option<&ForwardSourceInfo> {
        self.iter().rev().find_map(|a| match a {
            MessageAttribute::ForwardSource(info) => Some(info),
            _ => None,
        })
    }

    fn inline_result(&self) -> Option<&OutgoingInlineResult> {
        self.iter().rev().find_map(|a| match a {
            MessageAttribute::InlineResult(result) => Some(result),
            _ => None,
        })
    }

    fn autoremove_timeout(&self) -> Option<&AutoremoveTimeout> {
        self.iter().rev().find_map(|a| match a {
            MessageAttribute::Autoremove(timeout) => Some(timeout),
            _ => None,
        })
    }

    fn outgoing_info(&self) -> Option<&OutgoingMessageInfo> {
        self.iter().find_map(|a| match a {
            MessageAttribute::OutgoingInfo(info) => Some(info),
            _ => None,
        })
    }
}

/// Provenance of a forwarded stored message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardInfo {
    pub author_id: PeerId,
    pub source_id: Option<PeerId>,
    pub source_message_id: Option<MessageId>,
    pub date: i32,
    pub author_signature: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MessageFlags(pub u32);

impl MessageFlags {
    pub const UNSENT: Self = Self(1 << 0);
    pub const FAILED: Self = Self(1 << 1);
    pub const INCOMING: Self = Self(1 << 2);
}

/// Message as held by the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: MessageId,
    pub globally_unique_id: Option<i64>,
    pub timestamp: i32,
    pub flags: MessageFlags,
    pub tags: u32,
    pub global_tags: u32,
    pub forward_info: Option<ForwardInfo>,
    pub author_id: Option<PeerId>,
    pub text: String,
    pub attributes: Vec<MessageAttribute>,
    pub media: Vec<Media>,
}

impl StoredMessage {
    /// Fresh unsent outgoing message
    pub fn outgoing(id: MessageId, timestamp: i32, text: impl Into<String>) -> Self {
        Self {
            id,
            globally_unique_id: None,
            timestamp,
            flags: MessageFlags::UNSENT,
            tags: 0,
            global_tags: 0,
            forward_info: None,
            author_id: None,
            text: text.into(),
            attributes: Vec::new(),
            media: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: MessageAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_media(mut self, media: Media) -> Self {
        self.media.push(media);
        self
    }

    pub fn with_forward_info(mut self, forward_info: ForwardInfo) -> Self {
        self.forward_info = Some(forward_info);
        self
    }
}
