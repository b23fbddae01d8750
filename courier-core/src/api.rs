//! Wire-level protocol descriptors.
//!
//! These types mirror the backend's schema one-to-one: field names, optional
//! fields and the integer `flags` that announce which optional fields are
//! present. Every structure owns its own flag space, so bit 0 of a sticker
//! attribute has nothing to do with bit 0 of an audio attribute.

use serde::{Deserialize, Serialize};

/// Handle of a file uploaded in plain form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputFile {
    /// File uploaded through the small-file path.
    Small {
        id: i64,
        parts: i32,
        name: String,
        md5_checksum: String,
    },
    /// File uploaded through the big-file path (no checksum).
    Big { id: i64, parts: i32, name: String },
}

impl InputFile {
    /// Client-chosen id of the uploaded file
    pub fn id(&self) -> i64 {
        match self {
            Self::Small { id, .. } | Self::Big { id, .. } => *id,
        }
    }

    /// Number of parts the file was uploaded in
    pub fn parts(&self) -> i32 {
        match self {
            Self::Small { parts, .. } | Self::Big { parts, .. } => *parts,
        }
    }
}

/// Handle of a file uploaded for an end-to-end encrypted conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEncryptedFile {
    Uploaded {
        id: i64,
        parts: i32,
        md5_checksum: String,
        key_fingerprint: i32,
    },
    BigUploaded {
        id: i64,
        parts: i32,
        key_fingerprint: i32,
    },
}

impl InputEncryptedFile {
    pub fn id(&self) -> i64 {
        match self {
            Self::Uploaded { id, .. } | Self::BigUploaded { id, .. } => *id,
        }
    }
}

/// Key material an encrypted upload was sealed with.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretFileEncryptionKey {
    pub aes_key: Vec<u8>,
    pub aes_iv: Vec<u8>,
}

impl SecretFileEncryptionKey {
    pub fn new(aes_key: Vec<u8>, aes_iv: Vec<u8>) -> Self {
        Self { aes_key, aes_iv }
    }
}

// Key bytes never end up in logs.
impl std::fmt::Debug for SecretFileEncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretFileEncryptionKey")
            .field("aes_key", &format_args!("<{} bytes>", self.aes_key.len()))
            .field("aes_iv", &format_args!("<{} bytes>", self.aes_iv.len()))
            .finish()
    }
}

/// Reference to a document already stored on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputDocument {
    pub id: i64,
    pub access_hash: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputGeoPoint {
    pub lat: f64,
    pub long: f64,
}

/// Reference to a sticker set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputStickerSet {
    /// Explicit "no set" sentinel.
    Empty,
    Id { id: i64, access_hash: i64 },
    ShortName { short_name: String },
}

/// Placement of a mask sticker relative to a face feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaskCoords {
    pub n: i32,
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

/// Attribute attached to an uploaded document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DocumentAttribute {
    ImageSize {
        w: i32,
        h: i32,
    },
    Animated,
    Sticker {
        flags: i32,
        alt: String,
        stickerset: InputStickerSet,
        mask_coords: Option<MaskCoords>,
    },
    Video {
        flags: i32,
        duration: i32,
        w: i32,
        h: i32,
    },
    Audio {
        flags: i32,
        duration: i32,
        title: Option<String>,
        performer: Option<String>,
        waveform: Option<Vec<u8>>,
    },
    Filename {
        file_name: String,
    },
    HasStickers,
}

impl DocumentAttribute {
    /// `Sticker.flags`: `mask_coords` is present
    pub const STICKER_HAS_MASK_COORDS: i32 = 1 << 0;
    /// `Video.flags`: round (instant) video message
    pub const VIDEO_ROUND_MESSAGE: i32 = 1 << 0;
    /// `Audio.flags`: `title` is present
    pub const AUDIO_HAS_TITLE: i32 = 1 << 0;
    /// `Audio.flags`: `performer` is present
    pub const AUDIO_HAS_PERFORMER: i32 = 1 << 1;
    /// `Audio.flags`: `waveform` is present
    pub const AUDIO_HAS_WAVEFORM: i32 = 1 << 2;
    /// `Audio.flags`: the audio is a voice note
    pub const AUDIO_VOICE: i32 = 1 << 10;

    /// The flag integer of this attribute, zero for flagless variants
    pub fn flags(&self) -> i32 {
        match self {
            Self::Sticker { flags, .. } | Self::Video { flags, .. } | Self::Audio { flags, .. } => {
                *flags
            }
            _ => 0,
        }
    }
}

/// Media payload of an outgoing message request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputMedia {
    UploadedPhoto {
        flags: i32,
        file: InputFile,
        caption: String,
        stickers: Option<Vec<InputDocument>>,
        ttl_seconds: Option<i32>,
    },
    UploadedDocument {
        flags: i32,
        file: InputFile,
        thumb: Option<InputFile>,
        mime_type: String,
        attributes: Vec<DocumentAttribute>,
        caption: String,
        stickers: Option<Vec<InputDocument>>,
        ttl_seconds: Option<i32>,
    },
    Document {
        id: InputDocument,
        caption: String,
    },
    Contact {
        phone_number: String,
        first_name: String,
        last_name: String,
    },
    GeoPoint {
        geo_point: InputGeoPoint,
    },
    Venue {
        geo_point: InputGeoPoint,
        title: String,
        address: String,
        provider: String,
        venue_id: String,
        venue_type: String,
    },
}

impl InputMedia {
    /// `UploadedPhoto.flags` / `UploadedDocument.flags`: `stickers` is present
    pub const HAS_STICKERS: i32 = 1 << 0;
    /// `UploadedPhoto.flags` / `UploadedDocument.flags`: `ttl_seconds` is present
    pub const HAS_TTL: i32 = 1 << 1;
    /// `UploadedDocument.flags`: `thumb` is present
    pub const HAS_THUMB: i32 = 1 << 2;

    /// The flag integer for the uploaded variants, zero otherwise
    pub fn flags(&self) -> i32 {
        match self {
            Self::UploadedPhoto { flags, .. } | Self::UploadedDocument { flags, .. } => *flags,
            _ => 0,
        }
    }
}

/// Server-side sticker set description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickerSet {
    pub flags: i32,
    pub id: i64,
    pub access_hash: i64,
    pub title: String,
    pub short_name: String,
    pub count: i32,
    pub hash: i32,
}

impl StickerSet {
    pub const INSTALLED: i32 = 1 << 0;
    pub const ARCHIVED: i32 = 1 << 1;
    pub const OFFICIAL: i32 = 1 << 2;
    pub const MASKS: i32 = 1 << 3;
}

/// Emoticon to documents mapping inside a sticker set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickerPack {
    pub emoticon: String,
    pub documents: Vec<i64>,
}

/// Document as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Document {
    Empty {
        id: i64,
    },
    Document {
        id: i64,
        access_hash: i64,
        date: i32,
        mime_type: String,
        size: i32,
        dc_id: i32,
        version: i32,
        attributes: Vec<DocumentAttribute>,
    },
}

/// Full sticker set returned by a sticker set request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StickerSetContents {
    pub set: StickerSet,
    pub packs: Vec<StickerPack>,
    pub documents: Vec<Document>,
}

/// Archived set reported back when installing pushed other sets out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StickerSetCovered {
    Covered { set: StickerSet, cover: Document },
    MultiCovered { set: StickerSet, covers: Vec<Document> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StickerSetInstallResult {
    Success,
    Archive { sets: Vec<StickerSetCovered> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_bits_match_protocol_layout() {
        assert_eq!(InputMedia::HAS_TTL, 2);
        assert_eq!(InputMedia::HAS_THUMB, 4);
        assert_eq!(DocumentAttribute::AUDIO_VOICE, 1024);
        assert_eq!(DocumentAttribute::AUDIO_HAS_WAVEFORM, 4);
    }

    #[test]
    fn encryption_key_debug_hides_bytes() {
        let key = SecretFileEncryptionKey::new(vec![7; 32], vec![9; 32]);
        let rendered = format!("{:?}", key);
        assert!(rendered.contains("<32 bytes>"));
        assert!(!rendered.contains('7'));
    }
}
