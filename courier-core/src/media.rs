//! Semantic media model attached to messages.
//!
//! This is the client-side view of media. The protocol view lives in
//! [`crate::api`]; the upload pipeline translates one into the other.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::api;
use crate::ids::MediaId;

/// Stable key the transport uses to find the bytes of a resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId(pub String);

impl ResourceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where the bytes of a piece of media can be found
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaResource {
    /// Document already stored server-side; can be referenced without uploading.
    CloudDocument {
        datacenter_id: i32,
        file_id: i64,
        access_hash: i64,
        size: Option<u64>,
    },
    /// Photo location on the server.
    CloudFile {
        datacenter_id: i32,
        volume_id: i64,
        local_id: i32,
        secret: i64,
        size: Option<u64>,
    },
    /// Bytes written to the local media cache.
    LocalFile { file_id: i64 },
    /// A file on disk referenced in place.
    LocalFileReference {
        local_file_path: String,
        random_id: i64,
        size: Option<u64>,
    },
}

impl MediaResource {
    pub fn id(&self) -> ResourceId {
        let id = match self {
            Self::CloudDocument {
                datacenter_id,
                file_id,
                ..
            } => format!("cloud-document-{}-{}", datacenter_id, file_id),
            Self::CloudFile {
                datacenter_id,
                volume_id,
                local_id,
                ..
            } => format!("cloud-file-{}-{}-{}", datacenter_id, volume_id, local_id),
            Self::LocalFile { file_id } => format!("local-file-{}", file_id),
            Self::LocalFileReference { random_id, .. } => format!("local-file-ref-{}", random_id),
        };
        ResourceId(id)
    }

    /// Server reference for resources that were uploaded before
    pub fn server_document(&self) -> Option<api::InputDocument> {
        match self {
            Self::CloudDocument {
                file_id,
                access_hash,
                ..
            } => Some(api::InputDocument {
                id: *file_id,
                access_hash: *access_hash,
            }),
            _ => None,
        }
    }

    /// Size known for resources referencing a local file in place
    pub fn local_reference_size(&self) -> Option<u64> {
        match self {
            Self::LocalFileReference { size, .. } => *size,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelDimensions {
    pub width: i32,
    pub height: i32,
}

impl PixelDimensions {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> i64 {
        i64::from(self.width) * i64::from(self.height)
    }
}

/// One rendition of an image
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRepresentation {
    pub dimensions: PixelDimensions,
    pub resource: MediaResource,
}

impl ImageRepresentation {
    pub fn new(dimensions: PixelDimensions, resource: MediaResource) -> Self {
        Self {
            dimensions,
            resource,
        }
    }
}

/// Rendition with the most pixels
pub fn largest_image_representation(
    representations: &[ImageRepresentation],
) -> Option<&ImageRepresentation> {
    representations.iter().max_by_key(|r| r.dimensions.area())
}

/// Rendition with the fewest pixels
pub fn smallest_image_representation(
    representations: &[ImageRepresentation],
) -> Option<&ImageRepresentation> {
    representations.iter().min_by_key(|r| r.dimensions.area())
}

/// Reference to a sticker pack
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StickerPackReference {
    Id { id: i64, access_hash: i64 },
    Name(String),
}

impl StickerPackReference {
    pub fn to_input_sticker_set(&self) -> api::InputStickerSet {
        match self {
            Self::Id { id, access_hash } => api::InputStickerSet::Id {
                id: *id,
                access_hash: *access_hash,
            },
            Self::Name(name) => api::InputStickerSet::ShortName {
                short_name: name.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StickerMaskCoords {
    pub n: i32,
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct VideoFlags {
    /// Round video message
    pub instant_round_video: bool,
}

/// Semantic description of a file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FileAttribute {
    Animated,
    FileName {
        file_name: String,
    },
    ImageSize {
        size: PixelDimensions,
    },
    Sticker {
        display_text: String,
        pack_reference: Option<StickerPackReference>,
        mask_data: Option<StickerMaskCoords>,
    },
    HasLinkedStickers,
    Video {
        duration: i32,
        size: PixelDimensions,
        flags: VideoFlags,
    },
    Audio {
        is_voice: bool,
        duration: i32,
        title: Option<String>,
        performer: Option<String>,
        waveform: Option<Vec<u8>>,
    },
}

impl FileAttribute {
    /// Inverse of the protocol encoding, used for documents coming from the server
    pub fn from_api(attribute: &api::DocumentAttribute) -> Self {
        match attribute {
            api::DocumentAttribute::ImageSize { w, h } => Self::ImageSize {
                size: PixelDimensions::new(*w, *h),
            },
            api::DocumentAttribute::Animated => Self::Animated,
            api::DocumentAttribute::Sticker {
                alt,
                stickerset,
                mask_coords,
                ..
            } => Self::Sticker {
                display_text: alt.clone(),
                pack_reference: match stickerset {
                    api::InputStickerSet::Empty => None,
                    api::InputStickerSet::Id { id, access_hash } => {
                        Some(StickerPackReference::Id {
                            id: *id,
                            access_hash: *access_hash,
                        })
                    }
                    api::InputStickerSet::ShortName { short_name } => {
                        Some(StickerPackReference::Name(short_name.clone()))
                    }
                },
                mask_data: mask_coords.map(|c| StickerMaskCoords {
                    n: c.n,
                    x: c.x,
                    y: c.y,
                    zoom: c.zoom,
                }),
            },
            api::DocumentAttribute::Video {
                flags,
                duration,
                w,
                h,
            } => Self::Video {
                duration: *duration,
                size: PixelDimensions::new(*w, *h),
                flags: VideoFlags {
                    instant_round_video: flags & api::DocumentAttribute::VIDEO_ROUND_MESSAGE != 0,
                },
            },
            api::DocumentAttribute::Audio {
                flags,
                duration,
                title,
                performer,
                waveform,
            } => Self::Audio {
                is_voice: flags & api::DocumentAttribute::AUDIO_VOICE != 0,
                duration: *duration,
                title: title.clone(),
                performer: performer.clone(),
                waveform: waveform.clone(),
            },
            api::DocumentAttribute::Filename { file_name } => Self::FileName {
                file_name: file_name.clone(),
            },
            api::DocumentAttribute::HasStickers => Self::HasLinkedStickers,
        }
    }
}

/// Image media: a set of renditions of the same picture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMedia {
    pub id: Option<MediaId>,
    pub representations: Vec<ImageRepresentation>,
}

/// Any non-image file: documents, audio, video, stickers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMedia {
    pub id: Option<MediaId>,
    pub resource: MediaResource,
    pub preview_representations: Vec<ImageRepresentation>,
    pub mime_type: String,
    pub size: Option<u64>,
    pub attributes: Vec<FileAttribute>,
}

impl FileMedia {
    pub fn new(resource: MediaResource, mime_type: impl Into<String>) -> Self {
        Self {
            id: None,
            resource,
            preview_representations: Vec::new(),
            mime_type: mime_type.into(),
            size: None,
            attributes: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: MediaId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_attribute(mut self, attribute: FileAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_preview(mut self, representation: ImageRepresentation) -> Self {
        self.preview_representations.push(representation);
        self
    }

    /// Build the client-side file for a server document; `Empty` documents yield nothing
    pub fn from_api_document(document: &api::Document) -> Option<Self> {
        match document {
            api::Document::Empty { .. } => None,
            api::Document::Document {
                id,
                access_hash,
                mime_type,
                size,
                dc_id,
                attributes,
                ..
            } => {
                let size = u64::try_from(*size).ok();
                Some(Self {
                    id: Some(MediaId::new(MediaId::CLOUD_FILE, *id)),
                    resource: MediaResource::CloudDocument {
                        datacenter_id: *dc_id,
                        file_id: *id,
                        access_hash: *access_hash,
                        size,
                    },
                    preview_representations: Vec::new(),
                    mime_type: mime_type.clone(),
                    size,
                    attributes: attributes.iter().map(FileAttribute::from_api).collect(),
                })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMedia {
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapVenue {
    pub title: String,
    pub address: Option<String>,
    pub provider: Option<String>,
    pub id: Option<String>,
    pub venue_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMedia {
    pub latitude: f64,
    pub longitude: f64,
    pub venue: Option<MapVenue>,
}

/// Link preview generated for a message; never sent as media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebPageMedia {
    pub url: String,
    pub title: Option<String>,
}

/// Media attached to a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Media {
    Image(ImageMedia),
    File(FileMedia),
    Contact(ContactMedia),
    Map(MapMedia),
    WebPage(WebPageMedia),
}

impl Media {
    pub fn id(&self) -> Option<MediaId> {
        match self {
            Self::Image(image) => image.id,
            Self::File(file) => file.id,
            Self::Contact(_) | Self::Map(_) | Self::WebPage(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileMedia> {
        match self {
            Self::File(file) => Some(file),
            _ => None,
        }
    }
}

impl From<FileMedia> for Media {
    fn from(file: FileMedia) -> Self {
        Self::File(file)
    }
}

impl From<ImageMedia> for Media {
    fn from(image: ImageMedia) -> Self {
        Self::Image(image)
    }
}
