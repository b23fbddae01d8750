//! Semantic file attributes to protocol document attributes.
//!
//! Every protocol attribute carries its own `flags` integer; bit positions
//! are only meaningful within the variant that owns them.

use courier_core::api::{DocumentAttribute, InputStickerSet, MaskCoords};
use courier_core::FileAttribute;

use crate::transport::MediaStatsCategory;

/// Encode one semantic attribute
pub fn encode_file_attribute(attribute: &FileAttribute) -> DocumentAttribute {
    match attribute {
        FileAttribute::Animated => DocumentAttribute::Animated,
        FileAttribute::FileName { file_name } => DocumentAttribute::Filename {
            file_name: file_name.clone(),
        },
        FileAttribute::ImageSize { size } => DocumentAttribute::ImageSize {
            w: size.width,
            h: size.height,
        },
        FileAttribute::Sticker {
            display_text,
            pack_reference,
            mask_data,
        } => {
            let mut flags = 0;
            if mask_data.is_some() {
                flags |= DocumentAttribute::STICKER_HAS_MASK_COORDS;
            }
            DocumentAttribute::Sticker {
                flags,
                alt: display_text.clone(),
                stickerset: pack_reference
                    .as_ref()
                    .map(|reference| reference.to_input_sticker_set())
                    .unwrap_or(InputStickerSet::Empty),
                mask_coords: mask_data.map(|mask| MaskCoords {
                    n: mask.n,
                    x: mask.x,
                    y: mask.y,
                    zoom: mask.zoom,
                }),
            }
        }
        FileAttribute::HasLinkedStickers => DocumentAttribute::HasStickers,
        FileAttribute::Video {
            duration,
            size,
            flags,
        } => DocumentAttribute::Video {
            flags: if flags.instant_round_video {
                DocumentAttribute::VIDEO_ROUND_MESSAGE
            } else {
                0
            },
            duration: *duration,
            w: size.width,
            h: size.height,
        },
        FileAttribute::Audio {
            is_voice,
            duration,
            title,
            performer,
            waveform,
        } => {
            let mut flags = 0;
            if *is_voice {
                flags |= DocumentAttribute::AUDIO_VOICE;
            }
            if title.is_some() {
                flags |= DocumentAttribute::AUDIO_HAS_TITLE;
            }
            if performer.is_some() {
                flags |= DocumentAttribute::AUDIO_HAS_PERFORMER;
            }
            if waveform.is_some() {
                flags |= DocumentAttribute::AUDIO_HAS_WAVEFORM;
            }
            DocumentAttribute::Audio {
                flags,
                duration: *duration,
                title: title.clone(),
                performer: performer.clone(),
                waveform: waveform.clone(),
            }
        }
    }
}

/// Encode an attribute list, one output per input, order preserved
pub fn encode_file_attributes(attributes: &[FileAttribute]) -> Vec<DocumentAttribute> {
    attributes.iter().map(encode_file_attribute).collect()
}

/// Statistics category of a file upload: the first audio or video
/// attribute decides, anything else counts as a plain file
pub fn stats_category(attributes: &[FileAttribute]) -> MediaStatsCategory {
    attributes
        .iter()
        .find_map(|attribute| match attribute {
            FileAttribute::Audio { .. } => Some(MediaStatsCategory::Audio),
            FileAttribute::Video { .. } => Some(MediaStatsCategory::Video),
            _ => None,
        })
        .unwrap_or(MediaStatsCategory::File)
}
