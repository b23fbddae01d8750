use serde::{Deserialize, Serialize};

use crate::media::FileMedia;

/// Namespace grouping item collections of one kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemCollectionNamespace(pub i32);

impl ItemCollectionNamespace {
    pub const CLOUD_STICKER_PACKS: Self = Self(0);
    pub const CLOUD_MASK_PACKS: Self = Self(1);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemCollectionId {
    pub namespace: ItemCollectionNamespace,
    pub id: i64,
}

impl ItemCollectionId {
    pub fn new(namespace: ItemCollectionNamespace, id: i64) -> Self {
        Self { namespace, id }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct StickerPackFlags {
    pub official: bool,
    pub masks: bool,
}

/// Description of an installed sticker pack
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StickerPackCollectionInfo {
    pub id: ItemCollectionId,
    pub flags: StickerPackFlags,
    pub access_hash: i64,
    pub title: String,
    pub short_name: String,
    pub hash: i32,
}

/// Position of an item inside its collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemCollectionItemIndex {
    pub index: i32,
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StickerPackItem {
    pub index: ItemCollectionItemIndex,
    pub file: FileMedia,
    /// Search keys (emoticons) under which the sticker is found
    pub index_keys: Vec<Vec<u8>>,
}

/// One stored collection: its description plus its items in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemCollection {
    pub id: ItemCollectionId,
    pub info: StickerPackCollectionInfo,
    pub items: Vec<StickerPackItem>,
}

impl ItemCollection {
    pub fn new(info: StickerPackCollectionInfo, items: Vec<StickerPackItem>) -> Self {
        Self {
            id: info.id,
            info,
            items,
        }
    }
}
