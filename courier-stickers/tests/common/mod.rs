#![allow(dead_code)]

use async_trait::async_trait;
use courier_core::api::{
    Document, InputStickerSet, StickerPack, StickerSet, StickerSetContents,
    StickerSetInstallResult,
};
use courier_core::{ItemCollectionId, ItemCollectionNamespace, StickerPackCollectionInfo, StickerPackFlags};
use courier_stickers::{ApiError, StickerApi};
use parking_lot::Mutex;

/// Sticker API answering from canned responses and recording calls
#[derive(Default)]
pub struct FakeStickerApi {
    pub sticker_set: Mutex<Option<Result<StickerSetContents, ApiError>>>,
    pub install: Mutex<Option<Result<StickerSetInstallResult, ApiError>>>,
    pub uninstall: Mutex<Option<Result<bool, ApiError>>>,
    pub calls: Mutex<Vec<(&'static str, InputStickerSet)>>,
}

fn unscripted() -> ApiError {
    ApiError::request("no response scripted")
}

#[async_trait]
impl StickerApi for FakeStickerApi {
    async fn get_sticker_set(&self, set: InputStickerSet) -> Result<StickerSetContents, ApiError> {
        self.calls.lock().push(("get", set));
        self.sticker_set.lock().clone().unwrap_or_else(|| Err(unscripted()))
    }

    async fn install_sticker_set(
        &self,
        set: InputStickerSet,
        archived: bool,
    ) -> Result<StickerSetInstallResult, ApiError> {
        assert!(!archived, "sets are installed unarchived");
        self.calls.lock().push(("install", set));
        self.install.lock().clone().unwrap_or_else(|| Err(unscripted()))
    }

    async fn uninstall_sticker_set(&self, set: InputStickerSet) -> Result<bool, ApiError> {
        self.calls.lock().push(("uninstall", set));
        self.uninstall.lock().clone().unwrap_or_else(|| Err(unscripted()))
    }
}

pub fn sticker_set(id: i64, flags: i32) -> StickerSet {
    StickerSet {
        flags,
        id,
        access_hash: id * 10,
        title: format!("Set {}", id),
        short_name: format!("set{}", id),
        count: 0,
        hash: 0,
    }
}

pub fn document(id: i64) -> Document {
    Document::Document {
        id,
        access_hash: id + 1,
        date: 1_500_000_000,
        mime_type: "image/webp".into(),
        size: 2048,
        dc_id: 4,
        version: 1,
        attributes: Vec::new(),
    }
}

pub fn pack(emoticon: &str, documents: &[i64]) -> StickerPack {
    StickerPack {
        emoticon: emoticon.into(),
        documents: documents.to_vec(),
    }
}

pub fn info(id: i64) -> StickerPackCollectionInfo {
    StickerPackCollectionInfo {
        id: ItemCollectionId::new(ItemCollectionNamespace::CLOUD_STICKER_PACKS, id),
        flags: StickerPackFlags::default(),
        access_hash: id * 10,
        title: format!("Set {}", id),
        short_name: format!("set{}", id),
        hash: 0,
    }
}
