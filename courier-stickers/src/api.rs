use async_trait::async_trait;
use courier_core::api::{InputStickerSet, StickerSetContents, StickerSetInstallResult};

use crate::error::ApiError;

/// Sticker methods of the backend API
#[async_trait]
pub trait StickerApi: Send + Sync {
    /// Fetch a set with its emoticon packs and documents
    async fn get_sticker_set(&self, set: InputStickerSet) -> Result<StickerSetContents, ApiError>;

    /// Add a set to the installed list; the server may archive others to make room
    async fn install_sticker_set(
        &self,
        set: InputStickerSet,
        archived: bool,
    ) -> Result<StickerSetInstallResult, ApiError>;

    /// Remove a set from the installed list; `false` means nothing changed
    async fn uninstall_sticker_set(&self, set: InputStickerSet) -> Result<bool, ApiError>;
}
