//! # courier-stickers
//!
//! Cloud sticker sets: load a set from the server, install it at the front
//! of the local collection list (dropping whatever the server archived to
//! make room) and uninstall it again.

pub mod api;
pub mod collections;
mod error;

pub use api::StickerApi;
pub use collections::{
    collection_info, install_sticker_set, request_cloud_sticker_pack, uninstall_sticker_set,
    CloudStickerPack, CoveredStickerSet, InstallStickerSetResult,
};
pub use error::{
    ApiError, CloudStickersLoadingError, InstallStickerSetError, UninstallStickerSetError,
};
