use courier_core::StoreError;
use thiserror::Error;

/// Failure reported by the sticker API collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Sticker set not found")]
    StickerSetInvalid,
}

impl ApiError {
    pub fn request<S: Into<String>>(message: S) -> Self {
        Self::Request(message.into())
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudStickersLoadingError {
    #[error("Failed to load sticker set")]
    Generic,

    #[error("Sticker set is invalid or unavailable")]
    Invalid,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStickerSetError {
    #[error("Failed to install sticker set")]
    Generic,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UninstallStickerSetError {
    #[error("Failed to uninstall sticker set")]
    Generic,
}

impl From<StoreError> for CloudStickersLoadingError {
    fn from(_: StoreError) -> Self {
        Self::Generic
    }
}

impl From<StoreError> for InstallStickerSetError {
    fn from(_: StoreError) -> Self {
        Self::Generic
    }
}

impl From<StoreError> for UninstallStickerSetError {
    fn from(_: StoreError) -> Self {
        Self::Generic
    }
}
