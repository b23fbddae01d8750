//! # courier-core
//!
//! Shared vocabulary for the courier outgoing-message pipeline:
//!
//! - [`api`]: wire-level protocol descriptors with their bit-packed flags
//! - [`media`] and [`message`]: the client-side model of what is being sent
//! - [`collections`]: installed item collections (sticker packs)
//! - [`store`]: the transactional persistence contract, with
//!   [`MemoryStore`] as an in-memory implementation
//!
//! ```rust
//! use courier_core::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() -> StoreResult<()> {
//! let store = MemoryStore::new();
//! let peer = PeerId::new(PeerNamespace::User, 7);
//! let id = MessageId::local(peer, 1);
//! store.insert_message(StoredMessage::outgoing(id, 0, "hello"));
//!
//! let text = courier_core::store::modify(&store, |txn| {
//!     Ok(txn.message(&id).map(|m| m.text))
//! }).await?;
//! assert_eq!(text.as_deref(), Some("hello"));
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod collections;
mod error;
pub mod ids;
pub mod media;
mod memory_store;
pub mod message;
pub mod store;

pub use collections::{
    ItemCollection, ItemCollectionId, ItemCollectionItemIndex, ItemCollectionNamespace,
    StickerPackCollectionInfo, StickerPackFlags, StickerPackItem,
};
pub use error::{StoreError, StoreResult};
pub use ids::{MediaId, MessageId, PeerId, PeerNamespace};
pub use media::{
    ContactMedia, FileAttribute, FileMedia, ImageMedia, ImageRepresentation, MapMedia, MapVenue,
    Media, MediaResource, PixelDimensions, ResourceId, StickerMaskCoords, StickerPackReference,
    VideoFlags, WebPageMedia,
};
pub use memory_store::MemoryStore;
pub use message::{
    AutoremoveTimeout, ForwardInfo, ForwardSourceInfo, MessageAttribute, MessageAttributes,
    MessageFlags, OutgoingInlineResult, OutgoingMessageFlags, OutgoingMessageInfo, ReplyInfo,
    StoredMessage,
};
pub use store::{MessageStore, MessageUpdate, StoreTransaction};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        FileMedia, Media, MediaId, MemoryStore, MessageAttribute, MessageAttributes, MessageId,
        MessageStore, PeerId, PeerNamespace, StoreError, StoreResult, StoredMessage,
    };
}
