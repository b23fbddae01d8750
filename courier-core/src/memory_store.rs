use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use crate::collections::{ItemCollection, ItemCollectionNamespace};
use crate::error::{StoreError, StoreResult};
use crate::ids::{MediaId, MessageId};
use crate::media::Media;
use crate::message::StoredMessage;
use crate::store::{MessageStore, MessageUpdate, StoreTransaction};

#[derive(Debug, Clone, Default)]
struct StoreState {
    messages: HashMap<MessageId, StoredMessage>,
    media: HashMap<MediaId, Media>,
    collections: HashMap<ItemCollectionNamespace, Vec<ItemCollection>>,
}

/// In-memory store for testing and development
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<StoreState>>,
    committed: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a message, registering its identified media records too
    pub fn insert_message(&self, message: StoredMessage) {
        let mut state = self.state.write();
        for media in &message.media {
            if let Some(id) = media.id() {
                state.media.insert(id, media.clone());
            }
        }
        state.messages.insert(message.id, message);
    }

    pub fn insert_media(&self, id: MediaId, media: Media) {
        self.state.write().media.insert(id, media);
    }

    pub fn message(&self, id: &MessageId) -> Option<StoredMessage> {
        self.state.read().messages.get(id).cloned()
    }

    pub fn media(&self, id: &MediaId) -> Option<Media> {
        self.state.read().media.get(id).cloned()
    }

    pub fn item_collections(&self, namespace: ItemCollectionNamespace) -> Vec<ItemCollection> {
        self.state
            .read()
            .collections
            .get(&namespace)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of transactions committed so far
    pub fn committed_transactions(&self) -> u64 {
        self.committed.load(Ordering::SeqCst)
    }
}

/// Transaction view over a staged copy of the store state
struct StagedTransaction<'a> {
    state: &'a mut StoreState,
}

impl StoreTransaction for StagedTransaction<'_> {
    fn message(&self, id: &MessageId) -> Option<StoredMessage> {
        self.state.messages.get(id).cloned()
    }

    fn media(&self, id: &MediaId) -> Option<Media> {
        self.state.media.get(id).cloned()
    }

    fn update_media(&mut self, id: &MediaId, media: Media) {
        for message in self.state.messages.values_mut() {
            for attached in message.media.iter_mut() {
                if attached.id().as_ref() == Some(id) {
                    *attached = media.clone();
                }
            }
        }
        self.state.media.insert(*id, media);
    }

    fn update_message(
        &mut self,
        id: &MessageId,
        update: &mut dyn FnMut(&StoredMessage) -> MessageUpdate,
    ) -> StoreResult<()> {
        let current = self
            .state
            .messages
            .get(id)
            .ok_or_else(|| StoreError::message_not_found(id))?;

        if let MessageUpdate::Update(updated) = update(current) {
            if updated.id != *id {
                self.state.messages.remove(id);
            }
            self.state.messages.insert(updated.id, updated);
        }
        Ok(())
    }

    fn item_collections(&self, namespace: ItemCollectionNamespace) -> Vec<ItemCollection> {
        self.state
            .collections
            .get(&namespace)
            .cloned()
            .unwrap_or_default()
    }

    fn replace_item_collections(
        &mut self,
        namespace: ItemCollectionNamespace,
        collections: Vec<ItemCollection>,
    ) {
        self.state.collections.insert(namespace, collections);
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn transaction(
        &self,
        body: &mut (dyn for<'t> FnMut(&'t mut (dyn StoreTransaction + 't)) -> StoreResult<()> + Send),
    ) -> StoreResult<()> {
        // The write lock is held for the whole body: one writer at a time.
        let mut state = self.state.write();
        let mut staged = state.clone();

        if let Err(err) = body(&mut StagedTransaction { state: &mut staged }) {
            debug!("Rolling back memory store transaction: {}", err);
            return Err(err);
        }

        *state = staged;
        self.committed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{PeerId, PeerNamespace};
    use crate::media::{FileMedia, MediaResource};
    use crate::store::modify;

    fn message_id(id: i32) -> MessageId {
        MessageId::local(PeerId::new(PeerNamespace::User, 42), id)
    }

    fn file(id: i64, mime: &str) -> Media {
        FileMedia::new(MediaResource::LocalFile { file_id: id }, mime)
            .with_id(MediaId::new(MediaId::LOCAL_FILE, id))
            .into()
    }

    #[tokio::test]
    async fn failed_body_leaves_state_untouched() {
        let store = MemoryStore::new();
        store.insert_message(StoredMessage::outgoing(message_id(1), 0, "hi"));

        let result: StoreResult<()> = modify(&store, |txn| {
            txn.update_message(&message_id(1), &mut |current: &StoredMessage| {
                let mut updated = current.clone();
                updated.text = "changed".to_string();
                MessageUpdate::Update(updated)
            })?;
            txn.update_message(&message_id(2), &mut |_: &StoredMessage| MessageUpdate::Skip)
        })
        .await;

        assert!(matches!(result, Err(StoreError::MessageNotFound { .. })));
        assert_eq!(store.message(&message_id(1)).unwrap().text, "hi");
        assert_eq!(store.committed_transactions(), 0);
    }

    #[tokio::test]
    async fn update_media_rewrites_inline_copies() {
        let store = MemoryStore::new();
        store.insert_message(
            StoredMessage::outgoing(message_id(1), 0, "").with_media(file(9, "video/quicktime")),
        );

        let media_id = MediaId::new(MediaId::LOCAL_FILE, 9);
        modify(&store, |txn| {
            txn.update_media(&media_id, file(9, "video/mp4"));
            Ok(())
        })
        .await
        .unwrap();

        let stored = store.message(&message_id(1)).unwrap();
        assert_eq!(stored.media[0].as_file().unwrap().mime_type, "video/mp4");
        assert_eq!(
            store.media(&media_id).unwrap().as_file().unwrap().mime_type,
            "video/mp4"
        );
        assert_eq!(store.committed_transactions(), 1);
    }

    #[tokio::test]
    async fn unknown_media_aborts_the_transaction() {
        let store = MemoryStore::new();
        store.insert_message(
            StoredMessage::outgoing(message_id(1), 0, "").with_media(file(9, "video/quicktime")),
        );

        let result = modify(&store, |txn| {
            let known = MediaId::new(MediaId::LOCAL_FILE, 9);
            let unknown = MediaId::new(MediaId::LOCAL_FILE, 10);
            let media = txn
                .media(&known)
                .ok_or_else(|| StoreError::media_not_found(known))?;
            txn.update_media(&known, media);
            txn.media(&unknown)
                .ok_or_else(|| StoreError::media_not_found(unknown))
        })
        .await;

        assert!(matches!(result, Err(StoreError::MediaNotFound { .. })));
        assert_eq!(store.committed_transactions(), 0);
    }

    #[tokio::test]
    async fn modify_returns_body_value() {
        let store = MemoryStore::new();
        store.insert_message(StoredMessage::outgoing(message_id(3), 7, "x"));
        let timestamp = modify(&store, |txn| {
            Ok(txn.message(&message_id(3)).map(|m| m.timestamp))
        })
        .await
        .unwrap();
        assert_eq!(timestamp, Some(7));
    }
}
