use async_trait::async_trait;

use crate::collections::{ItemCollection, ItemCollectionNamespace};
use crate::error::{StoreError, StoreResult};
use crate::ids::{MediaId, MessageId};
use crate::media::Media;
use crate::message::StoredMessage;

/// Outcome of a message mutator
#[derive(Debug, Clone, PartialEq)]
pub enum MessageUpdate {
    /// Leave the stored message untouched
    Skip,
    /// Replace the stored message with this value
    Update(StoredMessage),
}

/// Operations available inside one store transaction.
///
/// Everything done through a transaction is committed together or not at
/// all; the transaction body runs with exclusive write access.
pub trait StoreTransaction {
    /// Read a stored message
    fn message(&self, id: &MessageId) -> Option<StoredMessage>;

    /// Read a stored media record
    fn media(&self, id: &MediaId) -> Option<Media>;

    /// Replace the media record with the given id, wherever it is referenced
    fn update_media(&mut self, id: &MediaId, media: Media);

    /// Run a mutator over a stored message
    fn update_message(
        &mut self,
        id: &MessageId,
        update: &mut dyn FnMut(&StoredMessage) -> MessageUpdate,
    ) -> StoreResult<()>;

    /// Read all collections of a namespace, in stored order
    fn item_collections(&self, namespace: ItemCollectionNamespace) -> Vec<ItemCollection>;

    /// Replace all collections of a namespace
    fn replace_item_collections(
        &mut self,
        namespace: ItemCollectionNamespace,
        collections: Vec<ItemCollection>,
    );
}

/// Persistence collaborator holding messages, media and item collections
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Run `body` inside a single all-or-nothing transaction.
    ///
    /// An `Err` returned by the body aborts the transaction and is passed
    /// through unchanged.
    async fn transaction(
        &self,
        body: &mut (dyn for<'t> FnMut(&'t mut (dyn StoreTransaction + 't)) -> StoreResult<()> + Send),
    ) -> StoreResult<()>;
}

/// Run a one-shot transaction body and hand back its value
pub async fn modify<S, F, R>(store: &S, body: F) -> StoreResult<R>
where
    S: MessageStore + ?Sized,
    F: FnOnce(&mut dyn StoreTransaction) -> StoreResult<R> + Send,
    R: Send,
{
    let mut body = Some(body);
    let mut output = None;
    store
        .transaction(&mut |txn: &mut dyn StoreTransaction| {
            let body = body.take().ok_or(StoreError::TransactionReplayed)?;
            output = Some(body(txn)?);
            Ok(())
        })
        .await?;
    output.ok_or(StoreError::TransactionReplayed)
}
