use std::collections::{HashMap, HashSet};

use courier_core::api::{self, InputStickerSet, StickerSetCovered, StickerSetInstallResult};
use courier_core::store::modify;
use courier_core::{
    FileMedia, ItemCollection, ItemCollectionId, ItemCollectionItemIndex,
    ItemCollectionNamespace, MediaId, MessageStore, StickerPackCollectionInfo, StickerPackFlags,
    StickerPackItem, StickerPackReference,
};
use tracing::{debug, info, instrument, warn};

use crate::api::StickerApi;
use crate::error::{CloudStickersLoadingError, InstallStickerSetError, UninstallStickerSetError};

/// A sticker set as the server describes it
#[derive(Debug, Clone, PartialEq)]
pub struct CloudStickerPack {
    pub info: StickerPackCollectionInfo,
    pub items: Vec<StickerPackItem>,
    /// The set is on the account's installed list
    pub installed: bool,
}

/// A set the server archived while installing another one
#[derive(Debug, Clone, PartialEq)]
pub struct CoveredStickerSet {
    pub info: StickerPackCollectionInfo,
    /// Cover stickers only, not the whole set
    pub items: Vec<StickerPackItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InstallStickerSetResult {
    Successful,
    Archived(Vec<CoveredStickerSet>),
}

/// Collection description of a server sticker set
pub fn collection_info(set: &api::StickerSet) -> StickerPackCollectionInfo {
    StickerPackCollectionInfo {
        id: ItemCollectionId::new(ItemCollectionNamespace::CLOUD_STICKER_PACKS, set.id),
        flags: StickerPackFlags {
            official: set.flags & api::StickerSet::OFFICIAL != 0,
            masks: set.flags & api::StickerSet::MASKS != 0,
        },
        access_hash: set.access_hash,
        title: set.title.clone(),
        short_name: set.short_name.clone(),
        hash: set.hash,
    }
}

/// Convert documents to indexed items; documents without a usable file are skipped
fn pack_items(
    documents: &[api::Document],
    index_keys: &HashMap<MediaId, Vec<Vec<u8>>>,
) -> Vec<StickerPackItem> {
    let mut items = Vec::with_capacity(documents.len());
    for document in documents {
        let Some(file) = FileMedia::from_api_document(document) else {
            continue;
        };
        let Some(id) = file.id else {
            continue;
        };
        let index = i32::try_from(items.len()).unwrap_or(i32::MAX);
        items.push(StickerPackItem {
            index: ItemCollectionItemIndex { index, id: id.id },
            index_keys: index_keys.get(&id).cloned().unwrap_or_default(),
            file,
        });
    }
    items
}

fn input_sticker_set(info: &StickerPackCollectionInfo) -> InputStickerSet {
    InputStickerSet::Id {
        id: info.id.id,
        access_hash: info.access_hash,
    }
}

/// Load a sticker set from the server
#[instrument(skip(api))]
pub async fn request_cloud_sticker_pack(
    api: &dyn StickerApi,
    reference: &StickerPackReference,
) -> Result<CloudStickerPack, CloudStickersLoadingError> {
    let contents = api
        .get_sticker_set(reference.to_input_sticker_set())
        .await
        .map_err(|err| {
            debug!(error = %err, "Sticker set request failed");
            CloudStickersLoadingError::Invalid
        })?;

    let mut index_keys: HashMap<MediaId, Vec<Vec<u8>>> = HashMap::new();
    for pack in &contents.packs {
        let key = pack.emoticon.as_bytes().to_vec();
        for document_id in &pack.documents {
            index_keys
                .entry(MediaId::new(MediaId::CLOUD_FILE, *document_id))
                .or_default()
                .push(key.clone());
        }
    }

    Ok(CloudStickerPack {
        info: collection_info(&contents.set),
        items: pack_items(&contents.documents, &index_keys),
        installed: contents.set.flags & api::StickerSet::INSTALLED != 0,
    })
}

fn covered_set(covered: &StickerSetCovered) -> CoveredStickerSet {
    let (set, covers) = match covered {
        StickerSetCovered::Covered { set, cover } => (set, std::slice::from_ref(cover)),
        StickerSetCovered::MultiCovered { set, covers } => (set, covers.as_slice()),
    };
    CoveredStickerSet {
        info: collection_info(set),
        items: pack_items(covers, &HashMap::new()),
    }
}

/// Install a set and put it first in its namespace.
///
/// Sets the server archived in exchange are dropped from the local list.
#[instrument(skip(api, store, items), fields(set = info.id.id, item_count = items.len()))]
pub async fn install_sticker_set(
    api: &dyn StickerApi,
    store: &dyn MessageStore,
    info: &StickerPackCollectionInfo,
    items: Vec<StickerPackItem>,
) -> Result<InstallStickerSetResult, InstallStickerSetError> {
    let response = api
        .install_sticker_set(input_sticker_set(info), false)
        .await
        .map_err(|err| {
            warn!(error = %err, "Sticker set installation failed");
            InstallStickerSetError::Generic
        })?;

    let result = match response {
        StickerSetInstallResult::Success => InstallStickerSetResult::Successful,
        StickerSetInstallResult::Archive { sets } => {
            InstallStickerSetResult::Archived(sets.iter().map(covered_set).collect())
        }
    };

    let mut removed: HashSet<ItemCollectionId> = HashSet::from([info.id]);
    if let InstallStickerSetResult::Archived(sets) = &result {
        removed.extend(sets.iter().map(|set| set.info.id));
    }
    let namespace = info.id.namespace;
    let installed = ItemCollection::new(info.clone(), items);

    modify(store, move |txn| {
        let mut collections = txn.item_collections(namespace);
        collections.retain(|collection| !removed.contains(&collection.id));
        collections.insert(0, installed);
        txn.replace_item_collections(namespace, collections);
        Ok(())
    })
    .await
    .inspect_err(|err| warn!(error = %err, "Failed to store installed sticker set"))?;

    info!("Installed sticker set");
    Ok(result)
}

/// Uninstall a set; returns whether the server removed it
#[instrument(skip(api, store), fields(set = info.id.id))]
pub async fn uninstall_sticker_set(
    api: &dyn StickerApi,
    store: &dyn MessageStore,
    info: &StickerPackCollectionInfo,
) -> Result<bool, UninstallStickerSetError> {
    let removed = api
        .uninstall_sticker_set(input_sticker_set(info))
        .await
        .map_err(|err| {
            warn!(error = %err, "Sticker set removal failed");
            UninstallStickerSetError::Generic
        })?;
    if !removed {
        debug!("Server kept the sticker set");
        return Ok(false);
    }

    let id = info.id;
    modify(store, move |txn| {
        let mut collections = txn.item_collections(id.namespace);
        if let Some(position) = collections.iter().position(|collection| collection.id == id) {
            collections.remove(position);
        }
        txn.replace_item_collections(id.namespace, collections);
        Ok(())
    })
    .await
    .inspect_err(|err| warn!(error = %err, "Failed to remove sticker set from store"))?;

    info!("Uninstalled sticker set");
    Ok(true)
}
