mod common;

use common::*;
use courier_core::api::{InputStickerSet, StickerSet, StickerSetContents, StickerSetCovered, StickerSetInstallResult};
use courier_core::{ItemCollection, ItemCollectionNamespace, MemoryStore, StickerPackReference};
use courier_stickers::{
    install_sticker_set, request_cloud_sticker_pack, uninstall_sticker_set, ApiError,
    CloudStickersLoadingError, InstallStickerSetError, InstallStickerSetResult,
    UninstallStickerSetError,
};

async fn seeded_store(ids: &[i64]) -> MemoryStore {
    let store = MemoryStore::new();
    let collections: Vec<_> = ids
        .iter()
        .map(|id| ItemCollection::new(info(*id), Vec::new()))
        .collect();
    let seeded = courier_core::store::modify(&store, move |txn| {
        txn.replace_item_collections(ItemCollectionNamespace::CLOUD_STICKER_PACKS, collections);
        Ok(())
    })
    .await;
    tokio_test::assert_ok!(seeded);
    store
}

fn stored_ids(store: &MemoryStore) -> Vec<i64> {
    store
        .item_collections(ItemCollectionNamespace::CLOUD_STICKER_PACKS)
        .iter()
        .map(|collection| collection.id.id)
        .collect()
}

#[test_log::test(tokio::test)]
async fn loads_set_with_emoticon_index_keys() {
    let api = FakeStickerApi::default();
    *api.sticker_set.lock() = Some(Ok(StickerSetContents {
        set: sticker_set(1, StickerSet::INSTALLED | StickerSet::OFFICIAL),
        packs: vec![pack("😺", &[100, 101]), pack("❤", &[100])],
        documents: vec![document(100), document(101)],
    }));

    let pack = request_cloud_sticker_pack(&api, &StickerPackReference::Name("set1".into()))
        .await
        .unwrap();

    assert!(pack.installed);
    assert!(pack.info.flags.official);
    assert_eq!(pack.info.id.id, 1);
    assert_eq!(pack.items.len(), 2);
    assert_eq!(pack.items[0].index.index, 0);
    assert_eq!(
        pack.items[0].index_keys,
        vec!["😺".as_bytes().to_vec(), "❤".as_bytes().to_vec()]
    );
    assert_eq!(pack.items[1].index_keys, vec!["😺".as_bytes().to_vec()]);
    assert_eq!(
        api.calls.lock()[0],
        (
            "get",
            InputStickerSet::ShortName {
                short_name: "set1".into()
            }
        )
    );
}

#[tokio::test]
async fn id_reference_and_failure_map_to_invalid() {
    let api = FakeStickerApi::default();
    *api.sticker_set.lock() = Some(Err(ApiError::StickerSetInvalid));

    let result = request_cloud_sticker_pack(
        &api,
        &StickerPackReference::Id {
            id: 5,
            access_hash: 6,
        },
    )
    .await;

    assert_eq!(result, Err(CloudStickersLoadingError::Invalid));
    assert_eq!(api.calls.lock()[0].1, InputStickerSet::Id { id: 5, access_hash: 6 });
}

#[tokio::test]
async fn install_moves_set_to_front() {
    let api = FakeStickerApi::default();
    *api.install.lock() = Some(Ok(StickerSetInstallResult::Success));
    let store = seeded_store(&[1, 2, 3]).await;

    let result = install_sticker_set(&api, &store, &info(3), Vec::new()).await;

    assert_eq!(result, Ok(InstallStickerSetResult::Successful));
    assert_eq!(stored_ids(&store), vec![3, 1, 2]);
    assert_eq!(api.calls.lock()[0].1, InputStickerSet::Id { id: 3, access_hash: 30 });
}

#[tokio::test]
async fn install_drops_archived_sets() {
    let api = FakeStickerApi::default();
    *api.install.lock() = Some(Ok(StickerSetInstallResult::Archive {
        sets: vec![
            StickerSetCovered::Covered {
                set: sticker_set(1, 0),
                cover: document(10),
            },
            StickerSetCovered::MultiCovered {
                set: sticker_set(2, 0),
                covers: vec![document(20), document(21)],
            },
        ],
    }));
    let store = seeded_store(&[1, 2, 4]).await;

    let result = install_sticker_set(&api, &store, &info(9), Vec::new()).await.unwrap();

    match result {
        InstallStickerSetResult::Archived(sets) => {
            assert_eq!(sets.len(), 2);
            assert_eq!(sets[0].info.id.id, 1);
            assert_eq!(sets[0].items.len(), 1);
            assert_eq!(sets[1].items.len(), 2);
        }
        other => panic!("unexpected result {:?}", other),
    }
    assert_eq!(stored_ids(&store), vec![9, 4]);
}

#[tokio::test]
async fn failed_install_leaves_store_alone() {
    let api = FakeStickerApi::default();
    let store = seeded_store(&[1]).await;

    let result = install_sticker_set(&api, &store, &info(2), Vec::new()).await;

    assert_eq!(result, Err(InstallStickerSetError::Generic));
    assert_eq!(stored_ids(&store), vec![1]);
}

#[tokio::test]
async fn uninstall_removes_confirmed_set() {
    let api = FakeStickerApi::default();
    *api.uninstall.lock() = Some(Ok(true));
    let store = seeded_store(&[1, 2, 3]).await;

    assert_eq!(uninstall_sticker_set(&api, &store, &info(2)).await, Ok(true));
    assert_eq!(stored_ids(&store), vec![1, 3]);
}

#[tokio::test]
async fn uninstall_refused_by_server_keeps_set() {
    let api = FakeStickerApi::default();
    *api.uninstall.lock() = Some(Ok(false));
    let store = seeded_store(&[1, 2]).await;

    assert_eq!(uninstall_sticker_set(&api, &store, &info(2)).await, Ok(false));
    assert_eq!(stored_ids(&store), vec![1, 2]);

    *api.uninstall.lock() = Some(Err(ApiError::request("timeout")));
    assert_eq!(
        uninstall_sticker_set(&api, &store, &info(2)).await,
        Err(UninstallStickerSetError::Generic)
    );
}
