use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use courier_core::api::{InputEncryptedFile, InputFile, SecretFileEncryptionKey};
use courier_core::{MediaResource, ResourceId};
use parking_lot::RwLock;
use rand::Rng;
use tracing::debug;

use crate::error::TransportError;
use crate::transport::{TransportEvent, TransportStream, UploadRequest, UploadTransport};

/// Files at or above this size go through the big-file path
pub const BIG_FILE_THRESHOLD: usize = 10 * 1024 * 1024;

const AES_BLOCK_SIZE: usize = 16;

/// Configuration for [`MemoryTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryTransportConfig {
    /// Bytes reported per progress step
    pub part_size: usize,
}

impl Default for MemoryTransportConfig {
    fn default() -> Self {
        Self {
            part_size: 128 * 1024,
        }
    }
}

impl MemoryTransportConfig {
    pub fn with_part_size(mut self, part_size: usize) -> Self {
        self.part_size = part_size;
        self
    }
}

#[derive(Debug, Default)]
struct TransportState {
    resources: HashMap<ResourceId, Arc<Vec<u8>>>,
    failing: HashSet<ResourceId>,
    requests: Vec<UploadRequest>,
}

/// In-memory transport for testing and development
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    state: Arc<RwLock<TransportState>>,
    config: MemoryTransportConfig,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MemoryTransportConfig) -> Self {
        Self {
            state: Arc::default(),
            config,
        }
    }

    /// Make the bytes of `resource` available for upload
    pub fn insert_resource(&self, resource: &MediaResource, bytes: impl Into<Vec<u8>>) {
        self.state
            .write()
            .resources
            .insert(resource.id(), Arc::new(bytes.into()));
    }

    /// Every upload of `resource` fails with a network error from now on
    pub fn fail_resource(&self, resource: &MediaResource) {
        self.state.write().failing.insert(resource.id());
    }

    /// Requests received so far, in order
    pub fn requests(&self) -> Vec<UploadRequest> {
        self.state.read().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.read().requests.len()
    }
}

fn random_key() -> SecretFileEncryptionKey {
    let mut rng = rand::thread_rng();
    let mut aes_key = vec![0u8; 32];
    let mut aes_iv = vec![0u8; 32];
    rng.fill(&mut aes_key[..]);
    rng.fill(&mut aes_iv[..]);
    SecretFileEncryptionKey::new(aes_key, aes_iv)
}

fn key_fingerprint(key: &SecretFileEncryptionKey) -> i32 {
    key.aes_key
        .iter()
        .chain(key.aes_iv.iter())
        .fold(0i32, |acc, byte| acc.rotate_left(5) ^ i32::from(*byte))
}

fn padded_size(size: usize) -> usize {
    size.div_ceil(AES_BLOCK_SIZE) * AES_BLOCK_SIZE
}

impl UploadTransport for MemoryTransport {
    fn upload(&self, request: UploadRequest) -> TransportStream {
        let id = request.resource.id();
        let (bytes, failing) = {
            let mut state = self.state.write();
            state.requests.push(request.clone());
            (state.resources.get(&id).cloned(), state.failing.contains(&id))
        };
        let part_size = self.config.part_size.max(1);

        Box::pin(async_stream::stream! {
            let Some(bytes) = bytes else {
                yield Err(TransportError::resource_unavailable(id.to_string()));
                return;
            };
            if failing {
                yield Err(TransportError::network(format!("connection reset while uploading {}", id)));
                return;
            }

            let total = bytes.len();
            let parts = total.div_ceil(part_size).max(1);
            let Ok(part_count) = i32::try_from(parts) else {
                yield Err(TransportError::Rejected(format!("{} has too many parts", id)));
                return;
            };
            for part in 1..=parts {
                tokio::task::yield_now().await;
                yield Ok(TransportEvent::Progress(part as f32 / parts as f32));
            }

            let file_id: i64 = rand::random();
            let big = total >= BIG_FILE_THRESHOLD;
            debug!(resource = %id, bytes = total, parts, big, encrypt = request.encrypt, "Memory upload complete");

            if request.encrypt {
                let Ok(size) = i32::try_from(padded_size(total)) else {
                    yield Err(TransportError::Rejected(format!("{} is too large", id)));
                    return;
                };
                let key = random_key();
                let key_fingerprint = key_fingerprint(&key);
                let file = if big {
                    InputEncryptedFile::BigUploaded { id: file_id, parts: part_count, key_fingerprint }
                } else {
                    InputEncryptedFile::Uploaded {
                        id: file_id,
                        parts: part_count,
                        md5_checksum: String::new(),
                        key_fingerprint,
                    }
                };
                yield Ok(TransportEvent::InputSecretFile { file, size, key });
            } else {
                let name = id.to_string();
                let file = if big {
                    InputFile::Big { id: file_id, parts: part_count, name }
                } else {
                    InputFile::Small { id: file_id, parts: part_count, name, md5_checksum: String::new() }
                };
                yield Ok(TransportEvent::InputFile(file));
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MediaStatsCategory;
    use futures_util::StreamExt;

    fn resource(id: i64) -> MediaResource {
        MediaResource::LocalFile { file_id: id }
    }

    #[tokio::test]
    async fn reports_progress_per_part() {
        let transport = MemoryTransport::with_config(MemoryTransportConfig::default().with_part_size(4));
        transport.insert_resource(&resource(1), vec![0u8; 10]);

        let events: Vec<_> = transport
            .upload(UploadRequest::new(resource(1), MediaStatsCategory::File))
            .collect()
            .await;

        assert_eq!(events.len(), 4);
        assert_eq!(events[0], Ok(TransportEvent::Progress(1.0 / 3.0)));
        assert_eq!(events[2], Ok(TransportEvent::Progress(1.0)));
        match &events[3] {
            Ok(TransportEvent::InputFile(InputFile::Small { parts, .. })) => assert_eq!(*parts, 3),
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn encrypted_upload_reports_padded_size() {
        let transport = MemoryTransport::new();
        transport.insert_resource(&resource(2), vec![1u8; 17]);

        let last = transport
            .upload(UploadRequest::new(resource(2), MediaStatsCategory::File).encrypted(true))
            .collect::<Vec<_>>()
            .await
            .pop();

        match last {
            Some(Ok(TransportEvent::InputSecretFile { size, key, .. })) => {
                assert_eq!(size, 32);
                assert_eq!(key.aes_key.len(), 32);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn unknown_and_failing_resources_error() {
        let transport = MemoryTransport::new();
        transport.insert_resource(&resource(4), vec![1u8; 4]);
        transport.fail_resource(&resource(4));

        let missing: Vec<_> = transport
            .upload(UploadRequest::new(resource(3), MediaStatsCategory::File))
            .collect()
            .await;
        assert!(matches!(missing[..], [Err(TransportError::ResourceUnavailable { .. })]));

        let failing: Vec<_> = transport
            .upload(UploadRequest::new(resource(4), MediaStatsCategory::File))
            .collect()
            .await;
        assert!(matches!(failing[..], [Err(TransportError::Network(_))]));
    }

    #[test]
    fn padding_rounds_up_to_block() {
        assert_eq!(padded_size(0), 0);
        assert_eq!(padded_size(16), 16);
        assert_eq!(padded_size(17), 32);
    }
}
