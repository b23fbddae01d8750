use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of conversation a peer id lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PeerNamespace {
    User,
    Group,
    Channel,
    /// End-to-end encrypted conversation; uploaded media must be encrypted.
    SecretChat,
}

/// Identity of a conversation partner or chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PeerId {
    pub namespace: PeerNamespace,
    pub id: i64,
}

impl PeerId {
    pub fn new(namespace: PeerNamespace, id: i64) -> Self {
        Self { namespace, id }
    }

    /// Whether media sent to this peer must be end-to-end encrypted
    pub fn is_secret_chat(&self) -> bool {
        self.namespace == PeerNamespace::SecretChat
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:{}", self.namespace, self.id)
    }
}

/// Identity of a stored message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId {
    pub peer_id: PeerId,
    pub namespace: i32,
    pub id: i32,
}

impl MessageId {
    /// Namespace of messages that exist only locally (not yet acknowledged)
    pub const LOCAL: i32 = 0;
    /// Namespace of messages acknowledged by the server
    pub const CLOUD: i32 = 1;

    pub fn new(peer_id: PeerId, namespace: i32, id: i32) -> Self {
        Self {
            peer_id,
            namespace,
            id,
        }
    }

    /// Message id in the local namespace
    pub fn local(peer_id: PeerId, id: i32) -> Self {
        Self::new(peer_id, Self::LOCAL, id)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.peer_id, self.namespace, self.id)
    }
}

/// Identity of a stored media record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MediaId {
    pub namespace: i32,
    pub id: i64,
}

impl MediaId {
    pub const LOCAL_FILE: i32 = 0;
    pub const CLOUD_FILE: i32 = 1;
    pub const LOCAL_IMAGE: i32 = 2;
    pub const CLOUD_IMAGE: i32 = 3;

    pub fn new(namespace: i32, id: i64) -> Self {
        Self { namespace, id }
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.id)
    }
}
