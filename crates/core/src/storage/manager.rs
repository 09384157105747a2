use crate::errors::CoreError;
use crate::models::snapshot::PersistedSnapshot;

use super::blob::BlobStore;

/// High-level snapshot operations on top of a [`BlobStore`].
pub struct StorageManager;

impl StorageManager {
    /// Serialize a snapshot to its JSON blob.
    pub fn encode(snapshot: &PersistedSnapshot) -> Result<String, CoreError> {
        serde_json::to_string(snapshot)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize snapshot: {e}")))
    }

    /// Strict decode of a JSON blob.
    pub fn decode(blob: &str) -> Result<PersistedSnapshot, CoreError> {
        serde_json::from_str(blob)
            .map_err(|e| CoreError::Deserialization(format!("Failed to deserialize snapshot: {e}")))
    }

    /// Write the full snapshot under `key`, replacing whatever was there.
    pub fn save(
        store: &mut dyn BlobStore,
        key: &str,
        snapshot: &PersistedSnapshot,
    ) -> Result<(), CoreError> {
        let blob = Self::encode(snapshot)?;
        store.write(key, &blob)
    }

    /// Strict load: `Ok(None)` if absent, `Err` if unreadable or malformed.
    pub fn try_load(store: &dyn BlobStore, key: &str) -> Result<Option<PersistedSnapshot>, CoreError> {
        store.read(key)?.map(|blob| Self::decode(&blob)).transpose()
    }

    /// Fail-open load used at startup: absent, unreadable or malformed
    /// blobs all yield the default (empty) snapshot.
    pub fn load_or_default(store: &dyn BlobStore, key: &str) -> PersistedSnapshot {
        match Self::try_load(store, key) {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                tracing::info!(key, "no saved snapshot, starting empty");
                PersistedSnapshot::default()
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "ignoring unreadable snapshot");
                PersistedSnapshot::default()
            }
        }
    }
}
