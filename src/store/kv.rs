//! Embedded key-value backend using fjall.

use std::path::Path;

use fjall::{Keyspace, KeyspaceCreateOptions, PersistMode};

use crate::logging::{debug, error, info};
use crate::stats::Store;

use super::{Backend, StoreError};

/// Keyspace holding the snapshot.
const STATS_KEYSPACE: &str = "stats";

/// Key of the snapshot envelope.
const SNAPSHOT_KEY: &str = "store";

/// Key of the store version marker.
const CONFIG_KEY: &str = "config";

/// Current store version.
const STORE_VERSION: u32 = 1;

/// Bytes of the CRC32 prefix in front of the JSON snapshot.
const CHECKSUM_LEN: usize = 4;

/// Stores the snapshot as a single checksummed value in a fjall database.
///
/// The value is a little-endian CRC32 of the JSON payload followed by the
/// payload itself.
pub struct FjallBackend {
    db: fjall::Database,
    stats: Keyspace,
}

impl FjallBackend {
    /// Open the database at `path`, creating it if needed.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let db = fjall::Database::builder(path).open()?;
        let stats = db.keyspace(STATS_KEYSPACE, KeyspaceCreateOptions::default)?;

        match stats.get(CONFIG_KEY)? {
            Some(config) => {
                let version = u32::from_le_bytes(
                    config
                        .as_ref()
                        .try_into()
                        .map_err(|_| StoreError::InvalidFormat("Invalid config format".to_string()))?,
                );
                if version != STORE_VERSION {
                    return Err(StoreError::InvalidFormat(format!(
                        "Store version mismatch: expected {}, got {}",
                        STORE_VERSION, version
                    )));
                }
            }
            None => {
                stats.insert(CONFIG_KEY, STORE_VERSION.to_le_bytes())?;
                db.persist(PersistMode::SyncAll)?;
                info!(path = %path.display(), "initialized stats database");
            }
        }

        Ok(Self { db, stats })
    }

    fn decode(bytes: &[u8]) -> Result<Store, StoreError> {
        let (prefix, payload) = bytes
            .split_first_chunk::<CHECKSUM_LEN>()
            .ok_or_else(|| StoreError::InvalidFormat("Snapshot too short".to_string()))?;

        let stored = u32::from_le_bytes(*prefix);
        let computed = crc32fast::hash(payload);
        if stored != computed {
            return Err(StoreError::ChecksumMismatch { stored, computed });
        }

        Ok(serde_json::from_slice(payload)?)
    }

    fn encode(store: &Store) -> Result<Vec<u8>, StoreError> {
        let payload = serde_json::to_vec(store)?;
        let mut bytes = Vec::with_capacity(CHECKSUM_LEN + payload.len());
        bytes.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
        bytes.extend(payload);
        Ok(bytes)
    }
}

impl Backend for FjallBackend {
    fn load(&self) -> Result<Store, StoreError> {
        let Some(bytes) = self.stats.get(SNAPSHOT_KEY)? else {
            return Ok(Store::new());
        };

        Self::decode(&bytes).map_err(|e| {
            error!(error = %e, "failed to decode stats snapshot");
            e
        })
    }

    fn save(&self, store: &Store) -> Result<(), StoreError> {
        let bytes = Self::encode(store)?;
        self.stats.insert(SNAPSHOT_KEY, bytes)?;
        self.db.persist(PersistMode::SyncAll)?;
        debug!(songs = store.songs.len(), "saved stats snapshot");
        Ok(())
    }
}
