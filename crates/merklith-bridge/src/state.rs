//! Persistent state for the bridge module.
//!
//! Follows `merklith-storage`'s `StateDB`/`BlockStore` convention: an
//! in-memory cache guarded by a lock, backed by `merklith_storage::Database`
//! for persistence. Every collection lives under its own column so a reader
//! can walk finalized epochs, state roots, or mailbox roots independently.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use merklith_storage::Database;
use merklith_types::{Address, Hash};
use parking_lot::RwLock;

use crate::error::BridgeError;
use crate::types::{AppLayerAddress, Epoch};

const COLUMN_CONFIG: &str = "bridge_config";
const COLUMN_EPOCHS: &str = "bridge_finalized_epochs";
const COLUMN_STATE_ROOTS: &str = "bridge_state_roots";
const COLUMN_MAILBOX_ROOTS: &str = "bridge_mailbox_roots";

const KEY_EPOCH_LENGTH: &[u8] = b"epoch_length";
const KEY_HOOK_ADDRESS: &[u8] = b"hook_address";
const KEY_ENROLLED_VALIDATORS: &[u8] = b"enrolled_validators";
const KEY_PENDING_EPOCH: &[u8] = b"pending_epoch";
const KEY_ISM_PAUSED: &[u8] = b"ism_paused";

/// A page of a paginated listing, matching the Go module's
/// `PageRequest`/`PageResponse` query-surface convention.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

struct Inner {
    epoch_length: u64,
    hook_address: AppLayerAddress,
    enrolled_validators: Vec<Address>,
    pending: Epoch,
    finalized: BTreeMap<u64, Epoch>,
    state_roots: BTreeMap<u64, Hash>,
    mailbox_roots: BTreeMap<u64, Hash>,
    ism_paused: bool,
}

/// The bridge module's state store.
pub struct BridgeStore {
    db: Arc<Database>,
    inner: RwLock<Inner>,
}

impl BridgeStore {
    /// Open (or create) the store at `path`, seeding it with `epoch_length`
    /// and `hook_address` if no prior state exists on disk.
    pub fn open(path: &Path, epoch_length: u64, hook_address: AppLayerAddress) -> Result<Self, BridgeError> {
        let db = Arc::new(Database::new(path)?);

        let loaded_epoch_length = read_u64(&db, COLUMN_CONFIG, KEY_EPOCH_LENGTH)?;
        let loaded_hook_address = read_app_layer_address(&db, COLUMN_CONFIG, KEY_HOOK_ADDRESS)?;
        let loaded_enrolled = read_validator_list(&db, COLUMN_CONFIG, KEY_ENROLLED_VALIDATORS)?;
        let loaded_pending = read_epoch(&db, COLUMN_CONFIG, KEY_PENDING_EPOCH)?;
        let loaded_paused = read_bool(&db, COLUMN_CONFIG, KEY_ISM_PAUSED)?;

        let epoch_length = loaded_epoch_length.unwrap_or(epoch_length);
        let pending = loaded_pending.unwrap_or_else(|| Epoch::genesis(epoch_length));

        let inner = Inner {
            epoch_length,
            hook_address: loaded_hook_address.unwrap_or(hook_address),
            enrolled_validators: loaded_enrolled.unwrap_or_default(),
            pending,
            finalized: read_epoch_map(&db, COLUMN_EPOCHS, pending.number)?,
            state_roots: read_hash_map(&db, COLUMN_STATE_ROOTS, pending.number)?,
            mailbox_roots: read_hash_map(&db, COLUMN_MAILBOX_ROOTS, pending.number)?,
            ism_paused: loaded_paused.unwrap_or(false),
        };

        if loaded_epoch_length.is_none() {
            db.put(COLUMN_CONFIG, KEY_EPOCH_LENGTH, &epoch_length.to_be_bytes())?;
        }
        if db.get(COLUMN_CONFIG, KEY_PENDING_EPOCH)?.is_none() {
            db.put(COLUMN_CONFIG, KEY_PENDING_EPOCH, &encode_epoch(&inner.pending))?;
        }

        Ok(Self { db, inner: RwLock::new(inner) })
    }

    pub fn epoch_length(&self) -> u64 {
        self.inner.read().epoch_length
    }

    pub fn hook_address(&self) -> AppLayerAddress {
        self.inner.read().hook_address
    }

    pub fn enrolled_validators(&self) -> Vec<Address> {
        self.inner.read().enrolled_validators.clone()
    }

    pub fn pending_epoch(&self) -> Epoch {
        self.inner.read().pending
    }

    pub fn ism_paused(&self) -> bool {
        self.inner.read().ism_paused
    }

    pub fn finalized_epoch(&self, number: u64) -> Result<Epoch, BridgeError> {
        self.inner
            .read()
            .finalized
            .get(&number)
            .copied()
            .ok_or_else(|| BridgeError::NotFound(format!("finalized epoch {number}")))
    }

    /// The most recently finalized epoch: `pending.number - 1`.
    pub fn latest_finalized_epoch(&self) -> Result<Epoch, BridgeError> {
        let pending = self.pending_epoch();
        if pending.number == 0 {
            return Err(BridgeError::NotFound("no finalized epoch".to_string()));
        }
        self.finalized_epoch(pending.number - 1)
    }

    pub fn state_root(&self, epoch: u64) -> Result<Hash, BridgeError> {
        self.inner
            .read()
            .state_roots
            .get(&epoch)
            .copied()
            .ok_or_else(|| BridgeError::NotFound(format!("state root for epoch {epoch}")))
    }

    pub fn latest_state_root(&self) -> Result<Hash, BridgeError> {
        let pending = self.pending_epoch();
        if pending.number == 0 {
            return Err(BridgeError::NotFound("no finalized epoch".to_string()));
        }
        self.state_root(pending.number - 1)
    }

    pub fn mailbox_root(&self, epoch: u64) -> Result<Hash, BridgeError> {
        self.inner
            .read()
            .mailbox_roots
            .get(&epoch)
            .copied()
            .ok_or_else(|| BridgeError::NotFound(format!("mailbox root for epoch {epoch}")))
    }

    pub fn latest_mailbox_root(&self) -> Result<Hash, BridgeError> {
        let pending = self.pending_epoch();
        if pending.number == 0 {
            return Err(BridgeError::NotFound("no finalized epoch".to_string()));
        }
        self.mailbox_root(pending.number - 1)
    }

    pub fn finalized_epochs_paginated(&self, page: Pagination) -> Page<Epoch> {
        let inner = self.inner.read();
        paginate(inner.finalized.values().copied(), inner.finalized.len(), page)
    }

    pub fn state_roots_paginated(&self, page: Pagination) -> Page<(u64, Hash)> {
        let inner = self.inner.read();
        paginate(
            inner.state_roots.iter().map(|(k, v)| (*k, *v)),
            inner.state_roots.len(),
            page,
        )
    }

    pub fn mailbox_roots_paginated(&self, page: Pagination) -> Page<(u64, Hash)> {
        let inner = self.inner.read();
        paginate(
            inner.mailbox_roots.iter().map(|(k, v)| (*k, *v)),
            inner.mailbox_roots.len(),
            page,
        )
    }

    /// Governance: update the epoch length, returning the old value.
    pub fn set_epoch_length(&self, new_length: u64) -> Result<u64, BridgeError> {
        let mut inner = self.inner.write();
        let old = inner.epoch_length;
        self.db.put(COLUMN_CONFIG, KEY_EPOCH_LENGTH, &new_length.to_be_bytes())?;
        inner.epoch_length = new_length;
        Ok(old)
    }

    /// Governance: update the hook address, returning the old value.
    pub fn set_hook_address(&self, new_address: AppLayerAddress) -> Result<AppLayerAddress, BridgeError> {
        let mut inner = self.inner.write();
        let old = inner.hook_address;
        self.db
            .put(COLUMN_CONFIG, KEY_HOOK_ADDRESS, new_address.as_bytes())?;
        inner.hook_address = new_address;
        Ok(old)
    }

    /// Governance: replace the enrolled-validator set, returning the old one.
    pub fn set_enrolled_validators(&self, new_set: Vec<Address>) -> Result<Vec<Address>, BridgeError> {
        let mut inner = self.inner.write();
        let old = inner.enrolled_validators.clone();
        self.db
            .put(COLUMN_CONFIG, KEY_ENROLLED_VALIDATORS, &encode_validator_list(&new_set))?;
        inner.enrolled_validators = new_set;
        Ok(old)
    }

    /// Governance: flip the ISM paused bit. Returns the previous value so
    /// callers can reject redundant transitions.
    pub fn set_ism_paused(&self, paused: bool) -> Result<bool, BridgeError> {
        let mut inner = self.inner.write();
        let old = inner.ism_paused;
        self.db.put(COLUMN_CONFIG, KEY_ISM_PAUSED, &[paused as u8])?;
        inner.ism_paused = paused;
        Ok(old)
    }

    /// Atomically finalize the pending epoch: write it into the finalized
    /// map, advance pending to the next epoch, and record both roots. All
    /// four writes go through a single `Database::put_batch` call, so
    /// either every entry is persisted together or none is — there's no
    /// partial-write window for a mid-operation failure to land in. `inner`
    /// is only mutated after `put_batch` returns `Ok`.
    pub fn start_new_epoch(&self, state_root: Hash, mailbox_root: Hash) -> Result<Epoch, BridgeError> {
        let mut inner = self.inner.write();

        let finalizing = inner.pending;
        let next = finalizing.next(inner.epoch_length);

        let finalizing_key = finalizing.number.to_be_bytes();
        let finalizing_encoded = encode_epoch(&finalizing);
        let next_encoded = encode_epoch(&next);
        let state_root_bytes = *state_root.as_bytes();
        let mailbox_root_bytes = *mailbox_root.as_bytes();

        self.db.put_batch(&[
            (COLUMN_EPOCHS, &finalizing_key[..], &finalizing_encoded[..]),
            (COLUMN_CONFIG, KEY_PENDING_EPOCH, &next_encoded[..]),
            (COLUMN_STATE_ROOTS, &finalizing_key[..], &state_root_bytes[..]),
            (COLUMN_MAILBOX_ROOTS, &finalizing_key[..], &mailbox_root_bytes[..]),
        ])?;

        inner.finalized.insert(finalizing.number, finalizing);
        inner.state_roots.insert(finalizing.number, state_root);
        inner.mailbox_roots.insert(finalizing.number, mailbox_root);
        inner.pending = next;

        Ok(finalizing)
    }
}

fn paginate<T>(iter: impl Iterator<Item = T>, total: usize, page: Pagination) -> Page<T> {
    let items: Vec<T> = iter
        .skip(page.offset as usize)
        .take(if page.limit == 0 { usize::MAX } else { page.limit as usize })
        .collect();
    Page { items, total: total as u64 }
}

fn encode_epoch(epoch: &Epoch) -> [u8; 24] {
    let mut out = [0u8; 24];
    out[0..8].copy_from_slice(&epoch.number.to_be_bytes());
    out[8..16].copy_from_slice(&epoch.start_height.to_be_bytes());
    out[16..24].copy_from_slice(&epoch.end_height.to_be_bytes());
    out
}

fn decode_epoch(bytes: &[u8]) -> Result<Epoch, BridgeError> {
    if bytes.len() != 24 {
        return Err(BridgeError::Storage(merklith_storage::StorageError::Serialization(
            format!("expected 24-byte epoch, got {}", bytes.len()),
        )));
    }
    Ok(Epoch {
        number: u64::from_be_bytes(bytes[0..8].try_into().unwrap()),
        start_height: u64::from_be_bytes(bytes[8..16].try_into().unwrap()),
        end_height: u64::from_be_bytes(bytes[16..24].try_into().unwrap()),
    })
}

fn encode_validator_list(validators: &[Address]) -> Vec<u8> {
    validators.iter().flat_map(|a| a.as_bytes().to_vec()).collect()
}

fn decode_validator_list(bytes: &[u8]) -> Vec<Address> {
    bytes
        .chunks_exact(20)
        .map(|chunk| {
            let mut buf = [0u8; 20];
            buf.copy_from_slice(chunk);
            Address::from_bytes(buf)
        })
        .collect()
}

fn read_u64(db: &Database, column: &str, key: &[u8]) -> Result<Option<u64>, BridgeError> {
    Ok(db
        .get(column, key)?
        .map(|bytes| u64::from_be_bytes(bytes.as_slice().try_into().unwrap_or([0; 8]))))
}

fn read_bool(db: &Database, column: &str, key: &[u8]) -> Result<Option<bool>, BridgeError> {
    Ok(db.get(column, key)?.map(|bytes| bytes.first() == Some(&1)))
}

fn read_app_layer_address(db: &Database, column: &str, key: &[u8]) -> Result<Option<AppLayerAddress>, BridgeError> {
    Ok(db.get(column, key)?.and_then(|bytes| {
        let arr: [u8; 20] = bytes.as_slice().try_into().ok()?;
        Some(AppLayerAddress::from_bytes(arr))
    }))
}

fn read_validator_list(db: &Database, column: &str, key: &[u8]) -> Result<Option<Vec<Address>>, BridgeError> {
    Ok(db.get(column, key)?.map(|bytes| decode_validator_list(&bytes)))
}

fn read_epoch(db: &Database, column: &str, key: &[u8]) -> Result<Option<Epoch>, BridgeError> {
    match db.get(column, key)? {
        Some(bytes) => Ok(Some(decode_epoch(&bytes)?)),
        None => Ok(None),
    }
}

/// Reconstructs the finalized-epoch map on open. Finalized epochs are
/// numbered sequentially from zero (see `start_new_epoch`), so every key up
/// to (but excluding) `pending_number` is known to exist without needing a
/// column-scan API from `Database`.
fn read_epoch_map(db: &Database, column: &str, pending_number: u64) -> Result<BTreeMap<u64, Epoch>, BridgeError> {
    let mut map = BTreeMap::new();
    for number in 0..pending_number {
        if let Some(bytes) = db.get(column, &number.to_be_bytes())? {
            map.insert(number, decode_epoch(&bytes)?);
        }
    }
    Ok(map)
}

fn read_hash_map(db: &Database, column: &str, pending_number: u64) -> Result<BTreeMap<u64, Hash>, BridgeError> {
    let mut map = BTreeMap::new();
    for number in 0..pending_number {
        if let Some(bytes) = db.get(column, &number.to_be_bytes())? {
            let hash = Hash::from_slice(&bytes)
                .map_err(|e| BridgeError::Storage(merklith_storage::StorageError::Serialization(e.to_string())))?;
            map.insert(number, hash);
        }
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_store() -> (TempDir, BridgeStore) {
        let dir = TempDir::new().unwrap();
        let store = BridgeStore::open(dir.path(), 10, AppLayerAddress::ZERO).unwrap();
        (dir, store)
    }

    #[test]
    fn test_genesis_pending_epoch() {
        let (_dir, store) = open_store();
        assert_eq!(store.pending_epoch(), Epoch { number: 0, start_height: 0, end_height: 10 });
        assert!(store.latest_finalized_epoch().is_err());
    }

    #[test]
    fn test_start_new_epoch_advances_pending_and_records_roots() {
        let (_dir, store) = open_store();
        let state_root = Hash::compute(b"state");
        let mailbox_root = Hash::compute(b"mailbox");

        let finalized = store.start_new_epoch(state_root, mailbox_root).unwrap();
        assert_eq!(finalized.number, 0);

        assert_eq!(store.pending_epoch(), Epoch { number: 1, start_height: 10, end_height: 20 });
        assert_eq!(store.finalized_epoch(0).unwrap(), finalized);
        assert_eq!(store.state_root(0).unwrap(), state_root);
        assert_eq!(store.mailbox_root(0).unwrap(), mailbox_root);
        assert_eq!(store.latest_state_root().unwrap(), state_root);
        assert_eq!(store.latest_mailbox_root().unwrap(), mailbox_root);
        assert_eq!(store.latest_finalized_epoch().unwrap(), finalized);
    }

    #[test]
    fn test_governance_setters_return_old_values() {
        let (_dir, store) = open_store();
        let old_length = store.set_epoch_length(50).unwrap();
        assert_eq!(old_length, 10);
        assert_eq!(store.epoch_length(), 50);

        let old_hook = store.set_hook_address(AppLayerAddress::from_bytes([9; 20])).unwrap();
        assert!(old_hook.is_zero());
    }

    #[test]
    fn test_ism_paused_toggle() {
        let (_dir, store) = open_store();
        assert!(!store.ism_paused());
        let old = store.set_ism_paused(true).unwrap();
        assert!(!old);
        assert!(store.ism_paused());
    }

    #[test]
    fn test_pagination() {
        let (_dir, store) = open_store();
        for i in 0..3u8 {
            store
                .start_new_epoch(Hash::compute(&[i]), Hash::compute(&[i + 1]))
                .unwrap();
        }
        let page = store.finalized_epochs_paginated(Pagination { offset: 1, limit: 1 });
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].number, 1);
    }

    #[test]
    fn test_state_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = BridgeStore::open(dir.path(), 10, AppLayerAddress::ZERO).unwrap();
            store
                .start_new_epoch(Hash::compute(b"a"), Hash::compute(b"b"))
                .unwrap();
        }
        let reopened = BridgeStore::open(dir.path(), 10, AppLayerAddress::ZERO).unwrap();
        assert_eq!(reopened.pending_epoch().number, 1);
        assert_eq!(reopened.finalized_epoch(0).unwrap().number, 0);
    }
}
