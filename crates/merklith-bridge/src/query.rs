//! Read-only query surface, mirroring the Go module's `QueryServer`:
//! config, pending epoch, finalized epoch(s), state root(s), mailbox
//! root(s) — each available by exact key or as "latest", plus paginated
//! listings.

use merklith_types::{Address, Hash};

use crate::error::BridgeError;
use crate::state::{BridgeStore, Page, Pagination};
use crate::types::{AppLayerAddress, Epoch};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigResponse {
    pub epoch_length: u64,
    pub hook_address: AppLayerAddress,
    pub enrolled_validators: Vec<Address>,
}

pub fn config(store: &BridgeStore) -> ConfigResponse {
    ConfigResponse {
        epoch_length: store.epoch_length(),
        hook_address: store.hook_address(),
        enrolled_validators: store.enrolled_validators(),
    }
}

pub fn pending_epoch(store: &BridgeStore) -> Epoch {
    store.pending_epoch()
}

pub fn finalized_epoch(store: &BridgeStore, number: u64) -> Result<Epoch, BridgeError> {
    store.finalized_epoch(number)
}

pub fn latest_finalized_epoch(store: &BridgeStore) -> Result<Epoch, BridgeError> {
    store.latest_finalized_epoch()
}

pub fn finalized_epochs(store: &BridgeStore, page: Pagination) -> Page<Epoch> {
    store.finalized_epochs_paginated(page)
}

pub fn state_root(store: &BridgeStore, epoch: u64) -> Result<Hash, BridgeError> {
    store.state_root(epoch)
}

pub fn latest_state_root(store: &BridgeStore) -> Result<Hash, BridgeError> {
    store.latest_state_root()
}

pub fn state_roots(store: &BridgeStore, page: Pagination) -> Page<(u64, Hash)> {
    store.state_roots_paginated(page)
}

pub fn mailbox_root(store: &BridgeStore, epoch: u64) -> Result<Hash, BridgeError> {
    store.mailbox_root(epoch)
}

pub fn latest_mailbox_root(store: &BridgeStore) -> Result<Hash, BridgeError> {
    store.latest_mailbox_root()
}

pub fn mailbox_roots(store: &BridgeStore, page: Pagination) -> Page<(u64, Hash)> {
    store.mailbox_roots_paginated(page)
}
