//! Authority-gated governance messages.
//!
//! Mirrors `merklith-governance`'s proposal/voting authority checks: every
//! handler here compares the message signer against a single configured
//! authority address rather than running a vote, since these are
//! operational knobs, not chain-wide proposals.

use merklith_types::Address;

use crate::error::BridgeError;
use crate::events::{BridgeEvent, EnrolledValidatorsSet, EpochLengthSet, EventSink, HookAddressSet};
use crate::ism;
use crate::state::BridgeStore;
use crate::types::AppLayerAddress;

fn check_authority(authority: Address, signer: Address) -> Result<(), BridgeError> {
    if authority != signer {
        return Err(BridgeError::InvalidAuthority { expected: authority.to_string(), actual: signer.to_string() });
    }
    Ok(())
}

pub fn set_epoch_length(
    store: &BridgeStore,
    authority: Address,
    signer: Address,
    new_length: u64,
    sink: &dyn EventSink,
) -> Result<(), BridgeError> {
    check_authority(authority, signer)?;
    if new_length == 0 {
        return Err(BridgeError::InvalidRequest("epoch length must be > 0".to_string()));
    }
    let old_length = store.set_epoch_length(new_length)?;
    sink.emit(BridgeEvent::EpochLengthSet(EpochLengthSet { old_epoch_length: old_length, new_epoch_length: new_length }));
    Ok(())
}

pub fn set_hook_address(
    store: &BridgeStore,
    authority: Address,
    signer: Address,
    new_address: AppLayerAddress,
    sink: &dyn EventSink,
) -> Result<(), BridgeError> {
    check_authority(authority, signer)?;
    let old_address = store.set_hook_address(new_address)?;
    sink.emit(BridgeEvent::HookAddressSet(HookAddressSet { old_hook_address: old_address, new_hook_address: new_address }));
    Ok(())
}

pub fn set_enrolled_validators(
    store: &BridgeStore,
    authority: Address,
    signer: Address,
    new_set: Vec<Address>,
    sink: &dyn EventSink,
) -> Result<(), BridgeError> {
    check_authority(authority, signer)?;
    let old_set = store.set_enrolled_validators(new_set.clone())?;
    sink.emit(BridgeEvent::EnrolledValidatorsSet(EnrolledValidatorsSet {
        old_enrolled_validators: old_set,
        new_enrolled_validators: new_set,
    }));
    Ok(())
}

pub fn pause(store: &BridgeStore, authority: Address, signer: Address, sink: &dyn EventSink) -> Result<(), BridgeError> {
    check_authority(authority, signer)?;
    ism::pause(store, sink)
}

pub fn unpause(store: &BridgeStore, authority: Address, signer: Address, sink: &dyn EventSink) -> Result<(), BridgeError> {
    check_authority(authority, signer)?;
    ism::unpause(store, sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingEventSink;
    use tempfile::TempDir;

    fn open_store() -> (TempDir, BridgeStore) {
        let dir = TempDir::new().unwrap();
        let store = BridgeStore::open(dir.path(), 10, AppLayerAddress::ZERO).unwrap();
        (dir, store)
    }

    #[test]
    fn test_set_epoch_length_rejects_wrong_signer() {
        let (_dir, store) = open_store();
        let sink = RecordingEventSink::new();
        let authority = Address::from_bytes([1; 20]);
        let wrong_signer = Address::from_bytes([2; 20]);
        let result = set_epoch_length(&store, authority, wrong_signer, 50, &sink);
        assert!(matches!(result, Err(BridgeError::InvalidAuthority { .. })));
    }

    #[test]
    fn test_set_epoch_length_rejects_zero() {
        let (_dir, store) = open_store();
        let sink = RecordingEventSink::new();
        let authority = Address::from_bytes([1; 20]);
        let result = set_epoch_length(&store, authority, authority, 0, &sink);
        assert!(matches!(result, Err(BridgeError::InvalidRequest(_))));
    }

    #[test]
    fn test_set_epoch_length_updates_and_emits() {
        let (_dir, store) = open_store();
        let sink = RecordingEventSink::new();
        let authority = Address::from_bytes([1; 20]);
        set_epoch_length(&store, authority, authority, 50, &sink).unwrap();
        assert_eq!(store.epoch_length(), 50);
        assert_eq!(sink.events().len(), 1);
    }

    #[test]
    fn test_set_hook_address_updates_and_emits() {
        let (_dir, store) = open_store();
        let sink = RecordingEventSink::new();
        let authority = Address::from_bytes([1; 20]);
        let new_hook = AppLayerAddress::from_bytes([9; 20]);
        set_hook_address(&store, authority, authority, new_hook, &sink).unwrap();
        assert_eq!(store.hook_address(), new_hook);
        assert_eq!(sink.events().len(), 1);
    }

    #[test]
    fn test_set_enrolled_validators_updates_and_emits() {
        let (_dir, store) = open_store();
        let sink = RecordingEventSink::new();
        let authority = Address::from_bytes([1; 20]);
        let validators = vec![Address::from_bytes([3; 20]), Address::from_bytes([4; 20])];
        set_enrolled_validators(&store, authority, authority, validators.clone(), &sink).unwrap();
        assert_eq!(store.enrolled_validators(), validators);
        assert_eq!(sink.events().len(), 1);
    }

    #[test]
    fn test_pause_unpause_round_trip_through_governance() {
        let (_dir, store) = open_store();
        let sink = RecordingEventSink::new();
        let authority = Address::from_bytes([1; 20]);

        pause(&store, authority, authority, &sink).unwrap();
        assert!(store.ism_paused());

        unpause(&store, authority, authority, &sink).unwrap();
        assert!(!store.ism_paused());
    }

    #[test]
    fn test_pause_rejects_wrong_signer() {
        let (_dir, store) = open_store();
        let sink = RecordingEventSink::new();
        let authority = Address::from_bytes([1; 20]);
        let wrong_signer = Address::from_bytes([2; 20]);
        assert!(matches!(pause(&store, authority, wrong_signer, &sink), Err(BridgeError::InvalidAuthority { .. })));
    }
}
