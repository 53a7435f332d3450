//! Domain events emitted by the bridge module.
//!
//! Emission is routed through an injected `EventSink` rather than a global,
//! matching the host engine's event-manager collaborator: the bridge never
//! knows how events reach a block's event log, only that they do.

use merklith_types::{Address, Hash};

use crate::types::AppLayerAddress;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpochFinalized {
    pub epoch_number: u64,
    pub state_root: Hash,
    pub mailbox_root: Hash,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpochLengthSet {
    pub old_epoch_length: u64,
    pub new_epoch_length: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookAddressSet {
    pub old_hook_address: AppLayerAddress,
    pub new_hook_address: AppLayerAddress,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrolledValidatorsSet {
    pub old_enrolled_validators: Vec<Address>,
    pub new_enrolled_validators: Vec<Address>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsmPaused;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsmUnpaused;

/// A bridge event, for sinks that want a single enum to match on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    EpochFinalized(EpochFinalized),
    EpochLengthSet(EpochLengthSet),
    HookAddressSet(HookAddressSet),
    EnrolledValidatorsSet(EnrolledValidatorsSet),
    IsmPaused(IsmPaused),
    IsmUnpaused(IsmUnpaused),
}

/// Narrow collaborator for emitting domain events into the host engine's
/// event log. Mirrors `merklith-consensus`/`merklith-governance`'s habit of
/// depending on a trait at this seam rather than a concrete event bus.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: BridgeEvent);
}

/// An `EventSink` that only logs via `tracing`. Useful as a default and in
/// tests; production wiring replaces it with one that writes into the
/// block's event log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: BridgeEvent) {
        match &event {
            BridgeEvent::EpochFinalized(e) => {
                tracing::info!(epoch = e.epoch_number, state_root = %e.state_root, mailbox_root = %e.mailbox_root, "epoch finalized");
            }
            BridgeEvent::EpochLengthSet(e) => {
                tracing::info!(old = e.old_epoch_length, new = e.new_epoch_length, "epoch length updated");
            }
            BridgeEvent::HookAddressSet(e) => {
                tracing::info!(old = %e.old_hook_address, new = %e.new_hook_address, "hook address updated");
            }
            BridgeEvent::EnrolledValidatorsSet(e) => {
                tracing::info!(
                    old_count = e.old_enrolled_validators.len(),
                    new_count = e.new_enrolled_validators.len(),
                    "enrolled validators updated"
                );
            }
            BridgeEvent::IsmPaused(_) => tracing::warn!("ism paused"),
            BridgeEvent::IsmUnpaused(_) => tracing::info!("ism unpaused"),
        }
    }
}

/// Convenience used by tests: collects emitted events in order.
#[derive(Default)]
pub struct RecordingEventSink {
    events: parking_lot::Mutex<Vec<BridgeEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<BridgeEvent> {
        self.events.lock().clone()
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: BridgeEvent) {
        self.events.lock().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_captures_events() {
        let sink = RecordingEventSink::new();
        sink.emit(BridgeEvent::IsmPaused(IsmPaused));
        sink.emit(BridgeEvent::EpochLengthSet(EpochLengthSet {
            old_epoch_length: 10,
            new_epoch_length: 20,
        }));
        assert_eq!(sink.events().len(), 2);
    }
}
