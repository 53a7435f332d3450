//! Epoch finalizer: the pre-block hook that promotes an injected, already
//! re-validated winner into durable state.

use crate::config::FinalizeFailureHook;
use crate::events::{BridgeEvent, EpochFinalized, EventSink};
use crate::injection;
use crate::state::BridgeStore;

/// Pre-block hook. Never fails the block: a storage failure here is logged
/// and swallowed rather than surfaced, per the module's policy that epoch
/// finalization must never stall consensus (see the asymmetry this creates
/// with `ProcessProposal`'s strict validation). `on_finalize_failure` still
/// observes the swallowed error, typically `BridgeConfig::on_finalize_failure`.
pub fn finalize_pending_epoch(
    store: &BridgeStore,
    vote_extensions_enabled: bool,
    block_txs: &[Vec<u8>],
    sink: &dyn EventSink,
    on_finalize_failure: &FinalizeFailureHook,
) {
    if !vote_extensions_enabled {
        return;
    }

    let Some(injection) = block_txs.iter().take(2).find_map(|tx| injection::parse_injection(tx)) else {
        return;
    };

    match store.start_new_epoch(injection.state_root, injection.mailbox_root) {
        Ok(finalized) => {
            sink.emit(BridgeEvent::EpochFinalized(EpochFinalized {
                epoch_number: finalized.number,
                state_root: injection.state_root,
                mailbox_root: injection.mailbox_root,
            }));
        }
        Err(err) => {
            tracing::error!(%err, epoch = injection.epoch_number, "failed to finalize epoch, continuing block production");
            on_finalize_failure(injection.epoch_number, &err);
        }
    }
}
