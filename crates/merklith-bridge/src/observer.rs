//! External observer: reads AppLayer execution-chain state through a narrow
//! client trait, the way `merklith-consensus` depends on collaborator traits
//! rather than a concrete RPC client at its seams.

use std::time::Duration;

use merklith_types::Hash;
use tokio::time::Instant;

use crate::error::BridgeError;
use crate::types::{AppLayerAddress, Observation};

/// Minimal surface the bridge needs from the AppLayer execution chain.
/// Implementations typically wrap a JSON-RPC client; tests use an in-memory
/// fake.
#[async_trait::async_trait]
pub trait AppLayerClient: Send + Sync {
    /// The execution chain's state root committed at `height`, or `Ok(None)`
    /// if that height hasn't been produced yet.
    async fn block_state_root(&self, height: u64) -> Result<Option<Hash>, BridgeError>;

    /// `MerkleTreeHook.root()` read at `height` against `hook`. `Ok(None)`
    /// has the same not-ready meaning as `block_state_root`.
    async fn hook_root(&self, hook: AppLayerAddress, height: u64) -> Result<Option<Hash>, BridgeError>;
}

/// Observe the AppLayer at `height`: the state root always must resolve, and
/// the mailbox root collapses to `Hash::ZERO` when no hook is configured or
/// the hook call itself fails, per the module's explicit design choice not
/// to let a broken hook block epoch finalization.
///
/// Both RPC calls share a single `timeout`-wide deadline rather than each
/// getting the full duration: a block_state_root call that eats 90% of the
/// budget must not hand hook_root a fresh full timeout on top of it.
pub async fn observe(
    client: &dyn AppLayerClient,
    height: u64,
    hook_address: AppLayerAddress,
    timeout: Duration,
) -> Result<Observation, BridgeError> {
    let deadline = Instant::now() + timeout;

    let state_root = match tokio::time::timeout_at(deadline, client.block_state_root(height)).await {
        Ok(Ok(Some(root))) => root,
        Ok(Ok(None)) => return Ok(Observation::NotReady),
        Ok(Err(err)) => return Err(err),
        Err(_) => return Err(BridgeError::Transient(format!("state root observation at height {height} timed out"))),
    };

    if hook_address.is_zero() {
        return Ok(Observation::Ready { state_root, mailbox_root: Hash::ZERO });
    }

    let mailbox_root = match tokio::time::timeout_at(deadline, client.hook_root(hook_address, height)).await {
        Ok(Ok(Some(root))) => root,
        Ok(Ok(None)) => return Ok(Observation::NotReady),
        Ok(Err(err)) => {
            tracing::warn!(%err, %hook_address, height, "mailbox hook call failed, recording zero root");
            Hash::ZERO
        }
        Err(_) => {
            tracing::warn!(%hook_address, height, "mailbox hook call timed out, recording zero root");
            Hash::ZERO
        }
    };

    Ok(Observation::Ready { state_root, mailbox_root })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FakeClient {
        state_root: Option<Hash>,
        hook_root: Option<Hash>,
        hook_fails: bool,
        hook_hangs: AtomicBool,
    }

    #[async_trait::async_trait]
    impl AppLayerClient for FakeClient {
        async fn block_state_root(&self, _height: u64) -> Result<Option<Hash>, BridgeError> {
            Ok(self.state_root)
        }

        async fn hook_root(&self, _hook: AppLayerAddress, _height: u64) -> Result<Option<Hash>, BridgeError> {
            if self.hook_hangs.load(Ordering::SeqCst) {
                tokio::time::sleep(Duration::from_secs(10)).await;
            }
            if self.hook_fails {
                return Err(BridgeError::Transient("rpc down".to_string()));
            }
            Ok(self.hook_root)
        }
    }

    #[tokio::test]
    async fn test_ready_when_both_roots_present() {
        let client = FakeClient {
            state_root: Some(Hash::compute(b"state")),
            hook_root: Some(Hash::compute(b"mailbox")),
            hook_fails: false,
            hook_hangs: AtomicBool::new(false),
        };
        let observation = observe(&client, 10, AppLayerAddress::from_bytes([1; 20]), Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(
            observation,
            Observation::Ready {
                state_root: Hash::compute(b"state"),
                mailbox_root: Hash::compute(b"mailbox"),
            }
        );
    }

    #[tokio::test]
    async fn test_not_ready_when_state_root_missing() {
        let client = FakeClient {
            state_root: None,
            hook_root: None,
            hook_fails: false,
            hook_hangs: AtomicBool::new(false),
        };
        let observation = observe(&client, 10, AppLayerAddress::ZERO, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(observation, Observation::NotReady);
    }

    #[tokio::test]
    async fn test_zero_hook_address_skips_hook_call() {
        let client = FakeClient {
            state_root: Some(Hash::compute(b"state")),
            hook_root: None,
            hook_fails: true,
            hook_hangs: AtomicBool::new(false),
        };
        let observation = observe(&client, 10, AppLayerAddress::ZERO, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(
            observation,
            Observation::Ready { state_root: Hash::compute(b"state"), mailbox_root: Hash::ZERO }
        );
    }

    #[tokio::test]
    async fn test_hook_failure_yields_zero_mailbox_root_without_failing() {
        let client = FakeClient {
            state_root: Some(Hash::compute(b"state")),
            hook_root: None,
            hook_fails: true,
            hook_hangs: AtomicBool::new(false),
        };
        let observation = observe(&client, 10, AppLayerAddress::from_bytes([1; 20]), Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(
            observation,
            Observation::Ready { state_root: Hash::compute(b"state"), mailbox_root: Hash::ZERO }
        );
    }

    #[tokio::test]
    async fn test_state_root_timeout_is_transient_error() {
        struct HangingClient;

        #[async_trait::async_trait]
        impl AppLayerClient for HangingClient {
            async fn block_state_root(&self, _height: u64) -> Result<Option<Hash>, BridgeError> {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok(Some(Hash::ZERO))
            }

            async fn hook_root(&self, _hook: AppLayerAddress, _height: u64) -> Result<Option<Hash>, BridgeError> {
                Ok(Some(Hash::ZERO))
            }
        }

        let client = HangingClient;
        let result = observe(&client, 10, AppLayerAddress::ZERO, Duration::from_millis(10)).await;
        assert!(matches!(result, Err(BridgeError::Transient(_))));
    }
}
