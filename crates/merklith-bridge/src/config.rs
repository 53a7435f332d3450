//! Module configuration.
//!
//! Loaded from genesis or governance, following
//! `merklith-node::config::NodeConfig`'s TOML-backed load/validate shape.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use merklith_types::Address;
use serde::{Deserialize, Serialize};

use crate::error::BridgeError;
use crate::types::AppLayerAddress;

/// Counter-ready hook invoked whenever `finalize_pending_epoch` swallows a
/// storage failure instead of surfacing it. Defaults to a no-op; a
/// production deployment wires this to a `prometheus` counter the way
/// `merklith-node` already depends on that crate for its own metrics.
pub type FinalizeFailureHook = Arc<dyn Fn(u64, &BridgeError) + Send + Sync>;

fn no_op_finalize_failure_hook() -> FinalizeFailureHook {
    Arc::new(|_epoch, _err| {})
}

/// Governance-mutable configuration for the bridge module.
#[derive(Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    pub epoch_length: u64,
    #[serde(with = "hook_address_hex")]
    pub hook_address: AppLayerAddress,
    #[serde(default)]
    pub enrolled_validators: Vec<Address>,
    /// Authority allowed to send governance messages (`SetEpochLength`,
    /// `SetHookAddress`, `SetEnrolledValidators`, `Pause`, `Unpause`).
    pub authority: Address,
    /// AppLayer JSON-RPC endpoint used by the external observer.
    pub applayer_rpc_endpoint: String,
    #[serde(with = "humantime_millis", default = "default_rpc_timeout")]
    pub rpc_timeout: Duration,
    /// Observability hook, not part of the on-disk/genesis representation.
    #[serde(skip, default = "no_op_finalize_failure_hook")]
    pub on_finalize_failure: FinalizeFailureHook,
}

impl fmt::Debug for BridgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeConfig")
            .field("epoch_length", &self.epoch_length)
            .field("hook_address", &self.hook_address)
            .field("enrolled_validators", &self.enrolled_validators)
            .field("authority", &self.authority)
            .field("applayer_rpc_endpoint", &self.applayer_rpc_endpoint)
            .field("rpc_timeout", &self.rpc_timeout)
            .field("on_finalize_failure", &"<fn>")
            .finish()
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            // 5s @ 50ms AppLayer block time, matching the original module's
            // default epoch length.
            epoch_length: 100,
            hook_address: AppLayerAddress::ZERO,
            enrolled_validators: Vec::new(),
            authority: Address::ZERO,
            applayer_rpc_endpoint: String::new(),
            rpc_timeout: default_rpc_timeout(),
            on_finalize_failure: no_op_finalize_failure_hook(),
        }
    }
}

fn default_rpc_timeout() -> Duration {
    Duration::from_secs(1)
}

impl BridgeConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &std::path::Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read bridge config '{}': {}", path.display(), e))?;
        let config: BridgeConfig = toml::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("failed to parse bridge config '{}': {}", path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Mirrors the Go module's `DefaultGenesisState`/`Validate`: epoch
    /// length must be strictly positive. The hook address is explicitly
    /// allowed to be zero (see spec's open questions) — it just means the
    /// mailbox root will observe as all-zero until governance sets a real
    /// hook.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.epoch_length == 0 {
            anyhow::bail!("invalid epoch length: must be > 0");
        }
        Ok(())
    }
}

mod hook_address_hex {
    use super::AppLayerAddress;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &AppLayerAddress, serializer: S) -> Result<S::Ok, S::Error> {
        value.to_string().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<AppLayerAddress, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Serializes a `Duration` as whole milliseconds, since TOML has no native
/// duration type.
mod humantime_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        (value.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
