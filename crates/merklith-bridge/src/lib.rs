//! AppLayer epoch finalization bridge.
//!
//! Aggregates validator observations of an external execution chain (the
//! "AppLayer") into BFT-finalized epochs: a `(state_root, mailbox_root)`
//! pair agreed by strict two-thirds of voting power, carried into the chain
//! via vote extensions and cross-validated proposal injection. Also exposes
//! an Interchain Security Module verifier so Hyperlane-style messages can
//! be proven against the finalized mailbox root.

pub mod config;
pub mod error;
pub mod events;
pub mod finalizer;
pub mod governance;
pub mod injection;
pub mod ism;
pub mod observer;
pub mod query;
pub mod state;
pub mod tally;
pub mod types;
pub mod vote_extension;

pub use config::BridgeConfig;
pub use error::BridgeError;
pub use events::{BridgeEvent, EventSink, RecordingEventSink, TracingEventSink};
pub use ism::EXPECTED_ISM_ID;
pub use state::{BridgeStore, Page, Pagination};
pub use types::{AppLayerAddress, Epoch, Observation};
