//! Shared chain-view and identity types used across the relayer.
//!
//! These are plain snapshot types: the sync engines that populate them and
//! the consensus mechanism that elects proposers live outside this
//! workspace. Everything here is read-only from the withdrawal engine's
//! point of view.

mod relayer_id;
mod status_types;

pub use relayer_id::RelayerId;
pub use status_types::{EpochVoter, L1Status, L2Status};
