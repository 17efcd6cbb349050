use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default value for `fee_ceiling` in [`WithdrawalConfig`], in sat/vB.
const DEFAULT_FEE_CEILING: u64 = 500;

/// Default value for `cooldown_blocks` in [`WithdrawalConfig`].
const DEFAULT_COOLDOWN_BLOCKS: u64 = 1;

/// Default value for `poll_interval_secs` in [`WithdrawalConfig`].
const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Configuration for the withdrawal broadcast engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalConfig {
    /// Network fee rate (sat/vB) above which broadcasting is suspended.
    #[serde(default = "default_fee_ceiling")]
    pub fee_ceiling: u64,

    /// How many Bitcoin blocks to wait after a broadcast before the next
    /// one is attempted.
    #[serde(default = "default_cooldown_blocks")]
    pub cooldown_blocks: u64,

    /// How often to fire the broadcast tick.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Path to the hex-encoded withdrawal signing key. May be omitted if
    /// the key is supplied through the environment instead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_path: Option<PathBuf>,

    /// Identity this relayer presents when comparing against the epoch
    /// proposer.
    pub relayer_id: String,
}

fn default_fee_ceiling() -> u64 {
    DEFAULT_FEE_CEILING
}

fn default_cooldown_blocks() -> u64 {
    DEFAULT_COOLDOWN_BLOCKS
}

fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}
