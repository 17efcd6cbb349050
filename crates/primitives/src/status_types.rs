use serde::{Deserialize, Serialize};

use crate::RelayerId;

/// Snapshot of the Bitcoin chain view maintained by the external L1 sync
/// engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct L1Status {
    /// Whether the L1 view is still catching up to the network tip.
    pub syncing: bool,

    /// Current network fee rate estimate, in sat/vB.
    pub network_fee: u64,

    /// Height of the latest block the sync engine has seen.
    pub latest_height: u64,
}

impl Default for L1Status {
    fn default() -> Self {
        // Absence of data is represented as "still syncing", never an error.
        Self {
            syncing: true,
            network_fee: 0,
            latest_height: 0,
        }
    }
}

/// Snapshot of the Layer-2 ledger view maintained by the external L2 sync
/// engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct L2Status {
    /// Whether the L2 view is still catching up.
    pub syncing: bool,

    /// Current L2 ledger height.
    pub height: u64,

    /// The latest Bitcoin height the L2 ledger has observed and recorded.
    pub latest_btc_height: u64,
}

impl Default for L2Status {
    fn default() -> Self {
        Self {
            syncing: true,
            height: 0,
            latest_btc_height: 0,
        }
    }
}

/// The epoch/proposer assignment produced by the L2 consensus. Immutable
/// snapshot per read; exactly one proposer is authorized to broadcast
/// withdrawals during an epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochVoter {
    pub epoch: u64,

    /// Identity of the relayer elected proposer for this epoch.
    pub proposer: RelayerId,

    /// L2 height at which this assignment became effective.
    pub height: u64,
}

impl Default for EpochVoter {
    fn default() -> Self {
        Self {
            epoch: 0,
            proposer: RelayerId::new(""),
            height: 0,
        }
    }
}
