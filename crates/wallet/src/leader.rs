//! Leadership gating for the broadcast engine.

use garnet_primitives::{EpochVoter, RelayerId};

/// Decides whether this relayer may drive withdrawals in the current epoch.
///
/// Authority comes from the epoch voter snapshot: only the elected proposer
/// signs and broadcasts. Everyone else idles until the next election.
#[derive(Debug, Clone)]
pub struct LeaderGate {
    identity: RelayerId,
}

impl LeaderGate {
    pub fn new(identity: RelayerId) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &RelayerId {
        &self.identity
    }

    /// Whether this relayer is the current epoch's proposer.
    pub fn is_authorized(&self, epoch: &EpochVoter) -> bool {
        epoch.proposer == self.identity
    }

    /// Whether a lost leadership needs cleanup.
    ///
    /// True once the L2 chain has advanced past the epoch's election height
    /// by more than one block while we still hold state from an earlier
    /// signing cycle. Unfinished orders from that cycle cannot be resumed
    /// under a new proposer and must be discarded.
    pub fn should_reconcile(&self, was_active: bool, epoch: &EpochVoter, l2_height: u64) -> bool {
        was_active && l2_height > epoch.height + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn epoch(proposer: &str, height: u64) -> EpochVoter {
        EpochVoter {
            epoch: 7,
            proposer: RelayerId::new(proposer),
            height,
        }
    }

    #[test]
    fn proposer_equality_gates_authority() {
        let gate = LeaderGate::new(RelayerId::new("relayer-0"));
        assert!(gate.is_authorized(&epoch("relayer-0", 10)));
        assert!(!gate.is_authorized(&epoch("relayer-1", 10)));
    }

    #[test]
    fn reconcile_needs_prior_activity_and_stale_epoch() {
        let gate = LeaderGate::new(RelayerId::new("relayer-0"));
        let e = epoch("relayer-1", 10);

        assert!(!gate.should_reconcile(false, &e, 20));
        // Exactly one block past the election height is still fresh.
        assert!(!gate.should_reconcile(true, &e, 11));
        assert!(gate.should_reconcile(true, &e, 12));
    }
}
