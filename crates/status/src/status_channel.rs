use std::sync::Arc;

use garnet_primitives::{EpochVoter, L1Status, L2Status};
use tokio::sync::watch;
use tracing::warn;

/// A wrapper around the status senders and receivers.
///
/// Gives every task a read-only view of the latest Bitcoin-head, Layer-2
/// and epoch-voter snapshots, and lets the external sync engines publish
/// updates. Getters always return the most recent snapshot; there is no
/// caching beyond what the watch channels hold.
#[derive(Clone)]
pub struct StatusChannel {
    /// Shared reference to the status senders.
    sender: Arc<StatusSender>,
    /// Shared reference to the status receivers.
    receiver: Arc<StatusReceiver>,
}

impl std::fmt::Debug for StatusChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StatusChannel")
    }
}

impl StatusChannel {
    /// Creates a new [`StatusChannel`] seeded with the given snapshots.
    pub fn new(l1: L1Status, l2: L2Status, epoch: EpochVoter) -> Self {
        let (l1_tx, l1_rx) = watch::channel(l1);
        let (l2_tx, l2_rx) = watch::channel(l2);
        let (epoch_tx, epoch_rx) = watch::channel(epoch);

        let sender = Arc::new(StatusSender {
            l1: l1_tx,
            l2: l2_tx,
            epoch: epoch_tx,
        });
        let receiver = Arc::new(StatusReceiver {
            l1: l1_rx,
            l2: l2_rx,
            epoch: epoch_rx,
        });

        Self { sender, receiver }
    }

    // Receiver methods

    /// Gets the latest [`L1Status`].
    pub fn l1_status(&self) -> L1Status {
        self.receiver.l1.borrow().clone()
    }

    /// Gets the latest [`L2Status`].
    pub fn l2_status(&self) -> L2Status {
        self.receiver.l2.borrow().clone()
    }

    /// Gets the latest [`EpochVoter`] assignment.
    pub fn epoch_voter(&self) -> EpochVoter {
        self.receiver.epoch.borrow().clone()
    }

    // Sender methods

    /// Publishes a new [`L1Status`]. Logs a warning if all receivers are
    /// dropped.
    pub fn update_l1_status(&self, status: L1Status) {
        if self.sender.l1.send(status).is_err() {
            warn!("l1 status receiver dropped");
        }
    }

    /// Publishes a new [`L2Status`]. Logs a warning if all receivers are
    /// dropped.
    pub fn update_l2_status(&self, status: L2Status) {
        if self.sender.l2.send(status).is_err() {
            warn!("l2 status receiver dropped");
        }
    }

    /// Publishes a new [`EpochVoter`] assignment. Logs a warning if all
    /// receivers are dropped.
    pub fn update_epoch_voter(&self, epoch: EpochVoter) {
        if self.sender.epoch.send(epoch).is_err() {
            warn!("epoch voter receiver dropped");
        }
    }
}

impl Default for StatusChannel {
    /// A channel whose chain views start out as "still syncing".
    fn default() -> Self {
        Self::new(
            L1Status::default(),
            L2Status::default(),
            EpochVoter::default(),
        )
    }
}

/// Wrapper for watch status receivers.
struct StatusReceiver {
    l1: watch::Receiver<L1Status>,
    l2: watch::Receiver<L2Status>,
    epoch: watch::Receiver<EpochVoter>,
}

/// Wrapper for watch status senders.
struct StatusSender {
    l1: watch::Sender<L1Status>,
    l2: watch::Sender<L2Status>,
    epoch: watch::Sender<EpochVoter>,
}

#[cfg(test)]
mod tests {
    use garnet_primitives::RelayerId;

    use super::*;

    #[test]
    fn default_views_are_syncing() {
        let channel = StatusChannel::default();
        assert!(channel.l1_status().syncing);
        assert!(channel.l2_status().syncing);
    }

    #[test]
    fn updates_are_visible_to_clones() {
        let channel = StatusChannel::default();
        let other = channel.clone();

        channel.update_l1_status(L1Status {
            syncing: false,
            network_fee: 12,
            latest_height: 800_000,
        });
        channel.update_epoch_voter(EpochVoter {
            epoch: 7,
            proposer: RelayerId::new("relayer0"),
            height: 42,
        });

        assert_eq!(other.l1_status().latest_height, 800_000);
        assert_eq!(other.epoch_voter().epoch, 7);
        assert_eq!(other.epoch_voter().proposer, RelayerId::new("relayer0"));
    }
}
