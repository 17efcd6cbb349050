//! Task that keeps the shared chain-status view in sync with `bitcoind`.

use std::{sync::Arc, time::Duration};

use garnet_primitives::L1Status;
use garnet_status::StatusChannel;
use tokio::sync::watch;
use tracing::*;

use crate::rpc::traits::ReaderRpc;

/// Confirmation target used for the fee estimate fed into the status view.
const FEE_CONF_TARGET: u16 = 1;

/// Polls `bitcoind` and publishes the resulting [`L1Status`] until shutdown
/// is signalled.
///
/// A failed poll leaves the previous status in place; the view only ever
/// reflects data the node actually reported.
pub async fn l1_status_task<R: ReaderRpc>(
    client: Arc<R>,
    status: StatusChannel,
    poll_interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval(poll_interval);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match poll_l1_status(client.as_ref()).await {
                    Ok(l1) => status.update_l1_status(l1),
                    Err(err) => warn!(%err, "failed to poll bitcoin status"),
                }
            }
            res = shutdown_rx.changed() => {
                if res.is_err() || *shutdown_rx.borrow() {
                    info!("l1 status task received shutdown");
                    break;
                }
            }
        }
    }
}

async fn poll_l1_status<R: ReaderRpc>(client: &R) -> crate::rpc::ClientResult<L1Status> {
    let info = client.get_blockchain_info().await?;
    let network_fee = client.estimate_smart_fee(FEE_CONF_TARGET).await?;

    Ok(L1Status {
        syncing: !info.is_synced(),
        network_fee,
        latest_height: info.blocks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestBitcoinClient;

    #[tokio::test]
    async fn poll_reports_synced_node() {
        let client = TestBitcoinClient::new(101, 3);
        let l1 = poll_l1_status(&client).await.unwrap();

        assert!(!l1.syncing);
        assert_eq!(l1.latest_height, 101);
        assert_eq!(l1.network_fee, 3);
    }

    #[tokio::test]
    async fn poll_reports_ibd_as_syncing() {
        let mut client = TestBitcoinClient::new(50, 3);
        client.initial_block_download = true;
        let l1 = poll_l1_status(&client).await.unwrap();

        assert!(l1.syncing);
    }
}
