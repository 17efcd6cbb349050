//! The periodic engine that signs and broadcasts `ReadyToSign` withdrawal
//! orders.
//!
//! Every tick runs a fixed gate sequence before any order is touched: chain
//! views must be synced, fees sane, this relayer must be the elected
//! proposer with an active signing cycle, and the cooldown since the last
//! broadcast must have elapsed. Only then is the ready set processed.

use std::{sync::Arc, time::Duration};

use bitcoin::{consensus::deserialize, secp256k1::SecretKey, Transaction, Txid};
use garnet_btcio::rpc::{error::ClientError, traits::BroadcasterRpc};
use garnet_config::withdrawal::WithdrawalConfig;
use garnet_db::{
    traits::WithdrawalStore,
    types::{OrderStatus, WithdrawalOrderEntry},
    DbError,
};
use garnet_status::StatusChannel;
use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tracing::*;

use crate::{
    custody::CustodyService,
    errors::{BroadcastTickError, SigningError},
    leader::LeaderGate,
    signer::sign_withdrawal_tx,
};

/// Why a tick stopped where it did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The L2 view has not caught up yet.
    L2Syncing,
    /// The Bitcoin view has not caught up yet.
    BtcSyncing,
    /// The observed network fee (sat/vB) is above the configured ceiling.
    FeeTooHigh(u64),
    /// A previous tick is still running.
    Busy,
    /// Another relayer is the current proposer.
    NotProposer,
    /// We are the proposer but no signing cycle is active.
    Inactive,
    /// Still inside the post-broadcast cooldown at this Bitcoin height.
    Cooldown(u64),
    /// All gates passed but no order was waiting.
    NothingReady,
    /// The ready set was processed.
    Processed { submitted: usize, failed: usize },
}

/// Failure while processing a single order. Logged and skipped; the order
/// is left untouched for a later tick.
#[derive(Debug, Error)]
enum OrderError {
    #[error("utxo lookup: {0}")]
    Db(#[from] DbError),

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error("broadcast: {0}")]
    Broadcast(#[from] ClientError),
}

#[derive(Debug, Default)]
struct BroadcastState {
    /// Whether an externally started signing cycle is in flight.
    active: bool,
    /// The L2-observed Bitcoin height of the last successful broadcast.
    last_broadcast_btc_height: u64,
}

/// Drives withdrawal orders from `ReadyToSign` to `Pending`.
#[derive(Debug)]
pub struct WithdrawalBroadcaster<S, C, K> {
    store: Arc<S>,
    client: Arc<C>,
    custody: Arc<K>,
    status: StatusChannel,
    config: WithdrawalConfig,
    gate: LeaderGate,
    state: Mutex<BroadcastState>,
}

impl<S, C, K> WithdrawalBroadcaster<S, C, K>
where
    S: WithdrawalStore,
    C: BroadcasterRpc,
    K: CustodyService,
{
    pub fn new(
        store: Arc<S>,
        client: Arc<C>,
        custody: Arc<K>,
        status: StatusChannel,
        config: WithdrawalConfig,
        gate: LeaderGate,
    ) -> Self {
        Self {
            store,
            client,
            custody,
            status,
            config,
            gate,
            state: Mutex::new(BroadcastState::default()),
        }
    }

    /// Marks a signing cycle as started or finished. Called by the order
    /// preparation phase; the tick only consumes the flag.
    pub async fn set_active(&self, active: bool) {
        self.state.lock().await.active = active;
    }

    pub async fn is_active(&self) -> bool {
        self.state.lock().await.active
    }

    /// Runs one gate-and-process pass.
    ///
    /// Gate aborts are ordinary outcomes; an `Err` means the batch itself
    /// cannot be trusted (store failure, custody failure, or a malformed
    /// stored transaction) and the remainder of the tick was abandoned.
    pub async fn tick(&self) -> Result<TickOutcome, BroadcastTickError> {
        let l2 = self.status.l2_status();
        if l2.syncing {
            debug!("l2 view still syncing, skipping tick");
            return Ok(TickOutcome::L2Syncing);
        }

        let l1 = self.status.l1_status();
        if l1.syncing {
            debug!("bitcoin view still syncing, skipping tick");
            return Ok(TickOutcome::BtcSyncing);
        }

        if l1.network_fee > self.config.fee_ceiling {
            info!(
                fee = %l1.network_fee,
                ceiling = %self.config.fee_ceiling,
                "network fee above ceiling, suspending withdrawals"
            );
            return Ok(TickOutcome::FeeTooHigh(l1.network_fee));
        }

        // Overlapping fires are dropped, not queued.
        let Ok(mut state) = self.state.try_lock() else {
            debug!("previous tick still running");
            return Ok(TickOutcome::Busy);
        };

        let epoch = self.status.epoch_voter();
        if !self.gate.is_authorized(&epoch) {
            if self.gate.should_reconcile(state.active, &epoch, l2.height) {
                let removed = self.store.discard_in_progress().await?;
                state.active = false;
                info!(%removed, proposer = %epoch.proposer, "leadership moved, discarded unfinished orders");
            }
            return Ok(TickOutcome::NotProposer);
        }

        if !state.active {
            debug!("no active signing cycle");
            return Ok(TickOutcome::Inactive);
        }

        if l2.latest_btc_height <= state.last_broadcast_btc_height + self.config.cooldown_blocks {
            debug!(
                height = %l2.latest_btc_height,
                watermark = %state.last_broadcast_btc_height,
                "inside broadcast cooldown"
            );
            return Ok(TickOutcome::Cooldown(l2.latest_btc_height));
        }

        let orders = self
            .store
            .list_orders_by_status(OrderStatus::ReadyToSign)
            .await?;
        if orders.is_empty() {
            return Ok(TickOutcome::NothingReady);
        }

        let key = self.custody.withdrawal_key().await?;

        let mut submitted = 0;
        let mut failed = 0;
        for order in orders {
            let mut tx: Transaction =
                deserialize(&order.unsigned_tx).map_err(|source| BroadcastTickError::MalformedTx {
                    order_id: order.order_id,
                    source,
                })?;

            match self
                .process_order(&key, &order, &mut tx, l2.latest_btc_height)
                .await
            {
                Ok(txid) => {
                    submitted += 1;
                    state.last_broadcast_btc_height = l2.latest_btc_height;
                    info!(order_id = %order.order_id, %txid, "broadcast withdrawal");
                }
                Err(err) => {
                    failed += 1;
                    warn!(order_id = %order.order_id, %err, "failed to process withdrawal order");
                }
            }
        }

        Ok(TickOutcome::Processed { submitted, failed })
    }

    /// Discards orders left over from a previous run.
    ///
    /// Unfinished signing cycles do not survive a restart, so any
    /// `Created`/`Aggregating` rows found at startup are stale. Skipped
    /// while the Bitcoin view is still syncing; the handoff reconciliation
    /// in [`tick`](Self::tick) covers the rest. Returns the number of
    /// orders removed.
    pub async fn startup_cleanup(&self) -> Result<u64, BroadcastTickError> {
        if self.status.l1_status().syncing {
            debug!("bitcoin view still syncing, skipping startup cleanup");
            return Ok(0);
        }

        let removed = self.store.discard_in_progress().await?;
        if removed > 0 {
            info!(%removed, "discarded stale orders from a previous run");
        }
        Ok(removed)
    }

    /// Signs, broadcasts and marks one order.
    async fn process_order(
        &self,
        key: &SecretKey,
        order: &WithdrawalOrderEntry,
        tx: &mut Transaction,
        btc_height: u64,
    ) -> Result<Txid, OrderError> {
        let mut utxos = self.store.utxos_for_order(order.order_id).await?;

        // Older orders predate utxo binding; fall back to the first input's
        // previous outpoint.
        if utxos.is_empty() {
            if let Some(first) = tx.input.first() {
                if let Some(utxo) = self.store.utxo_by_outpoint(first.previous_output).await? {
                    utxos.push(utxo);
                }
            }
        }

        sign_withdrawal_tx(key, tx, &utxos)?;
        let txid = self.client.send_raw_transaction(tx).await?;
        self.store
            .mark_order_pending(order.order_id, txid, btc_height)
            .await?;
        Ok(txid)
    }
}

/// Runs the broadcaster on its poll interval until shutdown is signalled.
///
/// Before the first tick, orders stranded by a previous run are discarded
/// once. Tick failures are logged and the loop keeps going; the next
/// interval retries from a clean slate.
pub async fn withdrawal_task<S, C, K>(
    broadcaster: Arc<WithdrawalBroadcaster<S, C, K>>,
    mut shutdown_rx: watch::Receiver<bool>,
) where
    S: WithdrawalStore,
    C: BroadcasterRpc,
    K: CustodyService,
{
    if let Err(err) = broadcaster.startup_cleanup().await {
        error!(%err, "startup cleanup failed");
    }

    let mut interval =
        tokio::time::interval(Duration::from_secs(broadcaster.config.poll_interval_secs));

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match broadcaster.tick().await {
                    Ok(outcome) => trace!(?outcome, "withdrawal tick"),
                    Err(err) => error!(%err, "withdrawal tick failed"),
                }
            }
            res = shutdown_rx.changed() => {
                if res.is_err() || *shutdown_rx.borrow() {
                    info!("withdrawal task received shutdown");
                    break;
                }
            }
        }
    }
}
