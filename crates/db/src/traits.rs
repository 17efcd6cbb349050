use async_trait::async_trait;
use bitcoin::{OutPoint, Txid};

use crate::{
    types::{OrderStatus, UtxoEntry, WithdrawalOrderEntry},
    DbResult,
};

/// Capability over the withdrawal-order store.
///
/// Implementations must apply each status transition atomically per order so
/// that a partially failed broadcast batch never corrupts order state.
#[async_trait]
pub trait WithdrawalStore: Send + Sync + 'static {
    /// All orders currently in `status`, in order-id order.
    async fn list_orders_by_status(
        &self,
        status: OrderStatus,
    ) -> DbResult<Vec<WithdrawalOrderEntry>>;

    async fn get_order(&self, order_id: u64) -> DbResult<Option<WithdrawalOrderEntry>>;

    /// Inserts or replaces an order entry.
    async fn put_order(&self, entry: WithdrawalOrderEntry) -> DbResult<()>;

    /// The utxos reserved for `order_id`, in the order they were bound
    /// (which is the transaction's input order for orders built by the
    /// construction pipeline).
    async fn utxos_for_order(&self, order_id: u64) -> DbResult<Vec<UtxoEntry>>;

    async fn utxo_by_outpoint(&self, outpoint: OutPoint) -> DbResult<Option<UtxoEntry>>;

    /// Inserts or replaces a utxo entry.
    async fn put_utxo(&self, utxo: UtxoEntry) -> DbResult<()>;

    /// Reserves `outpoint` for `order_id`.
    ///
    /// Fails with [`DbError::UtxoAlreadyBound`](crate::DbError) if the
    /// outpoint is already held by a different order. No utxo may ever be
    /// referenced by two orders concurrently.
    async fn bind_utxo(&self, outpoint: OutPoint, order_id: u64) -> DbResult<()>;

    /// Transitions a `ReadyToSign` order to `Pending`, recording the
    /// broadcast txid and height.
    ///
    /// Fails with [`DbError::InvalidStatusTransition`](crate::DbError) for
    /// any other starting status; this is what makes the at-most-once
    /// `Pending` transition hold even under a buggy caller.
    async fn mark_order_pending(&self, order_id: u64, txid: Txid, height: u64) -> DbResult<()>;

    /// Deletes all `Created`/`Aggregating` orders and releases their utxo
    /// bindings. Returns the number of orders removed.
    ///
    /// Used on leadership handoff: partial signature state is not
    /// guaranteed consistent across a proposer change, so unfinished
    /// orders are discarded rather than resumed.
    async fn discard_in_progress(&self) -> DbResult<u64>;
}
