//! Module for store-local types.

use bitcoin::{consensus::serialize, Amount, OutPoint, ScriptBuf, Transaction, Txid};
use serde::{Deserialize, Serialize};

/// Lifecycle of a withdrawal order.
///
/// Orders are created by the external construction pipeline and advance
/// through `Created`/`Aggregating` while signature material is prepared
/// (possibly by a cooperative-signing process). The broadcast engine only
/// consumes `ReadyToSign` orders and moves them to `Pending`; an external
/// confirmation watcher later moves `Pending` to `Confirmed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// The order exists but signature aggregation has not started.
    Created,

    /// Signature material is being collected.
    Aggregating,

    /// The unsigned transaction is complete and waiting to be signed and
    /// broadcast.
    ReadyToSign,

    /// The signed transaction has been broadcast and awaits confirmation.
    Pending,

    /// The transaction is confirmed on L1.
    Confirmed,

    /// The order was abandoned.
    Failed,
}

impl OrderStatus {
    /// Orders in these states belong to an unfinished signing cycle and are
    /// discarded, not resumed, on leadership handoff.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::Created | Self::Aggregating)
    }
}

/// A withdrawal order as tracked by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalOrderEntry {
    pub order_id: u64,

    /// Consensus-serialized unsigned transaction, without witness data.
    pub unsigned_tx: Vec<u8>,

    pub status: OrderStatus,

    /// Txid recorded when the order was broadcast.
    pub txid: Option<Txid>,

    /// The L2-observed Bitcoin height at which the broadcast happened.
    pub broadcast_height: Option<u64>,
}

impl WithdrawalOrderEntry {
    pub fn new(order_id: u64, unsigned_tx: Vec<u8>, status: OrderStatus) -> Self {
        Self {
            order_id,
            unsigned_tx,
            status,
            txid: None,
            broadcast_height: None,
        }
    }

    /// Entry for a fully constructed transaction waiting on sign/broadcast.
    pub fn new_ready(order_id: u64, tx: &Transaction) -> Self {
        Self::new(order_id, serialize(tx), OrderStatus::ReadyToSign)
    }
}

/// A spendable output known to the relayer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtxoEntry {
    pub outpoint: OutPoint,

    pub amount: Amount,

    /// The locking script of the output.
    pub script_pubkey: ScriptBuf,

    /// Order this utxo is reserved for, if any. At most one order may hold
    /// a given outpoint; the binding is never reassigned once the holding
    /// order reaches `Pending`.
    pub order_id: Option<u64>,
}

impl UtxoEntry {
    pub fn new(outpoint: OutPoint, amount: Amount, script_pubkey: ScriptBuf) -> Self {
        Self {
            outpoint,
            amount,
            script_pubkey,
            order_id: None,
        }
    }
}
