use async_trait::async_trait;
use bitcoin::{Transaction, Txid};

use super::{types::GetBlockchainInfo, ClientResult};

/// Read-only chain queries against `bitcoind`.
#[async_trait]
pub trait ReaderRpc: Sync + Send + 'static {
    /// Estimates the approximate fee in sat/vB needed for a transaction
    /// to begin confirmation within `conf_target` blocks.
    async fn estimate_smart_fee(&self, conf_target: u16) -> ClientResult<u64>;

    /// Corresponds to `getblockchaininfo`.
    async fn get_blockchain_info(&self) -> ClientResult<GetBlockchainInfo>;
}

/// Transaction submission against `bitcoind`.
#[async_trait]
pub trait BroadcasterRpc: Sync + Send + 'static {
    /// Sends a raw transaction to the network.
    ///
    /// Submitting a transaction that is already in the chain is treated as
    /// success and returns its txid.
    async fn send_raw_transaction(&self, tx: &Transaction) -> ClientResult<Txid>;
}
