use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bitcoin::{hashes::Hash, BlockHash, Transaction, Txid};

use crate::rpc::{
    error::ClientError,
    traits::{BroadcasterRpc, ReaderRpc},
    types::GetBlockchainInfo,
    ClientResult,
};

/// A test implementation of a Bitcoin client.
#[derive(Debug, Clone)]
pub struct TestBitcoinClient {
    /// Reported chain tip height.
    pub height: u64,
    /// Reported fee estimate in sat/vB.
    pub fee: u64,
    /// Whether the node reports itself in initial block download.
    pub initial_block_download: bool,
    /// When set, `send_raw_transaction` fails with this server error.
    pub send_error: Option<(i32, String)>,
    /// Txids of every transaction accepted by `send_raw_transaction`.
    pub sent: Arc<Mutex<Vec<Txid>>>,
}

impl TestBitcoinClient {
    pub fn new(height: u64, fee: u64) -> Self {
        Self {
            height,
            fee,
            initial_block_download: false,
            send_error: None,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Txids broadcast so far, in submission order.
    pub fn sent_txids(&self) -> Vec<Txid> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReaderRpc for TestBitcoinClient {
    async fn estimate_smart_fee(&self, _conf_target: u16) -> ClientResult<u64> {
        Ok(self.fee)
    }

    async fn get_blockchain_info(&self) -> ClientResult<GetBlockchainInfo> {
        Ok(GetBlockchainInfo {
            chain: "regtest".to_string(),
            blocks: self.height,
            headers: self.height,
            best_block_hash: BlockHash::all_zeros().to_string(),
            verification_progress: 1.0,
            initial_block_download: self.initial_block_download,
        })
    }
}

#[async_trait]
impl BroadcasterRpc for TestBitcoinClient {
    async fn send_raw_transaction(&self, tx: &Transaction) -> ClientResult<Txid> {
        if let Some((code, message)) = &self.send_error {
            // Mirrors the real client: a duplicate submission is success.
            if *code == -27 {
                return Ok(tx.compute_txid());
            }
            return Err(ClientError::Server(*code, message.clone()));
        }

        let txid = tx.compute_txid();
        self.sent.lock().unwrap().push(txid);
        Ok(txid)
    }
}
