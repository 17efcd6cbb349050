use serde::{Deserialize, Serialize};

/// Result of the JSON-RPC method `getblockchaininfo`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GetBlockchainInfo {
    /// Current network name as defined in BIP70 (main, test, signet, regtest).
    pub chain: String,
    /// The current number of blocks processed in the server.
    pub blocks: u64,
    /// The current number of headers we have validated.
    pub headers: u64,
    /// The hash of the currently best block.
    #[serde(rename = "bestblockhash")]
    pub best_block_hash: String,
    /// Estimate of verification progress (between 0 and 1).
    #[serde(rename = "verificationprogress")]
    pub verification_progress: f64,
    /// Estimate of whether this node is in Initial Block Download mode.
    #[serde(rename = "initialblockdownload")]
    pub initial_block_download: bool,
}

impl GetBlockchainInfo {
    /// Whether the node has caught up with the header chain it knows about.
    pub fn is_synced(&self) -> bool {
        !self.initial_block_download && self.blocks >= self.headers
    }
}

/// Result of the JSON-RPC method `estimatesmartfee`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EstimateSmartFee {
    /// Estimated fee rate in BTC/kvB, absent when no estimate is available.
    pub feerate: Option<f64>,
    /// Errors encountered during processing.
    pub errors: Option<Vec<String>>,
    /// Block number where the estimate was found.
    pub blocks: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blockchain_info_parses_bitcoind_field_names() {
        let raw = r#"{
            "chain": "signet",
            "blocks": 120,
            "headers": 130,
            "bestblockhash": "00000000e3f1a1b7f7b9735f149e9b53b5b2f89f4f1b77dbf7e5e13f0f0c0a9d",
            "verificationprogress": 0.92,
            "initialblockdownload": true
        }"#;

        let info: GetBlockchainInfo = serde_json::from_str(raw).unwrap();
        assert_eq!(info.blocks, 120);
        assert!(info.initial_block_download);
        assert!(!info.is_synced());
    }

    #[test]
    fn smart_fee_without_estimate() {
        let raw = r#"{"errors": ["Insufficient data"], "blocks": 0}"#;
        let fee: EstimateSmartFee = serde_json::from_str(raw).unwrap();
        assert!(fee.feerate.is_none());
    }
}
