use std::path::PathBuf;

use bitcoin::Network;
use serde::{Deserialize, Serialize};

use crate::withdrawal::WithdrawalConfig;

/// Default value for `datadir` in [`ClientConfig`].
const DEFAULT_DATADIR: &str = "garnet-data";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// The data directory where runtime state resides.
    #[serde(default = "default_datadir")]
    pub datadir: PathBuf,
}

fn default_datadir() -> PathBuf {
    DEFAULT_DATADIR.into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BitcoindConfig {
    pub rpc_url: String,
    pub rpc_user: String,
    pub rpc_password: String,
    pub network: Network,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_count: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_interval: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub client: ClientConfig,
    pub bitcoind: BitcoindConfig,
    pub withdrawal: WithdrawalConfig,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_config_load() {
        let config_string = r#"
            [bitcoind]
            rpc_url = "http://localhost:18332"
            rpc_user = "garnet"
            rpc_password = "garnet"
            network = "regtest"

            [client]
            datadir = "/path/to/data/directory"

            [withdrawal]
            fee_ceiling = 400
            cooldown_blocks = 2
            poll_interval_secs = 10
            key_path = "/path/to/withdrawal_key"
            relayer_id = "relayer-0"
        "#;

        let config = toml::from_str::<Config>(config_string);
        assert!(
            config.is_ok(),
            "should be able to load TOML config but got: {:?}",
            config.err()
        );

        // Defaults apply when the tuning knobs are left out.
        let config_string_minimal = r#"
            [bitcoind]
            rpc_url = "http://localhost:18332"
            rpc_user = "garnet"
            rpc_password = "garnet"
            network = "signet"

            [client]

            [withdrawal]
            relayer_id = "relayer-0"
        "#;

        let config = toml::from_str::<Config>(config_string_minimal)
            .expect("minimal config should parse");
        assert_eq!(config.withdrawal.fee_ceiling, 500);
        assert_eq!(config.withdrawal.cooldown_blocks, 1);
        assert_eq!(config.withdrawal.poll_interval_secs, 10);
        assert!(config.withdrawal.key_path.is_none());
    }
}
