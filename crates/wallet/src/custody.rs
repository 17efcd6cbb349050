//! Resolution of the withdrawal signing key.
//!
//! Key material is resolved fresh on every request and never cached; the
//! decoded secret lives only for the duration of one signing pass.

use std::{env, fs::read_to_string, path::PathBuf};

use async_trait::async_trait;
use bitcoin::secp256k1::SecretKey;
use tracing::*;
use zeroize::Zeroize;

use crate::errors::CustodyError;

/// The environment variable that may carry the hex-encoded withdrawal key.
pub const WITHDRAWAL_KEY_ENVVAR: &str = "GARNET_WITHDRAWAL_KEY";

/// Capability that turns the configured key identity into key material.
#[async_trait]
pub trait CustodyService: Send + Sync + 'static {
    /// Resolves the withdrawal signing key.
    async fn withdrawal_key(&self) -> Result<SecretKey, CustodyError>;
}

/// Where the key material comes from.
#[derive(Debug, Clone)]
enum KeySource {
    File(PathBuf),
    Env(String),
}

/// [`CustodyService`] backed by a hex-encoded key on disk or in the
/// environment.
#[derive(Debug, Clone)]
pub struct LocalKeyCustody {
    source: KeySource,
}

impl LocalKeyCustody {
    /// Picks the key source from the configured path and the standard
    /// environment variable.
    ///
    /// Rules:
    ///
    /// 1. If neither is set, error out.
    /// 2. If both are set, error out.
    /// 3. Otherwise use whichever one is present.
    pub fn resolve(key_path: Option<PathBuf>) -> Result<Self, CustodyError> {
        let env_set = env::var(WITHDRAWAL_KEY_ENVVAR).is_ok();
        match (key_path, env_set) {
            (None, false) => Err(CustodyError::MissingKey(WITHDRAWAL_KEY_ENVVAR.to_string())),
            (Some(_), true) => Err(CustodyError::ConflictingSources),
            (Some(path), false) => Ok(Self {
                source: KeySource::File(path),
            }),
            (None, true) => {
                warn!("taking withdrawal key from the environment");
                Ok(Self {
                    source: KeySource::Env(WITHDRAWAL_KEY_ENVVAR.to_string()),
                })
            }
        }
    }
}

#[async_trait]
impl CustodyService for LocalKeyCustody {
    async fn withdrawal_key(&self) -> Result<SecretKey, CustodyError> {
        let mut key_str = match &self.source {
            KeySource::File(path) => {
                read_to_string(path).map_err(|e| CustodyError::Unreadable(e.to_string()))?
            }
            KeySource::Env(var) => {
                env::var(var).map_err(|e| CustodyError::Unreadable(e.to_string()))?
            }
        };

        let Ok(mut raw) = hex::decode(key_str.trim()) else {
            key_str.zeroize();
            return Err(CustodyError::InvalidKey);
        };
        key_str.zeroize();

        let key = SecretKey::from_slice(&raw).map_err(|_| CustodyError::InvalidKey);
        raw.zeroize();
        key
    }
}

/// [`CustodyService`] holding a fixed key, for tests.
#[derive(Debug, Clone)]
pub struct InMemoryCustody {
    key: SecretKey,
}

impl InMemoryCustody {
    pub fn new(key: SecretKey) -> Self {
        Self { key }
    }
}

#[async_trait]
impl CustodyService for InMemoryCustody {
    async fn withdrawal_key(&self) -> Result<SecretKey, CustodyError> {
        Ok(self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_without_any_source_fails() {
        // Guard against the envvar leaking in from the outer environment.
        assert!(env::var(WITHDRAWAL_KEY_ENVVAR).is_err());
        assert!(matches!(
            LocalKeyCustody::resolve(None),
            Err(CustodyError::MissingKey(_))
        ));
    }

    #[tokio::test]
    async fn key_file_roundtrip() {
        let dir = std::env::temp_dir().join("garnet-custody-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("withdrawal_key.hex");
        std::fs::write(&path, "0000000000000000000000000000000000000000000000000000000000000001\n")
            .unwrap();

        let custody = LocalKeyCustody::resolve(Some(path.clone())).unwrap();
        let key = custody.withdrawal_key().await.unwrap();
        assert_eq!(key.secret_bytes()[31], 1);

        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn malformed_key_material_is_rejected() {
        let dir = std::env::temp_dir().join("garnet-custody-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad_key.hex");
        std::fs::write(&path, "not hex at all").unwrap();

        let custody = LocalKeyCustody::resolve(Some(path.clone())).unwrap();
        assert!(matches!(
            custody.withdrawal_key().await,
            Err(CustodyError::InvalidKey)
        ));

        std::fs::remove_file(path).unwrap();
    }
}
