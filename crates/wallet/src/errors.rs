//! Error types for the wallet crate.

use garnet_db::DbError;
use thiserror::Error;

/// Errors from address derivation.
#[derive(Debug, Error)]
pub enum AddressError {
    /// The provided public key bytes do not parse as a secp256k1 key.
    #[error("invalid public key material")]
    InvalidPubkey,
}

/// Errors from signing a withdrawal transaction.
///
/// All variants are scoped to a single order; the caller skips the order
/// and leaves it untouched for a later retry.
#[derive(Debug, Error)]
pub enum SigningError {
    /// No known utxo matches the input's previous outpoint.
    #[error("input {input}: no known utxo for outpoint")]
    MissingUtxo { input: usize },

    /// The locking script commits to a different key than the signing key.
    #[error("input {input}: locking script does not match the withdrawal key")]
    KeyMismatch { input: usize },

    /// The utxo's locking script is not a form this signer can satisfy.
    #[error("input {input}: unsupported locking script")]
    UnsupportedScript { input: usize },

    /// Sighash computation failed.
    #[error("input {input}: sighash computation failed: {reason}")]
    Sighash { input: usize, reason: String },
}

/// Errors from resolving the withdrawal signing key.
#[derive(Debug, Error)]
pub enum CustodyError {
    /// Neither a key file nor the key environment variable is configured.
    #[error("no withdrawal key configured; set key_path or {0}")]
    MissingKey(String),

    /// Both a key file and the key environment variable are configured.
    #[error("multiple withdrawal key sources configured, aborting")]
    ConflictingSources,

    /// The key material could not be read from its source.
    #[error("could not read key material: {0}")]
    Unreadable(String),

    /// The key material is not a valid hex-encoded secp256k1 secret key.
    #[error("invalid withdrawal key material")]
    InvalidKey,
}

/// Fatal errors from a broadcast tick.
///
/// Anything here aborts the remainder of the tick's batch; per-order
/// failures are handled inside the tick and never surface as this type.
#[derive(Debug, Error)]
pub enum BroadcastTickError {
    /// A stored unsigned transaction failed consensus deserialization.
    /// Store contents are not trustworthy past this point.
    #[error("order {order_id}: malformed stored transaction: {source}")]
    MalformedTx {
        order_id: u64,
        source: bitcoin::consensus::encode::Error,
    },

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Custody(#[from] CustodyError),
}
