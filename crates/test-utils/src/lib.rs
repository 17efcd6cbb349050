//! Deterministic fixtures shared by tests across the workspace.

use bitcoin::{
    absolute,
    hashes::Hash,
    secp256k1::{PublicKey, Secp256k1, SecretKey},
    transaction::Version,
    Address, Amount, CompressedPublicKey, Network, OutPoint, ScriptBuf, Sequence, Transaction,
    TxIn, TxOut, Txid, Witness,
};
use garnet_db::types::{UtxoEntry, WithdrawalOrderEntry};
use garnet_primitives::{EpochVoter, L1Status, L2Status, RelayerId};
use garnet_status::StatusChannel;

/// Deterministic keypair derived from a non-zero seed byte.
pub fn test_keypair(seed: u8) -> (SecretKey, PublicKey) {
    assert_ne!(seed, 0, "seed must be a valid scalar");
    let secp = Secp256k1::new();
    let sk = SecretKey::from_slice(&[seed; 32]).expect("constant seed is a valid scalar");
    let pk = sk.public_key(&secp);
    (sk, pk)
}

/// Deterministic txid derived from a seed byte.
pub fn test_txid(seed: u8) -> Txid {
    Txid::from_byte_array([seed; 32])
}

/// A utxo locking to `pk` through P2WPKH, parked at a seed-derived outpoint.
pub fn p2wpkh_utxo(pk: &PublicKey, amount: Amount, seed: u8) -> UtxoEntry {
    let compressed = CompressedPublicKey(*pk);
    let script = ScriptBuf::new_p2wpkh(&compressed.wpubkey_hash());
    UtxoEntry::new(OutPoint::new(test_txid(seed), 0), amount, script)
}

/// A utxo locking to `pk` through P2PKH, parked at a seed-derived outpoint.
pub fn p2pkh_utxo(pk: &PublicKey, amount: Amount, seed: u8) -> UtxoEntry {
    let legacy = bitcoin::PublicKey::new(*pk);
    let script = ScriptBuf::new_p2pkh(&legacy.pubkey_hash());
    UtxoEntry::new(OutPoint::new(test_txid(seed), 0), amount, script)
}

/// An unsigned transaction spending all of `utxos` into a single P2WPKH
/// output controlled by an unrelated key.
pub fn spend_all_tx(utxos: &[UtxoEntry], send: Amount) -> Transaction {
    let (_, dest_pk) = test_keypair(0xee);
    let dest = Address::p2wpkh(&CompressedPublicKey(dest_pk), Network::Regtest);

    Transaction {
        version: Version::TWO,
        lock_time: absolute::LockTime::ZERO,
        input: utxos
            .iter()
            .map(|u| TxIn {
                previous_output: u.outpoint,
                script_sig: ScriptBuf::new(),
                sequence: Sequence::ENABLE_RBF_NO_LOCKTIME,
                witness: Witness::new(),
            })
            .collect(),
        output: vec![TxOut {
            value: send,
            script_pubkey: dest.script_pubkey(),
        }],
    }
}

/// A `ReadyToSign` order wrapping an unsigned transaction.
pub fn ready_order(order_id: u64, tx: &Transaction) -> WithdrawalOrderEntry {
    WithdrawalOrderEntry::new_ready(order_id, tx)
}

/// A status channel describing a fully synced chain view with `proposer`
/// elected at `epoch_height`.
pub fn synced_status(
    proposer: &str,
    epoch_height: u64,
    l2_height: u64,
    latest_btc_height: u64,
    network_fee: u64,
) -> StatusChannel {
    StatusChannel::new(
        L1Status {
            syncing: false,
            network_fee,
            latest_height: latest_btc_height,
        },
        L2Status {
            syncing: false,
            height: l2_height,
            latest_btc_height,
        },
        EpochVoter {
            epoch: 1,
            proposer: RelayerId::new(proposer),
            height: epoch_height,
        },
    )
}
