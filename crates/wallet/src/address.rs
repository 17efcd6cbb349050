//! Script classification and address derivation.
//!
//! Withdrawal destinations and custody scripts are compared through their
//! encoded address strings, never through raw script bytes, so the same
//! logic works across networks.

use bitcoin::{
    hashes::Hash, Address, CompressedPublicKey, Network, PubkeyHash, PublicKey, Script,
    WPubkeyHash, WScriptHash,
};

use crate::errors::AddressError;

/// The recognized standard locking-script forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptClass {
    P2pkh(PubkeyHash),
    P2wpkh(WPubkeyHash),
    P2wsh(WScriptHash),
    /// Anything that does not match one of the templates above.
    Unrecognized,
}

/// Classifies a locking script by its exact byte template.
///
/// The three templates have pairwise distinct lengths (25, 22, 34), so the
/// discriminators cannot overlap.
pub fn classify(script: &Script) -> ScriptClass {
    let b = script.as_bytes();
    match b.len() {
        // OP_DUP OP_HASH160 <20> OP_EQUALVERIFY OP_CHECKSIG
        25 if b[0] == 0x76 && b[1] == 0xa9 && b[2] == 0x14 && b[23] == 0x88 && b[24] == 0xac => {
            let Ok(hash) = <[u8; 20]>::try_from(&b[3..23]) else {
                return ScriptClass::Unrecognized;
            };
            ScriptClass::P2pkh(PubkeyHash::from_byte_array(hash))
        }
        // OP_0 <20>
        22 if b[0] == 0x00 && b[1] == 0x14 => {
            let Ok(hash) = <[u8; 20]>::try_from(&b[2..]) else {
                return ScriptClass::Unrecognized;
            };
            ScriptClass::P2wpkh(WPubkeyHash::from_byte_array(hash))
        }
        // OP_0 <32>
        34 if b[0] == 0x00 && b[1] == 0x20 => {
            let Ok(hash) = <[u8; 32]>::try_from(&b[2..]) else {
                return ScriptClass::Unrecognized;
            };
            ScriptClass::P2wsh(WScriptHash::from_byte_array(hash))
        }
        _ => ScriptClass::Unrecognized,
    }
}

/// Whether `script` pays to `address` when interpreted under `network`.
///
/// Comparison happens on the encoded address string.
pub fn matches_address(script: &Script, address: &str, network: Network) -> bool {
    if classify(script) == ScriptClass::Unrecognized {
        return false;
    }
    match Address::from_script(script, network) {
        Ok(derived) => derived.to_string() == address,
        Err(_) => false,
    }
}

/// Derives the P2PKH address for a serialized public key.
pub fn derive_p2pkh(pubkey: &[u8], network: Network) -> Result<Address, AddressError> {
    let pk = PublicKey::from_slice(pubkey).map_err(|_| AddressError::InvalidPubkey)?;
    Ok(Address::p2pkh(pk, network))
}

/// Derives the P2WPKH address for a serialized public key. The key must be
/// in compressed form.
pub fn derive_p2wpkh(pubkey: &[u8], network: Network) -> Result<Address, AddressError> {
    let pk = CompressedPublicKey::from_slice(pubkey).map_err(|_| AddressError::InvalidPubkey)?;
    Ok(Address::p2wpkh(&pk, network))
}

#[cfg(test)]
mod tests {
    use bitcoin::ScriptBuf;

    use super::*;

    // Generator point, as good a key as any.
    const PUBKEY_HEX: &str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

    fn pubkey_bytes() -> Vec<u8> {
        hex::decode(PUBKEY_HEX).unwrap()
    }

    #[test]
    fn classify_recognizes_standard_templates() {
        let pkh = PubkeyHash::from_byte_array([0xab; 20]);
        let wpkh = WPubkeyHash::from_byte_array([0xcd; 20]);
        let wsh = WScriptHash::from_byte_array([0xef; 32]);

        assert_eq!(
            classify(&ScriptBuf::new_p2pkh(&pkh)),
            ScriptClass::P2pkh(pkh)
        );
        assert_eq!(
            classify(&ScriptBuf::new_p2wpkh(&wpkh)),
            ScriptClass::P2wpkh(wpkh)
        );
        assert_eq!(
            classify(&ScriptBuf::new_p2wsh(&wsh)),
            ScriptClass::P2wsh(wsh)
        );
    }

    #[test]
    fn classify_rejects_near_misses() {
        // OP_RETURN data push.
        let op_return = ScriptBuf::from_bytes(vec![0x6a, 0x14, 0x00]);
        assert_eq!(classify(&op_return), ScriptClass::Unrecognized);

        // Right length, wrong opcodes.
        let mut bad_p2pkh = ScriptBuf::new_p2pkh(&PubkeyHash::from_byte_array([1; 20])).to_bytes();
        bad_p2pkh[24] = 0xab;
        assert_eq!(
            classify(&ScriptBuf::from_bytes(bad_p2pkh)),
            ScriptClass::Unrecognized
        );

        // Witness program with an unknown length.
        let weird = ScriptBuf::from_bytes(vec![0x00, 0x15]);
        assert_eq!(classify(&weird), ScriptClass::Unrecognized);

        assert_eq!(classify(Script::new()), ScriptClass::Unrecognized);
    }

    #[test]
    fn derived_p2wpkh_matches_its_own_script() {
        let addr = derive_p2wpkh(&pubkey_bytes(), Network::Regtest).unwrap();
        let script = addr.script_pubkey();

        assert!(matches!(classify(&script), ScriptClass::P2wpkh(_)));
        assert!(matches_address(&script, &addr.to_string(), Network::Regtest));
        // Same script read under another network encodes differently.
        assert!(!matches_address(&script, &addr.to_string(), Network::Bitcoin));
    }

    #[test]
    fn derived_p2pkh_matches_its_own_script() {
        let addr = derive_p2pkh(&pubkey_bytes(), Network::Regtest).unwrap();
        let script = addr.script_pubkey();

        assert!(matches!(classify(&script), ScriptClass::P2pkh(_)));
        assert!(matches_address(&script, &addr.to_string(), Network::Regtest));
    }

    #[test]
    fn derive_rejects_garbage_keys() {
        assert!(matches!(
            derive_p2wpkh(&[0u8; 33], Network::Regtest),
            Err(AddressError::InvalidPubkey)
        ));
        assert!(matches!(
            derive_p2pkh(&[], Network::Regtest),
            Err(AddressError::InvalidPubkey)
        ));
    }
}
