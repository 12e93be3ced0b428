//! Canonical hashing.
//!
//! Values are first lifted into a `serde_json::Value`, whose object map keeps
//! keys sorted, and then written out compactly. Two structurally equal values
//! therefore always produce the same bytes regardless of field declaration
//! order, which is what makes `previous_hash` reproducible by any validator.

use crate::{error::LedgerError, Block};
use serde::Serialize;
use sha2::{Digest, Sha256};

pub fn sha256_hex(bytes: impl AsRef<[u8]>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes.as_ref());
    hex::encode(hasher.finalize())
}

pub fn canonical_json<T: Serialize>(value: &T) -> Result<Vec<u8>, LedgerError> {
    let sorted = serde_json::to_value(value)?;
    Ok(serde_json::to_vec(&sorted)?)
}

pub fn digest<T: Serialize>(value: &T) -> Result<String, LedgerError> {
    Ok(sha256_hex(canonical_json(value)?))
}

/// Digest used as the `previous_hash` of the block that follows `block`.
///
/// JSON has no encoding for NaN or infinity (serde_json writes them all as
/// `null`), so a block carrying one is refused rather than hashed ambiguously.
pub fn hash_block(block: &Block) -> Result<String, LedgerError> {
    if let Some(tx) = block.transactions.iter().find(|tx| !tx.amount.is_finite()) {
        return Err(LedgerError::InvalidAmount(tx.amount));
    }
    digest(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{constants::HASH_HEX_SIZE, Transaction};
    use serde_json::json;

    fn sample_block() -> Block {
        Block {
            index: 2,
            timestamp: "2024-01-01 00:00:00.000000".into(),
            proof: 533,
            transactions: vec![Transaction::new("alice", "bob", 10.0)],
            previous_hash: "ab".repeat(32),
        }
    }

    #[test]
    fn sha256_hex_known_vector() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn canonical_json_sorts_keys() {
        let bytes = canonical_json(&sample_block()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            format!(
                r#"{{"index":2,"previous_hash":"{}","proof":533,"timestamp":"2024-01-01 00:00:00.000000","transactions":[{{"amount":10.0,"receiver":"bob","sender":"alice"}}]}}"#,
                "ab".repeat(32)
            )
        );
    }

    #[test]
    fn digest_ignores_insertion_order() {
        let a = json!({"sender": "a", "receiver": "b", "amount": 1.5});
        let b = json!({"amount": 1.5, "receiver": "b", "sender": "a"});
        assert_eq!(digest(&a).unwrap(), digest(&b).unwrap());
    }

    #[test]
    fn block_hash_is_fixed_length_hex() {
        let hash = hash_block(&sample_block()).unwrap();
        assert_eq!(hash.len(), HASH_HEX_SIZE);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, hash_block(&sample_block()).unwrap());
    }

    #[test]
    fn block_hash_changes_with_any_field() {
        let base = hash_block(&sample_block()).unwrap();

        let mut block = sample_block();
        block.transactions[0].amount = 11.0;
        assert_ne!(hash_block(&block).unwrap(), base);

        let mut block = sample_block();
        block.proof += 1;
        assert_ne!(hash_block(&block).unwrap(), base);

        let mut block = sample_block();
        block.timestamp.push('1');
        assert_ne!(hash_block(&block).unwrap(), base);
    }

    #[test]
    fn non_finite_amounts_are_not_hashed() {
        for amount in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut block = sample_block();
            block.transactions[0].amount = amount;
            assert!(matches!(
                hash_block(&block),
                Err(LedgerError::InvalidAmount(_))
            ));
        }
    }
}
