pub mod chain;
pub mod config;
pub mod consensus;
pub mod constants;
pub mod error;
pub mod hash;
pub mod ledger;
pub mod nodes;
pub mod pow;
pub mod validate;

use serde::{Deserialize, Serialize};

pub use chain::Chain;
pub use config::LedgerConfig;
pub use consensus::{ChainTransport, ConsensusResolver, PeerChain, Resolution};
pub use error::{LedgerError, NodeAddressError, TransportError, ValidationError};
pub use ledger::{ChainSnapshot, Ledger};
pub use nodes::{Node, NodeRegistry};
pub use pow::ProofOfWork;
pub use validate::ChainValidator;

/// A transfer between two parties. No signature or balance is checked.
///
/// `amount` is an `f64`: integer amounts above 2^53 lose precision when
/// deserialized, and NaN or infinite amounts are refused by the pool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub receiver: String,
    pub amount: f64,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, receiver: impl Into<String>, amount: f64) -> Self {
        Self {
            sender: sender.into(),
            receiver: receiver.into(),
            amount,
        }
    }
}

/// A sealed block. Field names match the `/get_chain` wire format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: String,
    pub proof: i64,
    pub transactions: Vec<Transaction>,
    pub previous_hash: String,
}

impl Block {
    pub fn hash(&self) -> Result<String, LedgerError> {
        hash::hash_block(self)
    }
}
