use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to serialize block: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("transaction amount {0} is not a finite number")]
    InvalidAmount(f64),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeAddressError {
    #[error("node address is empty")]
    Empty,
    #[error("node address `{0}` has no host")]
    MissingHost(String),
    #[error("node address `{0}` has no port")]
    MissingPort(String),
    #[error("node address `{0}` has an invalid port")]
    InvalidPort(String),
}

/// Why a candidate chain was rejected. Indices are positions in the chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("chain is empty")]
    Empty,
    #[error("block at position {0} does not link to its predecessor")]
    BrokenLink(usize),
    #[error("block at position {0} carries an invalid proof")]
    InvalidProof(usize),
    #[error("block at position {0} could not be hashed")]
    Unhashable(usize),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("peer {node} unreachable: {reason}")]
    Unreachable { node: String, reason: String },
    #[error("peer {node} answered with status {status}")]
    Status { node: String, status: u16 },
    #[error("peer {node} sent a malformed chain: {reason}")]
    Malformed { node: String, reason: String },
    #[error("peer {node} reported length {reported} but sent {actual} blocks")]
    LengthMismatch {
        node: String,
        reported: usize,
        actual: usize,
    },
}
