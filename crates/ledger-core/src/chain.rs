use crate::constants::{GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
use crate::error::LedgerError;
use crate::{Block, Transaction};

/// Blocks from genesis to tip plus the pool of transactions waiting for the
/// next block. Never empty.
///
/// `Chain` itself is not synchronised; [`crate::Ledger`] keeps it behind a
/// single mutex so that pool and blocks change together.
#[derive(Debug, Clone)]
pub struct Chain {
    blocks: Vec<Block>,
    pending: Vec<Transaction>,
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

impl Chain {
    /// A chain holding only the genesis block.
    pub fn new() -> Self {
        Self {
            blocks: vec![genesis_block()],
            pending: Vec::new(),
        }
    }

    /// Seal the pending pool into a new block at the tip and empty the pool.
    pub fn create_block(&mut self, proof: i64, previous_hash: String) -> Block {
        let block = Block {
            index: self.blocks.len() as u64 + 1,
            timestamp: now_timestamp(),
            proof,
            transactions: std::mem::take(&mut self.pending),
            previous_hash,
        };
        self.blocks.push(block.clone());
        block
    }

    pub fn latest_block(&self) -> &Block {
        // Every constructor and `replace_blocks` keep at least one block.
        &self.blocks[self.blocks.len() - 1]
    }

    /// Queue a transaction and return the index of the block expected to
    /// carry it. The prediction goes stale if the chain moves first.
    /// NaN and infinite amounts are refused.
    pub fn add_transaction(
        &mut self,
        sender: impl Into<String>,
        receiver: impl Into<String>,
        amount: f64,
    ) -> Result<u64, LedgerError> {
        if !amount.is_finite() {
            return Err(LedgerError::InvalidAmount(amount));
        }
        self.pending.push(Transaction::new(sender, receiver, amount));
        Ok(self.latest_block().index + 1)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Swap in a different block sequence, keeping the pending pool.
    /// An empty replacement is refused and reported as `false`.
    pub fn replace_blocks(&mut self, blocks: Vec<Block>) -> bool {
        if blocks.is_empty() {
            return false;
        }
        self.blocks = blocks;
        true
    }
}

pub fn genesis_block() -> Block {
    Block {
        index: 1,
        timestamp: now_timestamp(),
        proof: GENESIS_PROOF,
        transactions: Vec::new(),
        previous_hash: GENESIS_PREVIOUS_HASH.to_string(),
    }
}

/// Wall-clock time in UTC, microsecond precision.
pub fn now_timestamp() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%d %H:%M:%S%.6f")
        .to_string()
}
