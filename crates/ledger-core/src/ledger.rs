//! The per-process ledger service.
//!
//! One `Ledger` owns the chain, its pending pool and the peer registry, and is
//! shared by reference (usually behind an `Arc`) with every request handler.
//! Pool and blocks sit behind one mutex, so submitting a transaction and
//! sealing a block are serialised against each other and against the final
//! swap of a consensus replacement. Proof search runs outside that lock.

use crate::chain::Chain;
use crate::config::LedgerConfig;
use crate::consensus::{ChainTransport, ConsensusResolver, Resolution};
use crate::error::{LedgerError, NodeAddressError};
use crate::hash::hash_block;
use crate::nodes::{Node, NodeRegistry};
use crate::pow::ProofOfWork;
use crate::validate::ChainValidator;
use crate::{Block, Transaction};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainSnapshot {
    pub chain: Vec<Block>,
    pub length: usize,
}

#[derive(Debug)]
pub struct Ledger {
    config: LedgerConfig,
    pow: ProofOfWork,
    validator: ChainValidator,
    resolver: ConsensusResolver,
    chain: Mutex<Chain>,
    nodes: RwLock<NodeRegistry>,
}

impl Ledger {
    pub fn new(config: LedgerConfig) -> Self {
        let pow = ProofOfWork::new(config.difficulty);
        let validator = ChainValidator::new(pow);
        Self {
            config,
            pow,
            validator,
            resolver: ConsensusResolver::new(validator),
            chain: Mutex::new(Chain::new()),
            nodes: RwLock::new(NodeRegistry::new()),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Solve the puzzle against the current tip, then credit the reward and
    /// seal the pool. CPU bound; call from a blocking context.
    ///
    /// If the tip moves while solving, the proof is stale and the search
    /// restarts against the new tip. The reward is only queued once a proof
    /// is about to be sealed, so each mined block carries exactly one.
    pub fn mine(&self) -> Result<Block, LedgerError> {
        loop {
            let (previous_proof, previous_hash) = {
                let chain = self.chain.lock();
                let previous = chain.latest_block();
                (previous.proof, hash_block(previous)?)
            };

            let proof = self.pow.solve_parallel(previous_proof);

            let mut chain = self.chain.lock();
            if hash_block(chain.latest_block())? != previous_hash {
                debug!(proof, "tip moved while solving, retrying");
                continue;
            }
            chain.add_transaction(
                self.config.node_id.clone(),
                self.config.miner.clone(),
                self.config.reward,
            )?;
            let block = chain.create_block(proof, previous_hash);
            info!(
                index = block.index,
                proof = block.proof,
                transactions = block.transactions.len(),
                "mined block"
            );
            return Ok(block);
        }
    }

    pub fn chain(&self) -> ChainSnapshot {
        let chain = self.chain.lock();
        ChainSnapshot {
            chain: chain.blocks().to_vec(),
            length: chain.len(),
        }
    }

    pub fn latest_block(&self) -> Block {
        self.chain.lock().latest_block().clone()
    }

    pub fn pending(&self) -> Vec<Transaction> {
        self.chain.lock().pending().to_vec()
    }

    pub fn is_valid(&self) -> bool {
        let blocks = self.chain.lock().blocks().to_vec();
        self.validator.is_valid(&blocks)
    }

    pub fn submit_transaction(
        &self,
        sender: impl Into<String>,
        receiver: impl Into<String>,
        amount: f64,
    ) -> Result<u64, LedgerError> {
        self.chain.lock().add_transaction(sender, receiver, amount)
    }

    pub fn connect_node(&self, address: &str) -> Result<Node, NodeAddressError> {
        self.nodes.write().add(address)
    }

    /// Register each address; failures are reported per address and do not
    /// stop the rest from being added.
    pub fn connect_nodes<'a, I>(
        &self,
        addresses: I,
    ) -> Vec<(String, Result<Node, NodeAddressError>)>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut nodes = self.nodes.write();
        addresses
            .into_iter()
            .map(|address| (address.to_string(), nodes.add(address)))
            .collect()
    }

    pub fn nodes(&self) -> Vec<Node> {
        self.nodes.read().list()
    }

    pub async fn resolve_consensus<T: ChainTransport>(&self, transport: &T) -> Resolution {
        let peers = self.nodes();
        self.resolver.resolve(&self.chain, &peers, transport).await
    }
}
