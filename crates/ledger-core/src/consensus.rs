//! Longest-valid-chain resolution across peers.

use crate::chain::Chain;
use crate::error::TransportError;
use crate::nodes::Node;
use crate::validate::ChainValidator;
use crate::Block;
use futures_util::future::join_all;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{debug, info, warn};

/// A peer's answer to `/get_chain`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerChain {
    pub chain: Vec<Block>,
    pub length: usize,
}

impl PeerChain {
    /// Reject an answer whose reported `length` disagrees with its blocks.
    pub fn into_checked(self, node: &Node) -> Result<Self, TransportError> {
        if self.length != self.chain.len() {
            return Err(TransportError::LengthMismatch {
                node: node.to_string(),
                reported: self.length,
                actual: self.chain.len(),
            });
        }
        Ok(self)
    }
}

/// How the resolver reaches peers. Implementations bound each call with
/// their own timeout.
pub trait ChainTransport: Send + Sync {
    fn fetch_chain(
        &self,
        node: &Node,
    ) -> impl Future<Output = Result<PeerChain, TransportError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub replaced: bool,
    pub chain: Vec<Block>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConsensusResolver {
    validator: ChainValidator,
}

impl ConsensusResolver {
    pub fn new(validator: ChainValidator) -> Self {
        Self { validator }
    }

    /// Fetch every peer's chain, keep the longest valid one that is strictly
    /// longer than `local`, and swap it in under the chain lock.
    ///
    /// Peers that fail, lie about their length or fail validation are
    /// skipped. Equal-length candidates never win.
    pub async fn resolve<T: ChainTransport>(
        &self,
        local: &Mutex<Chain>,
        peers: &[Node],
        transport: &T,
    ) -> Resolution {
        let local_length = local.lock().len();

        let fetches = peers
            .iter()
            .map(|node| async move { (node, transport.fetch_chain(node).await) });
        let responses = join_all(fetches).await;

        let mut best: Option<Vec<Block>> = None;
        let mut max_length = local_length;
        for (node, response) in responses {
            let peer = match response.and_then(|peer| peer.into_checked(node)) {
                Ok(peer) => peer,
                Err(err) => {
                    warn!(%node, error = %err, "skipping peer");
                    continue;
                }
            };
            if peer.length <= max_length {
                debug!(%node, length = peer.length, max_length, "peer chain not longer");
                continue;
            }
            if let Err(err) = self.validator.validate(&peer.chain) {
                warn!(%node, error = %err, "rejecting invalid peer chain");
                continue;
            }
            max_length = peer.length;
            best = Some(peer.chain);
        }

        let mut chain = local.lock();
        let replaced = match best {
            Some(candidate) if candidate.len() > chain.len() => {
                info!(
                    from = chain.len(),
                    to = candidate.len(),
                    "replacing local chain with longer peer chain"
                );
                chain.replace_blocks(candidate)
            }
            Some(_) => {
                debug!("local chain grew past the best candidate during resolution");
                false
            }
            None => false,
        };
        Resolution {
            replaced,
            chain: chain.blocks().to_vec(),
        }
    }
}
