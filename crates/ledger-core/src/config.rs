use crate::constants::{MINING_REWARD, POW_DIFFICULTY};

/// Settings a [`crate::Ledger`] is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerConfig {
    /// Leading `'0'` hex digits a proof digest must carry.
    pub difficulty: usize,
    /// Amount credited by the reward transaction of every mined block.
    pub reward: f64,
    /// Self-identifier of this node; the sender of its reward transactions.
    pub node_id: String,
    /// Receiver of the reward transactions.
    pub miner: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        let node_id = random_node_id();
        Self {
            difficulty: POW_DIFFICULTY,
            reward: MINING_REWARD,
            miner: node_id.clone(),
            node_id,
        }
    }
}

impl LedgerConfig {
    pub fn with_difficulty(mut self, difficulty: usize) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_miner(mut self, miner: impl Into<String>) -> Self {
        self.miner = miner.into();
        self
    }
}

/// 128 random bits as 32 lowercase hex characters.
pub fn random_node_id() -> String {
    hex::encode(rand::random::<[u8; 16]>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = LedgerConfig::default();
        assert_eq!(config.difficulty, 4);
        assert_eq!(config.reward, 1.6);
        assert_eq!(config.node_id.len(), 32);
        assert_eq!(config.miner, config.node_id);
    }

    #[test]
    fn node_ids_differ() {
        assert_ne!(random_node_id(), random_node_id());
    }

    #[test]
    fn builders_override_fields() {
        let config = LedgerConfig::default().with_difficulty(2).with_miner("GuyG");
        assert_eq!(config.difficulty, 2);
        assert_eq!(config.miner, "GuyG");
    }
}
