pub const HASH_SIZE: usize = 32;
pub const HASH_HEX_SIZE: usize = HASH_SIZE * 2;
pub const POW_DIFFICULTY: usize = 4;
pub const PROOF_SEARCH_WINDOW: i64 = 1 << 14;
pub const MINING_REWARD: f64 = 1.6;
pub const GENESIS_PROOF: i64 = 1;
pub const GENESIS_PREVIOUS_HASH: &str = "0";
