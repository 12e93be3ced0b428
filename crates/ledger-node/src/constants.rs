pub(crate) const DEFAULT_LISTEN: &str = "127.0.0.1:5000";
pub(crate) const DEFAULT_PEER_TIMEOUT_SECS: u64 = 5;
pub(crate) const CHAIN_PATH: &str = "/get_chain";
