use crate::constants::CHAIN_PATH;
use ledger_core::{ChainTransport, Node, PeerChain, TransportError};
use reqwest::Client;
use std::time::Duration;

/// Fetches peer chains over plain HTTP from `http://{node}/get_chain`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl ChainTransport for HttpTransport {
    async fn fetch_chain(&self, node: &Node) -> Result<PeerChain, TransportError> {
        let url = format!("http://{node}{CHAIN_PATH}");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| TransportError::Unreachable {
                node: node.to_string(),
                reason: err.to_string(),
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                node: node.to_string(),
                status: status.as_u16(),
            });
        }
        response
            .json::<PeerChain>()
            .await
            .map_err(|err| TransportError::Malformed {
                node: node.to_string(),
                reason: err.to_string(),
            })
    }
}
