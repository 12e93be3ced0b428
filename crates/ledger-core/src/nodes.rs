use crate::error::NodeAddressError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A peer identified only by its canonical `host:port`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Node(String);

impl Node {
    /// Accepts `host:port`, `scheme://host:port` and `scheme://host:port/path`.
    /// IPv6 hosts must be bracketed, e.g. `[::1]:5001`.
    pub fn parse(address: &str) -> Result<Self, NodeAddressError> {
        let trimmed = address.trim();
        if trimmed.is_empty() {
            return Err(NodeAddressError::Empty);
        }
        let without_scheme = trimmed
            .split_once("://")
            .map_or(trimmed, |(_, rest)| rest);
        let authority = without_scheme
            .split(['/', '?', '#'])
            .next()
            .unwrap_or_default();
        let authority = authority
            .rsplit_once('@')
            .map_or(authority, |(_, host)| host);

        let (host, port) = split_host_port(authority)
            .ok_or_else(|| NodeAddressError::MissingPort(address.to_string()))?;
        if host.is_empty() || host == "[]" {
            return Err(NodeAddressError::MissingHost(address.to_string()));
        }
        let port: u16 = port
            .parse()
            .map_err(|_| NodeAddressError::InvalidPort(address.to_string()))?;
        if port == 0 {
            return Err(NodeAddressError::InvalidPort(address.to_string()));
        }
        Ok(Self(format!("{}:{}", host.to_ascii_lowercase(), port)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn split_host_port(authority: &str) -> Option<(&str, &str)> {
    if authority.starts_with('[') {
        let close = authority.find(']')?;
        let port = authority[close + 1..].strip_prefix(':')?;
        return Some((&authority[..=close], port));
    }
    let (host, port) = authority.rsplit_once(':')?;
    if host.contains(':') {
        return None;
    }
    Some((host, port))
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deduplicated set of known peers.
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    nodes: BTreeSet<Node>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and insert. Re-adding a known peer succeeds without change.
    pub fn add(&mut self, address: &str) -> Result<Node, NodeAddressError> {
        let node = Node::parse(address)?;
        self.nodes.insert(node.clone());
        Ok(node)
    }

    /// Known peers in a stable (sorted) order.
    pub fn list(&self) -> Vec<Node> {
        self.nodes.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
