/*
[INPUT]:  Chain definitions and raw chain/account identifiers from providers
[OUTPUT]: Chain records, canonical chain ids and checksummed addresses
[POS]:    Data layer - network identity and normalization
[UPDATE]: When chain metadata or identifier formats change
*/

use std::str::FromStr;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::error::{ConnectorError, Result};

/// A target network identified by numeric id and RPC endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rpc: Vec<String>,
}

impl Chain {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            rpc: Vec::new(),
        }
    }

    /// Append an RPC endpoint
    pub fn with_rpc(mut self, url: impl Into<String>) -> Self {
        self.rpc.push(url.into());
        self
    }

    /// The endpoint signers are bound to (first non-empty RPC URL)
    pub fn rpc_url(&self) -> Option<&str> {
        self.rpc
            .first()
            .map(|url| url.trim())
            .filter(|url| !url.is_empty())
    }
}

/// Chain identifier as delivered by providers: a number or a numeric string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawChainId {
    Number(u64),
    Text(String),
}

impl RawChainId {
    /// Normalize to a canonical integer.
    ///
    /// Accepts decimal strings and `0x`-prefixed hex strings.
    pub fn normalize(&self) -> Result<u64> {
        match self {
            RawChainId::Number(id) => Ok(*id),
            RawChainId::Text(text) => {
                let trimmed = text.trim();
                let parsed = match trimmed
                    .strip_prefix("0x")
                    .or_else(|| trimmed.strip_prefix("0X"))
                {
                    Some(hex) => u64::from_str_radix(hex, 16),
                    None => trimmed.parse::<u64>(),
                };
                parsed.map_err(|_| ConnectorError::InvalidChainId(text.clone()))
            }
        }
    }
}

impl From<u64> for RawChainId {
    fn from(id: u64) -> Self {
        RawChainId::Number(id)
    }
}

impl From<&str> for RawChainId {
    fn from(id: &str) -> Self {
        RawChainId::Text(id.to_string())
    }
}

impl From<String> for RawChainId {
    fn from(id: String) -> Self {
        RawChainId::Text(id)
    }
}

/// Normalize a chain id given as number or string
pub fn normalize_chain_id(raw: impl Into<RawChainId>) -> Result<u64> {
    raw.into().normalize()
}

/// Normalize an account to its EIP-55 checksum form
pub fn normalize_address(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    Address::from_str(trimmed)
        .map(|address| address.to_checksum(None))
        .map_err(|_| ConnectorError::InvalidAddress(trimmed.to_string()))
}
