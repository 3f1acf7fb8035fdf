/*
[INPUT]:  Client id, active chain and supported chain set
[OUTPUT]: Validated connector options
[POS]:    Data layer - connector construction parameters
[UPDATE]: When connector configuration grows new fields
*/

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::Chain;
use crate::error::{ConnectorError, Result};

/// Options a connector is constructed with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorOptions {
    pub client_id: String,
    /// Active chain signers are bound to
    pub chain: Chain,
    /// Supported chain set
    pub chains: Vec<Chain>,
}

impl ConnectorOptions {
    pub fn new(client_id: impl Into<String>, chain: Chain, chains: Vec<Chain>) -> Self {
        Self {
            client_id: client_id.into(),
            chain,
            chains,
        }
    }

    pub fn find_chain(&self, chain_id: u64) -> Option<&Chain> {
        self.chains.iter().find(|chain| chain.id == chain_id)
    }

    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(ConnectorError::Config("client_id cannot be empty".to_string()));
        }

        let mut seen = HashSet::new();
        for chain in &self.chains {
            if !seen.insert(chain.id) {
                return Err(ConnectorError::Config(format!(
                    "Duplicate chain id {} in supported chains",
                    chain.id
                )));
            }
        }
        Ok(())
    }
}
