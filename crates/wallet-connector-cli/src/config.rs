/*
[INPUT]:  YAML configuration file
[OUTPUT]: Parsed and validated CLI configuration
[POS]:    Configuration layer - connector setup
[UPDATE]: When adding new configuration options
*/

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use wallet_connector::{Chain, ConnectorOptions};

const APP_DIR: &str = "wallet-connector";
const CONFIG_FILE: &str = "config.yaml";
const SESSION_FILE: &str = "session.json";

/// Top-level configuration for the wallet connector CLI
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CliConfig {
    /// Client id issued by the embedded wallet service
    pub client_id: String,
    /// Base URL of the embedded wallet auth API
    pub auth_base_url: String,
    /// Chain id signers are bound to
    pub active_chain: u64,
    /// Supported chains
    pub chains: Vec<Chain>,
    #[serde(default)]
    pub signer: SignerConfig,
    /// Session file; defaults to the data directory
    #[serde(default)]
    pub credentials_path: Option<PathBuf>,
}

/// Where the local signing key comes from
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SignerConfig {
    /// Environment variable holding the hex private key
    #[serde(default = "default_private_key_env")]
    pub private_key_env: String,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            private_key_env: default_private_key_env(),
        }
    }
}

fn default_private_key_env() -> String {
    "WALLET_CONNECTOR_PRIVATE_KEY".to_string()
}

/// `<data_dir>/wallet-connector`
pub fn app_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().ok_or_else(|| anyhow!("failed to resolve data dir"))?;
    Ok(data_dir.join(APP_DIR))
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(app_data_dir()?.join(CONFIG_FILE))
}

impl CliConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content).context("failed to parse config YAML")?;
        config.validate()?;
        Ok(config)
    }

    /// Write configuration as YAML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let yaml = serde_yaml::to_string(self).context("failed to serialize config to YAML")?;
        std::fs::write(path, yaml)
            .with_context(|| format!("failed to write config to {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            bail!("client_id cannot be empty");
        }
        if self.auth_base_url.trim().is_empty() {
            bail!("auth_base_url cannot be empty");
        }
        if self.chains.is_empty() {
            bail!("at least one chain must be configured");
        }

        let mut seen = HashSet::new();
        for chain in &self.chains {
            if !seen.insert(chain.id) {
                bail!("duplicate chain id {}", chain.id);
            }
        }
        if !seen.contains(&self.active_chain) {
            bail!("active_chain {} is not in chains", self.active_chain);
        }
        Ok(())
    }

    pub fn chain(&self, chain_id: u64) -> Option<&Chain> {
        self.chains.iter().find(|chain| chain.id == chain_id)
    }

    /// Connector options for the active chain
    pub fn connector_options(&self) -> Result<ConnectorOptions> {
        let active = self
            .chain(self.active_chain)
            .cloned()
            .ok_or_else(|| anyhow!("active_chain {} is not in chains", self.active_chain))?;
        Ok(ConnectorOptions::new(
            self.client_id.clone(),
            active,
            self.chains.clone(),
        ))
    }

    pub fn credentials_path(&self) -> Result<PathBuf> {
        match &self.credentials_path {
            Some(path) => Ok(path.clone()),
            None => Ok(app_data_dir()?.join(SESSION_FILE)),
        }
    }
}
