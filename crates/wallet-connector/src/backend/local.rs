/*
[INPUT]:  EVM private key (hex string) and RPC endpoints
[OUTPUT]: Signer capabilities backed by a locally held key
[POS]:    Backend layer - local-key signer implementation
[UPDATE]: When signer binding or EVM address formatting changes
*/

use std::str::FromStr;
use std::sync::Arc;

use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;

use super::{NetworkProvider, SignerBackend, SignerCapability};
use crate::error::{ConnectorError, Result};
use crate::http::JsonRpcProvider;

/// Signer holding an EVM key in memory, optionally bound to a JSON-RPC endpoint
#[derive(Clone)]
pub struct LocalKeySigner {
    signer: PrivateKeySigner,
    address: String,
    provider: Option<Arc<JsonRpcProvider>>,
}

impl LocalKeySigner {
    /// Create a signer from a hex-encoded private key
    ///
    /// Supports both "0x"-prefixed and non-prefixed hex strings.
    pub fn new(private_key_hex: &str) -> Result<Self> {
        let private_key_hex = private_key_hex.trim();
        let private_key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);
        let signer = PrivateKeySigner::from_str(private_key_hex)
            .map_err(|e| ConnectorError::Config(format!("Invalid EVM private key: {}", e)))?;

        let address = Signer::address(&signer).to_checksum(None);

        Ok(Self {
            signer,
            address,
            provider: None,
        })
    }
}

#[async_trait]
impl SignerCapability for LocalKeySigner {
    async fn address(&self) -> Result<String> {
        Ok(self.address.clone())
    }

    fn connect(&self, rpc_url: &str) -> Result<Arc<dyn SignerCapability>> {
        let provider = JsonRpcProvider::new(rpc_url)?;
        Ok(Arc::new(Self {
            signer: self.signer.clone(),
            address: self.address.clone(),
            provider: Some(Arc::new(provider)),
        }))
    }

    fn provider(&self) -> Option<Arc<dyn NetworkProvider>> {
        self.provider
            .clone()
            .map(|provider| provider as Arc<dyn NetworkProvider>)
    }
}

/// Signer backend serving one local key, or none when no key is configured
#[derive(Clone, Default)]
pub struct LocalKeySignerBackend {
    signer: Option<LocalKeySigner>,
}

impl LocalKeySignerBackend {
    pub fn new(private_key_hex: &str) -> Result<Self> {
        Ok(Self {
            signer: Some(LocalKeySigner::new(private_key_hex)?),
        })
    }

    /// Backend without a key; every fetch yields no signer
    pub fn empty() -> Self {
        Self::default()
    }

    /// Read the key from environment variable `var`.
    ///
    /// A missing variable yields an empty backend; a malformed key is an error.
    pub fn from_env(var: &str) -> Result<Self> {
        match std::env::var(var) {
            Ok(key) if !key.trim().is_empty() => Self::new(&key),
            _ => Ok(Self::empty()),
        }
    }
}

#[async_trait]
impl SignerBackend for LocalKeySignerBackend {
    async fn fetch_signer(&self, _client_id: &str) -> Result<Option<Arc<dyn SignerCapability>>> {
        Ok(self
            .signer
            .clone()
            .map(|signer| Arc::new(signer) as Arc<dyn SignerCapability>))
    }
}
