/*
[INPUT]:  Signer backend, client id and target chain
[OUTPUT]: Chain-bound signer handles
[POS]:    Connector layer - signer resolution (caching lives in Session)
[UPDATE]: When signer binding rules change
*/

use std::sync::Arc;

use tracing::debug;

use crate::backend::{SignerBackend, SignerCapability};
use crate::error::{ConnectorError, Result};
use crate::types::Chain;

/// Fetches base signers and binds them to a chain's RPC endpoint
#[derive(Clone)]
pub struct SignerResolver {
    backend: Arc<dyn SignerBackend>,
    client_id: String,
}

impl SignerResolver {
    pub fn new(backend: Arc<dyn SignerBackend>, client_id: impl Into<String>) -> Self {
        Self {
            backend,
            client_id: client_id.into(),
        }
    }

    /// Fetch a fresh signer for `chain`
    pub async fn resolve(&self, chain: &Chain) -> Result<Arc<dyn SignerCapability>> {
        let signer = self
            .backend
            .fetch_signer(&self.client_id)
            .await?
            .ok_or(ConnectorError::SignerFetchFailed)?;

        match chain.rpc_url() {
            Some(rpc_url) => {
                debug!(chain_id = chain.id, rpc_url, "binding signer to rpc endpoint");
                signer.connect(rpc_url)
            }
            None => Ok(signer),
        }
    }
}
