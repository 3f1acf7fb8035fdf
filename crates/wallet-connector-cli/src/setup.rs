/*
[INPUT]:  Validated CLI configuration and process environment
[OUTPUT]: Embedded wallet connector wired to HTTP auth and a local key
[POS]:    Wiring layer - turns configuration into a live connector
[UPDATE]: When backend selection or storage location changes
*/

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, warn};
use wallet_connector::{
    EmbeddedWalletConnector, FileCredentialStore, HttpAuthBackend, LocalKeySignerBackend,
};

use crate::config::CliConfig;

/// Build a connector from `config`.
///
/// Without a key in the configured environment variable the connector can
/// authenticate but never resolves a signer.
pub fn build_connector(config: &CliConfig) -> Result<EmbeddedWalletConnector> {
    let auth = HttpAuthBackend::new(&config.auth_base_url)
        .with_context(|| format!("invalid auth_base_url {}", config.auth_base_url))?;

    let key_env = &config.signer.private_key_env;
    let signers = LocalKeySignerBackend::from_env(key_env)
        .with_context(|| format!("invalid private key in {key_env}"))?;
    if std::env::var(key_env).is_err() {
        warn!(env = %key_env, "no signing key configured; signer resolution will fail");
    }

    let store_path = config.credentials_path()?;
    debug!(path = %store_path.display(), "using credential store");
    let store = FileCredentialStore::new(store_path);

    EmbeddedWalletConnector::new(
        config.connector_options()?,
        Arc::new(auth),
        Arc::new(signers),
        Arc::new(store),
    )
    .context("failed to create connector")
}
