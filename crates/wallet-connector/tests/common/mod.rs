/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for wallet-connector tests

use std::sync::Arc;

use wallet_connector::backend::{MockAuthBackend, MockSignerBackend};
use wallet_connector::{
    AuthBackend, Chain, ConnectorOptions, EmbeddedWalletConnector, MemoryCredentialStore,
};
use wiremock::MockServer;

pub const TEST_CLIENT_ID: &str = "test-client";
pub const TEST_EMAIL: &str = "a@b.com";
/// Address of the well-known development key
pub const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Ethereum mainnet plus Polygon, active chain mainnet
pub fn test_options() -> ConnectorOptions {
    let ethereum = Chain::new(1, "ethereum").with_rpc("https://eth.example.org");
    let polygon = Chain::new(137, "polygon").with_rpc("https://polygon.example.org");
    ConnectorOptions::new(TEST_CLIENT_ID, ethereum.clone(), vec![ethereum, polygon])
}

#[allow(dead_code)]
pub struct TestConnector {
    pub connector: Arc<EmbeddedWalletConnector>,
    pub signers: Arc<MockSignerBackend>,
    pub store: Arc<MemoryCredentialStore>,
}

#[allow(dead_code)]
/// Connector over the given auth backend with mock signers and memory storage
pub fn build_connector(auth: Arc<dyn AuthBackend>, store: MemoryCredentialStore) -> TestConnector {
    let signers = Arc::new(MockSignerBackend::new(TEST_ADDRESS));
    let store = Arc::new(store);
    let connector = EmbeddedWalletConnector::new(test_options(), auth, signers.clone(), store.clone())
        .expect("valid test options");
    TestConnector {
        connector: Arc::new(connector),
        signers,
        store,
    }
}

#[allow(dead_code)]
pub fn mock_connector() -> (TestConnector, Arc<MockAuthBackend>) {
    let auth = Arc::new(MockAuthBackend::new(TEST_EMAIL));
    (build_connector(auth.clone(), MemoryCredentialStore::new()), auth)
}
