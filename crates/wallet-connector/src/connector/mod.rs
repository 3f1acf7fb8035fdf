/*
[INPUT]:  Login requests, chain switches and provider events
[OUTPUT]: Connector lifecycle and normalized connector events
[POS]:    Connector layer - public connector surface
[UPDATE]: When adding connector kinds or lifecycle operations
*/

pub mod bridge;
pub mod embedded;
pub mod events;
pub mod resolver;
pub mod strategies;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::Result;
use crate::types::{Chain, ConnectorEvent, LoginRequest};

pub use bridge::EventBridge;
pub use embedded::EmbeddedWalletConnector;
pub use events::EventChannel;
pub use resolver::SignerResolver;

/// Lifecycle shared by every wallet connector
#[async_trait]
pub trait Connectable: Send + Sync {
    /// Authenticate and return the connected address
    async fn connect(&self, request: LoginRequest, chain_id: Option<u64>) -> Result<String>;

    async fn disconnect(&self) -> Result<()>;

    async fn get_address(&self) -> Result<String>;

    async fn is_connected(&self) -> bool;

    async fn switch_chain(&self, chain_id: u64) -> Result<()>;

    fn update_chains(&self, chains: Vec<Chain>);

    fn active_chain(&self) -> Chain;

    fn subscribe(&self) -> broadcast::Receiver<ConnectorEvent>;
}
