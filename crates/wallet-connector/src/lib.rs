/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public wallet connector crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod backend;
pub mod connector;
pub mod error;
pub mod http;
pub mod session;
pub mod types;
pub mod walletconnect;

// Re-export commonly used types from backend
pub use backend::{
    AuthBackend,
    AuthenticatedUser,
    LocalKeySigner,
    LocalKeySignerBackend,
    NetworkProvider,
    ProviderEvent,
    SignerBackend,
    SignerCapability,
};

// Re-export the connector surface
pub use connector::{Connectable, EmbeddedWalletConnector, EventChannel};

pub use error::{ConnectorError, Result};

// Re-export commonly used types from http
pub use http::{ClientConfig, HttpAuthBackend, JsonRpcProvider};

// Re-export commonly used types from session
pub use session::{CredentialStore, FileCredentialStore, MemoryCredentialStore};

// Re-export all types
pub use types::*;

// Re-export commonly used types from walletconnect
pub use walletconnect::{WalletConnectClient, WalletConnectConfig, WalletConnectReceiver, WcEvent};
