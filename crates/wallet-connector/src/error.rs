/*
[INPUT]:  Error sources (auth backend, signer backend, HTTP, config, storage)
[OUTPUT]: Structured connector error kinds
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use std::fmt::Display;

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for wallet connectors
#[derive(Error, Debug)]
pub enum ConnectorError {
    /// Login request carried an unknown `loginType` tag
    #[error("Invalid login type: {0}")]
    InvalidLoginType(String),

    /// OTP verification attempted without a pending email
    #[error("Email is required to connect")]
    EmailRequired,

    /// Signer backend returned no signer
    #[error("Error fetching the signer")]
    SignerFetchFailed,

    /// Signer could not be resolved for the current session
    #[error("Signer unavailable: {0}")]
    SignerUnavailable(String),

    /// Current signer has no bound network provider
    #[error("Provider not found")]
    ProviderUnavailable,

    /// Requested chain is not in the supported set
    #[error("Chain {chain_id} not configured")]
    ChainNotConfigured { chain_id: u64 },

    /// Authentication strategy reported a failure
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Chain identifier could not be normalized
    #[error("Invalid chain id: {0}")]
    InvalidChainId(String),

    /// Account address is not a valid EVM address
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// API returned an error response
    #[error("API error (code {code}): {message}")]
    Api { code: i32, message: String },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Credential storage failed
    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// WalletConnect receiver is not enabled
    #[error("WalletConnect connect-app support is disabled")]
    WalletConnectDisabled,

    /// No session proposal waiting for a decision
    #[error("No pending WalletConnect session proposal")]
    NoPendingProposal,

    /// No session request waiting for a decision
    #[error("No pending WalletConnect request")]
    NoPendingRequest,

    /// Unclassified failure from an external collaborator
    #[error("External failure: {0}")]
    External(String),
}

impl ConnectorError {
    /// Check if error indicates an authentication problem
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            ConnectorError::AuthenticationFailed(_)
                | ConnectorError::EmailRequired
                | ConnectorError::SignerUnavailable(_)
        )
    }

    /// Check if error was caused by caller-supplied configuration
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ConnectorError::InvalidLoginType(_)
                | ConnectorError::ChainNotConfigured { .. }
                | ConnectorError::InvalidChainId(_)
                | ConnectorError::Config(_)
        )
    }

    /// Create an API error from status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        ConnectorError::Api {
            code: status.as_u16() as i32,
            message: message.into(),
        }
    }

    /// Wrap an unknown external failure, keeping its message
    pub fn external(err: impl Display) -> Self {
        ConnectorError::External(err.to_string())
    }
}

/// Result type alias for connector operations
pub type Result<T> = std::result::Result<T, ConnectorError>;
