/*
[INPUT]:  WalletConnect pairing URIs and client callbacks
[OUTPUT]: Receiver handling dapp sessions on behalf of a wallet
[POS]:    WalletConnect layer - connect-app support
[UPDATE]: When adding receiver operations or message types
*/

pub mod receiver;
pub mod types;

pub use receiver::{WalletConnectClient, WalletConnectReceiver};
pub use types::*;
