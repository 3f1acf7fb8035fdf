/*
[INPUT]:  HTTP client configuration and service endpoints
[OUTPUT]: REST auth backend and JSON-RPC provider
[POS]:    HTTP layer - concrete network collaborators
[UPDATE]: When adding endpoints or changing client behavior
*/

pub mod client;
pub mod rpc;

pub use client::{ClientConfig, HttpAuthBackend};
pub use rpc::JsonRpcProvider;
