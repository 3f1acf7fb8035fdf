/*
[INPUT]:  Narrow contracts of external auth/signer services
[OUTPUT]: Backend traits plus local and mock implementations
[POS]:    Backend layer - everything the connector delegates to
[UPDATE]: When adding backend kinds or changing backend contracts
*/

pub mod auth;
pub mod local;
pub mod mock;
pub mod signer;

pub use auth::{AuthBackend, AuthenticatedUser};
pub use local::{LocalKeySigner, LocalKeySignerBackend};
pub use mock::{MockAuthBackend, MockEventSource, MockProvider, MockSigner, MockSignerBackend};
pub use signer::{
    ListenerId, NetworkProvider, ProviderEvent, ProviderEventKind, ProviderEventSource,
    ProviderListener, SignerBackend, SignerCapability,
};
