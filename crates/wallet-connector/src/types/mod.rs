/*
[INPUT]:  Connector configuration, login payloads and provider identifiers
[OUTPUT]: Typed Rust structs/enums with serialization support
[POS]:    Data layer - type definitions shared by connectors
[UPDATE]: When the connector data model changes
*/

pub mod chain;
pub mod event;
pub mod login;
pub mod options;

pub use chain::*;
pub use event::*;
pub use login::*;
pub use options::*;
