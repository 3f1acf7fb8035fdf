/*
[INPUT]:  Public API exports for wallet-connector-cli crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod config;
pub mod setup;

// Re-export main types for convenience
pub use config::CliConfig;
pub use setup::build_connector;
