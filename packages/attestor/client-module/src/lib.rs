#![doc = "Attestor light client module: client store layout and the host facing operations"]
#![deny(
    clippy::nursery,
    clippy::pedantic,
    warnings,
    missing_docs,
    unused_crate_dependencies
)]

pub mod error;
pub mod module;
pub mod store;

pub use error::LightClientModuleError;
pub use module::LightClientModule;
