#![doc = "Attestor light client for IBC"]
#![deny(
    clippy::nursery,
    clippy::pedantic,
    warnings,
    missing_docs,
    unused_crate_dependencies
)]

pub mod attestation;
pub mod client_state;
pub mod consensus_state;
pub mod error;
pub mod membership;
pub mod misbehaviour;
pub mod proto;
pub mod update;
pub mod verify;
pub mod verify_attestation;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
