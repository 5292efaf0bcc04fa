#![doc = "Packet attestation encoding and membership checks for the attestor light client"]
#![deny(
    clippy::nursery,
    clippy::pedantic,
    warnings,
    missing_docs,
    unused_crate_dependencies
)]

pub mod abi;
mod error;
pub mod packet_commitments;
pub mod verify_packet_membership;

pub use error::PacketAttestationError;
pub use packet_commitments::{hash_path, PacketAttestation, PacketCompact, B32};
