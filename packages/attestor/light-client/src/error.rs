//! Error types for attestor light client

use alloy_primitives::Address;
use attestor_packet_membership::PacketAttestationError;
use thiserror::Error;

/// Main error type for attestor IBC operations
#[derive(Error, Debug, PartialEq, Eq)]
pub enum IbcAttestorClientError {
    /// A signature could not be parsed or no signer could be recovered from it
    #[error("Signature verification failed: {reason}")]
    InvalidSignature {
        /// Reason for error
        reason: String,
    },

    /// Recovered address is not part of the attestor set
    #[error("Unknown signer recovered from signature: {address}")]
    UnknownSigner {
        /// Recovered address that is not in the trusted set
        address: Address,
    },

    /// The same attestor signed more than once in a single proof
    #[error("Duplicate signer in attestation: {address}")]
    DuplicateSigner {
        /// Address that was recovered twice
        address: Address,
    },

    /// Fewer unique attestors signed than the client requires
    #[error("Insufficient signatures: got {got}, required {required}")]
    InsufficientSignatures {
        /// Number of unique valid signers
        got: usize,
        /// Quorum configured in the client state
        required: u32,
    },

    /// Client state violates a structural invariant
    #[error("Invalid client state: {reason}")]
    InvalidClientState {
        /// Reason for error
        reason: String,
    },

    /// Consensus state violates a structural invariant
    #[error("Invalid consensus state: {reason}")]
    InvalidConsensusState {
        /// Reason for error
        reason: String,
    },

    /// Attestation proof bytes cannot be decoded
    #[error("Proof invalid: {reason}")]
    InvalidProof {
        /// Reason for error
        reason: String,
    },

    /// Cannot attest to data as malformed
    #[error("Invalid attested data: {reason}")]
    InvalidAttestedData {
        /// Reason for error
        reason: String,
    },

    /// Attested height differs from the requested height
    #[error("Height mismatch: expected {expected}, got {got}")]
    HeightMismatch {
        /// Height requested by the caller
        expected: u64,
        /// Height carried by the attestation
        got: u64,
    },

    /// Membership path is not a single non-empty segment
    #[error("Invalid path: {reason}")]
    InvalidPath {
        /// Reason for error
        reason: String,
    },

    /// Membership value is not a 32-byte commitment
    #[error("Invalid value: expected 32 bytes, got {len}")]
    InvalidValue {
        /// Length of the supplied value
        len: usize,
    },

    /// Packet not found in attested data
    #[error("Membership proof failed: {0}")]
    MembershipProofFailed(#[from] PacketAttestationError),

    /// Client is frozen
    #[error("Client is frozen")]
    ClientFrozen,
}
