use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
/// Collection of errors that can occur when
/// decoding a packet attestation or verifying packet membership.
pub enum PacketAttestationError {
    #[error("failed to ABI decode packet attestation: {reason}")]
    /// Packet attestation cannot be decoded from bytes
    InvalidAttestationData {
        /// Reason for the failure
        reason: String,
    },

    #[error("path and value pair is not attested")]
    /// No attested entry matches the queried path (and value)
    NotMember,

    #[error("non-membership failed: a non-zero commitment is attested for the path")]
    /// At least one entry for the queried path carries a non-zero commitment
    NonMembershipFailed,
}
