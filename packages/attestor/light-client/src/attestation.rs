//! Attested facts and the proof envelope carrying them.
//!
//! Attestors sign one of two fact kinds. The kind is never guessed from the
//! payload: each operation names the kind it expects, and the kind is mixed
//! into the signing digest so a signature for one kind cannot authorize the
//! other.

use alloy_sol_types::SolValue;
use attestor_packet_membership::{abi, PacketAttestation};
use prost::Message;
use serde::{Deserialize, Serialize};

use crate::{error::IbcAttestorClientError, proto};

/// Upper bound on encoded proof size accepted before decoding
pub const MAX_PROOF_SIZE: usize = 64 * 1024;

/// Nanoseconds per second; state attestations carry whole seconds
pub const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Size of `abi.encode(uint64, uint64)`
const STATE_ATTESTATION_SIZE: usize = 2 * abi::ABI_WORD_SIZE;

/// Domain tag prepended to the attested bytes before hashing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AttestationType {
    /// Height and timestamp of the counterparty
    State = 0x01,
    /// Packet commitments at a counterparty height
    Packet = 0x02,
}

impl AttestationType {
    /// Single byte domain separator
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }
}

/// Attested counterparty height and timestamp.
///
/// Encoded as `abi.encode(uint64 height, uint64 timestampSeconds)`; the
/// sub-second part of `timestamp` is not carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateAttestation {
    /// Counterparty height
    pub height: u64,
    /// Unix timestamp in nanoseconds
    pub timestamp: u64,
}

impl StateAttestation {
    /// Create a new state attestation
    #[must_use]
    pub const fn new(height: u64, timestamp: u64) -> Self {
        Self { height, timestamp }
    }

    /// Encode with the timestamp truncated to whole seconds
    #[must_use]
    pub fn to_abi_bytes(&self) -> Vec<u8> {
        (self.height, self.timestamp / NANOS_PER_SECOND).abi_encode()
    }

    /// Decode from `abi.encode(uint64, uint64)`; the timestamp is returned in
    /// nanoseconds.
    ///
    /// # Errors
    /// Fails unless the input is exactly two words holding `uint64` values, or
    /// if the timestamp overflows when converted to nanoseconds.
    pub fn from_abi_bytes(raw: &[u8]) -> Result<Self, IbcAttestorClientError> {
        if raw.len() != STATE_ATTESTATION_SIZE {
            return Err(IbcAttestorClientError::InvalidAttestedData {
                reason: format!(
                    "state attestation must be {STATE_ATTESTATION_SIZE} bytes, got {}",
                    raw.len()
                ),
            });
        }

        let height = abi::read_u64_word(raw, 0).ok_or_else(|| {
            IbcAttestorClientError::InvalidAttestedData {
                reason: "height is not a valid uint64".to_string(),
            }
        })?;
        let seconds = abi::read_u64_word(raw, abi::ABI_WORD_SIZE).ok_or_else(|| {
            IbcAttestorClientError::InvalidAttestedData {
                reason: "timestamp is not a valid uint64".to_string(),
            }
        })?;
        let timestamp = seconds.checked_mul(NANOS_PER_SECOND).ok_or_else(|| {
            IbcAttestorClientError::InvalidAttestedData {
                reason: format!("timestamp {seconds}s overflows nanoseconds"),
            }
        })?;

        Ok(Self { height, timestamp })
    }
}

/// A decoded attested fact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attestation {
    /// See [`StateAttestation`]
    State(StateAttestation),
    /// See [`PacketAttestation`]
    Packet(PacketAttestation),
}

impl Attestation {
    /// Decode `raw` as the fact kind named by `kind`
    ///
    /// # Errors
    /// Returns [`IbcAttestorClientError::InvalidAttestedData`] if `raw` is not a
    /// valid encoding of that kind.
    pub fn decode(kind: AttestationType, raw: &[u8]) -> Result<Self, IbcAttestorClientError> {
        match kind {
            AttestationType::State => StateAttestation::from_abi_bytes(raw).map(Self::State),
            AttestationType::Packet => PacketAttestation::from_abi_bytes(raw)
                .map(Self::Packet)
                .map_err(|e| IbcAttestorClientError::InvalidAttestedData {
                    reason: e.to_string(),
                }),
        }
    }

    /// The kind of this fact
    #[must_use]
    pub const fn kind(&self) -> AttestationType {
        match self {
            Self::State(_) => AttestationType::State,
            Self::Packet(_) => AttestationType::Packet,
        }
    }

    /// Counterparty height the fact refers to
    #[must_use]
    pub const fn height(&self) -> u64 {
        match self {
            Self::State(state) => state.height,
            Self::Packet(packets) => packets.height,
        }
    }

    /// Encode the fact into the bytes attestors sign
    #[must_use]
    pub fn to_abi_bytes(&self) -> Vec<u8> {
        match self {
            Self::State(state) => state.to_abi_bytes(),
            Self::Packet(packets) => packets.to_abi_bytes(),
        }
    }

    /// # Errors
    /// Fails if the fact is not a state attestation
    pub fn into_state(self) -> Result<StateAttestation, IbcAttestorClientError> {
        match self {
            Self::State(state) => Ok(state),
            Self::Packet(_) => Err(IbcAttestorClientError::InvalidAttestedData {
                reason: "expected state attestation, got packet attestation".to_string(),
            }),
        }
    }

    /// # Errors
    /// Fails if the fact is not a packet attestation
    pub fn into_packets(self) -> Result<PacketAttestation, IbcAttestorClientError> {
        match self {
            Self::Packet(packets) => Ok(packets),
            Self::State(_) => Err(IbcAttestorClientError::InvalidAttestedData {
                reason: "expected packet attestation, got state attestation".to_string(),
            }),
        }
    }
}

/// Attested bytes together with the attestor signatures over them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationProof {
    /// ABI encoded fact, see [`Attestation`]
    pub attestation_data: Vec<u8>,
    /// 65-byte `r || s || v` signatures
    pub signatures: Vec<Vec<u8>>,
}

impl AttestationProof {
    /// Create a new proof
    #[must_use]
    pub const fn new(attestation_data: Vec<u8>, signatures: Vec<Vec<u8>>) -> Self {
        Self {
            attestation_data,
            signatures,
        }
    }

    /// Decode a protobuf encoded proof
    ///
    /// # Errors
    /// Returns [`IbcAttestorClientError::InvalidProof`] if the input is larger
    /// than [`MAX_PROOF_SIZE`] or is not a valid protobuf message.
    pub fn decode(bytes: &[u8]) -> Result<Self, IbcAttestorClientError> {
        if bytes.len() > MAX_PROOF_SIZE {
            return Err(IbcAttestorClientError::InvalidProof {
                reason: format!(
                    "proof is {} bytes, exceeds maximum of {MAX_PROOF_SIZE}",
                    bytes.len()
                ),
            });
        }

        let raw = proto::AttestationProof::decode(bytes).map_err(|e| {
            IbcAttestorClientError::InvalidProof {
                reason: e.to_string(),
            }
        })?;

        Ok(raw.into())
    }

    /// Protobuf encoding of the proof
    #[must_use]
    pub fn encode_to_vec(&self) -> Vec<u8> {
        proto::AttestationProof::from(self.clone()).encode_to_vec()
    }
}

impl From<proto::AttestationProof> for AttestationProof {
    fn from(raw: proto::AttestationProof) -> Self {
        Self::new(raw.attestation_data, raw.signatures)
    }
}

impl From<AttestationProof> for proto::AttestationProof {
    fn from(value: AttestationProof) -> Self {
        Self {
            attestation_data: value.attestation_data,
            signatures: value.signatures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attestor_packet_membership::PacketCompact;
    use rstest::rstest;

    #[test]
    fn state_attestation_is_two_words_in_seconds() {
        let state = StateAttestation::new(200, 2_500_000_000);
        let encoded = state.to_abi_bytes();

        assert_eq!(encoded.len(), 64);
        assert_eq!(abi::read_u64_word(&encoded, 0), Some(200));
        assert_eq!(abi::read_u64_word(&encoded, 32), Some(2));

        let decoded = StateAttestation::from_abi_bytes(&encoded).unwrap();
        assert_eq!(decoded, StateAttestation::new(200, 2_000_000_000));
    }

    #[rstest]
    #[case::empty(vec![])]
    #[case::one_word(abi::u64_word(1).to_vec())]
    #[case::three_words([abi::u64_word(1), abi::u64_word(2), abi::u64_word(3)].concat())]
    #[case::dirty_height({
        let mut bz = StateAttestation::new(1, 1_000_000_000).to_abi_bytes();
        bz[0] = 0xff;
        bz
    })]
    #[case::timestamp_overflow([abi::u64_word(1), abi::u64_word(u64::MAX)].concat())]
    fn state_attestation_rejects_malformed(#[case] raw: Vec<u8>) {
        assert!(matches!(
            StateAttestation::from_abi_bytes(&raw),
            Err(IbcAttestorClientError::InvalidAttestedData { .. })
        ));
    }

    #[test]
    fn decode_follows_requested_kind() {
        let packets = PacketAttestation::new(
            7,
            vec![PacketCompact::new([0x01u8; 32], [0x02u8; 32])],
        );
        let packet_bytes = packets.to_abi_bytes();
        let state_bytes = StateAttestation::new(7, 9_000_000_000).to_abi_bytes();

        let decoded = Attestation::decode(AttestationType::Packet, &packet_bytes).unwrap();
        assert_eq!(decoded.kind(), AttestationType::Packet);
        assert_eq!(decoded.height(), 7);
        assert_eq!(decoded.clone().into_packets().unwrap(), packets);
        assert!(decoded.into_state().is_err());

        assert!(Attestation::decode(AttestationType::State, &packet_bytes).is_err());
        assert!(Attestation::decode(AttestationType::Packet, &state_bytes).is_err());

        let decoded = Attestation::decode(AttestationType::State, &state_bytes).unwrap();
        assert_eq!(decoded.to_abi_bytes(), state_bytes);
    }

    #[test]
    fn proof_protobuf_round_trip() {
        let proof = AttestationProof::new(vec![1, 2, 3], vec![vec![4; 65], vec![5; 65]]);
        assert_eq!(AttestationProof::decode(&proof.encode_to_vec()).unwrap(), proof);
    }

    #[rstest]
    #[case::garbage(vec![0xff, 0xff, 0xff])]
    #[case::oversized(vec![0u8; MAX_PROOF_SIZE + 1])]
    fn proof_decode_rejects(#[case] raw: Vec<u8>) {
        assert!(matches!(
            AttestationProof::decode(&raw),
            Err(IbcAttestorClientError::InvalidProof { .. })
        ));
    }

    #[test]
    fn domain_tags_differ() {
        assert_eq!(AttestationType::State.tag(), 0x01);
        assert_eq!(AttestationType::Packet.tag(), 0x02);
    }
}
