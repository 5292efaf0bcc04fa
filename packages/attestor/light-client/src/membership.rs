//! Membership proof verification for attestor client

use attestor_packet_membership::{
    hash_path,
    verify_packet_membership::{verify_packet_membership, verify_packet_non_membership},
    PacketAttestation, B32,
};

use crate::{
    attestation::{AttestationProof, AttestationType},
    client_state::ClientState,
    error::IbcAttestorClientError,
    verify_attestation,
};

/// Verify that `value` is attested under `path` at `height`
/// # Errors
/// Returns an error if the client is frozen, the proof does not carry a quorum
/// signed packet attestation for `height`, the path or value are malformed, or
/// no attested entry matches.
pub fn verify_membership(
    client_state: &ClientState,
    height: u64,
    proof: &AttestationProof,
    path: &[Vec<u8>],
    value: &[u8],
) -> Result<(), IbcAttestorClientError> {
    let packets = verified_packets(client_state, height, proof)?;
    let path_hash = path_hash(path)?;
    let commitment = B32::try_from(value)
        .map_err(|_| IbcAttestorClientError::InvalidValue { len: value.len() })?;

    verify_packet_membership(&packets, path_hash, commitment)?;

    Ok(())
}

/// Verify that `path` is attested as absent at `height`
/// # Errors
/// Returns an error if the client is frozen, the proof does not carry a quorum
/// signed packet attestation for `height`, the path is malformed, the path is
/// not attested at all, or any entry for it carries a commitment.
pub fn verify_non_membership(
    client_state: &ClientState,
    height: u64,
    proof: &AttestationProof,
    path: &[Vec<u8>],
) -> Result<(), IbcAttestorClientError> {
    let packets = verified_packets(client_state, height, proof)?;
    let path_hash = path_hash(path)?;

    verify_packet_non_membership(&packets, path_hash)?;

    Ok(())
}

fn verified_packets(
    client_state: &ClientState,
    height: u64,
    proof: &AttestationProof,
) -> Result<PacketAttestation, IbcAttestorClientError> {
    if client_state.is_frozen {
        return Err(IbcAttestorClientError::ClientFrozen);
    }

    let packets =
        verify_attestation::verify_attestation(client_state, proof, AttestationType::Packet)?
            .into_packets()?;

    if packets.packets.is_empty() {
        return Err(IbcAttestorClientError::InvalidAttestedData {
            reason: "packet attestation carries no packets".into(),
        });
    }
    if packets.height != height {
        return Err(IbcAttestorClientError::HeightMismatch {
            expected: height,
            got: packets.height,
        });
    }

    Ok(packets)
}

fn path_hash(path: &[Vec<u8>]) -> Result<B32, IbcAttestorClientError> {
    match path {
        [segment] if !segment.is_empty() => Ok(hash_path(segment)),
        [_] => Err(IbcAttestorClientError::InvalidPath {
            reason: "path cannot be empty".into(),
        }),
        _ => Err(IbcAttestorClientError::InvalidPath {
            reason: format!("expected a single path segment, got {}", path.len()),
        }),
    }
}
