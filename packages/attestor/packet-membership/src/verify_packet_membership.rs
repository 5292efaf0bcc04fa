//! Generic function and data structures for verifying
//! the membership of IBC packets in a packet attestation.

use crate::{
    packet_commitments::{PacketAttestation, PacketCompact},
    PacketAttestationError, B32,
};

/// Verifies that an entry with both `path_hash` and `value` exists in the
/// `proof`. Entry order does not matter; the first match wins.
///
/// # Errors
/// - [`PacketAttestationError::NotMember`] if no entry matches the pair
#[allow(clippy::module_name_repetitions)]
pub fn verify_packet_membership(
    proof: &PacketAttestation,
    path_hash: B32,
    value: B32,
) -> Result<(), PacketAttestationError> {
    if proof
        .iterate()
        .any(|packet| packet.path == path_hash && packet.commitment == value)
    {
        Ok(())
    } else {
        Err(PacketAttestationError::NotMember)
    }
}

/// Verifies that `path_hash` is attested as absent in the `proof`.
///
/// Absence holds only if the path is mentioned at least once and every entry
/// for it carries the all-zero commitment.
///
/// # Errors
/// - [`PacketAttestationError::NotMember`] if the path is never mentioned
/// - [`PacketAttestationError::NonMembershipFailed`] if any entry for the path
///   carries a non-zero commitment
#[allow(clippy::module_name_repetitions)]
pub fn verify_packet_non_membership(
    proof: &PacketAttestation,
    path_hash: B32,
) -> Result<(), PacketAttestationError> {
    let mut matching = proof.iterate().filter(|packet| packet.path == path_hash).peekable();

    if matching.peek().is_none() {
        return Err(PacketAttestationError::NotMember);
    }

    if matching.all(PacketCompact::is_absent) {
        Ok(())
    } else {
        Err(PacketAttestationError::NonMembershipFailed)
    }
}

#[cfg(test)]
#[allow(clippy::module_inception)]
mod verify_packet_membership {
    use super::*;

    use rstest::rstest;

    const ZERO: [u8; 32] = [0u8; 32];

    fn proof(packets: &[([u8; 32], [u8; 32])]) -> PacketAttestation {
        PacketAttestation::new(
            100,
            packets.iter().copied().map(PacketCompact::new_from_tuple).collect(),
        )
    }

    #[test]
    fn succeeds() {
        // (path, commitment)[]
        let proof = proof(&[([1u8; 32], [2u8; 32]), ([3u8; 32], [4u8; 32])]);

        let res = verify_packet_membership(&proof, [3u8; 32].into(), [4u8; 32].into());
        assert!(res.is_ok());
    }

    #[test]
    fn fails_on_missing() {
        let proof = proof(&[([1u8; 32], [2u8; 32]), ([3u8; 32], [4u8; 32])]);

        // commitment that is not in the proof
        let res = verify_packet_membership(&proof, [3u8; 32].into(), [7u8; 32].into());
        assert_eq!(res, Err(PacketAttestationError::NotMember));
    }

    #[test]
    fn fails_on_commitment_under_other_path() {
        let proof = proof(&[([1u8; 32], [2u8; 32]), ([3u8; 32], [4u8; 32])]);

        // the commitment exists, but it was attested for a different path
        let res = verify_packet_membership(&proof, [1u8; 32].into(), [4u8; 32].into());
        assert_eq!(res, Err(PacketAttestationError::NotMember));
    }

    #[test]
    fn finds_match_regardless_of_position() {
        let proof = proof(&[
            ([1u8; 32], [9u8; 32]),
            ([1u8; 32], [2u8; 32]),
            ([1u8; 32], [2u8; 32]),
        ]);

        let res = verify_packet_membership(&proof, [1u8; 32].into(), [2u8; 32].into());
        assert!(res.is_ok());
    }

    #[rstest]
    #[case::single_zero(&[([1u8; 32], ZERO)], Ok(()))]
    #[case::all_zero(&[([1u8; 32], ZERO), ([2u8; 32], [5u8; 32]), ([1u8; 32], ZERO)], Ok(()))]
    #[case::non_zero(&[([1u8; 32], [1u8; 32])], Err(PacketAttestationError::NonMembershipFailed))]
    #[case::zero_then_non_zero(&[([1u8; 32], ZERO), ([1u8; 32], [1u8; 32])], Err(PacketAttestationError::NonMembershipFailed))]
    #[case::non_zero_then_zero(&[([1u8; 32], [1u8; 32]), ([1u8; 32], ZERO)], Err(PacketAttestationError::NonMembershipFailed))]
    #[case::path_not_mentioned(&[([2u8; 32], ZERO)], Err(PacketAttestationError::NotMember))]
    #[case::empty(&[], Err(PacketAttestationError::NotMember))]
    fn non_membership(
        #[case] packets: &[([u8; 32], [u8; 32])],
        #[case] expected: Result<(), PacketAttestationError>,
    ) {
        let res = verify_packet_non_membership(&proof(packets), [1u8; 32].into());
        assert_eq!(res, expected);
    }
}
