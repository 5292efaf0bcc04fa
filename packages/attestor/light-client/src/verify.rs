//! Attestor light client verification logic

use crate::{
    attestation::{AttestationProof, AttestationType, StateAttestation},
    client_state::ClientState,
    error::IbcAttestorClientError,
    verify_attestation,
};

/// Verifies a client message carrying a state attestation.
///
/// Verification never touches the store; the returned fact is applied
/// separately by [`crate::update::update_consensus_state`].
///
/// # Errors
/// Returns an error if:
/// - The client is frozen
/// - The attestation verification fails. see [`verify_attestation::verify_signatures`]
/// - The attested bytes are not a state attestation
/// - The attested height or timestamp is zero
pub fn verify_client_message(
    client_state: &ClientState,
    proof: &AttestationProof,
) -> Result<StateAttestation, IbcAttestorClientError> {
    if client_state.is_frozen {
        return Err(IbcAttestorClientError::ClientFrozen);
    }

    let state = verify_attestation::verify_attestation(client_state, proof, AttestationType::State)?
        .into_state()?;

    if state.height == 0 {
        return Err(IbcAttestorClientError::InvalidAttestedData {
            reason: "height must be greater than 0".into(),
        });
    }
    if state.timestamp == 0 {
        return Err(IbcAttestorClientError::InvalidAttestedData {
            reason: "timestamp must be greater than 0".into(),
        });
    }

    Ok(state)
}

#[cfg(test)]
mod verify_client_message {
    use super::*;

    use crate::test_utils::{client_state, packet_proof, sign, signers, state_proof};

    #[test]
    fn succeeds_with_quorum() {
        let attestors = signers(5);
        let cs = client_state(&attestors, 3);
        let proof = state_proof(&attestors[..3], 200, 2_000_000_000);

        let res = verify_client_message(&cs, &proof);
        assert_eq!(res, Ok(StateAttestation::new(200, 2_000_000_000)));
    }

    #[test]
    fn fails_on_too_few_sigs() {
        let attestors = signers(5);
        let cs = client_state(&attestors, 3);
        let proof = state_proof(&attestors[..2], 200, 2_000_000_000);

        let res = verify_client_message(&cs, &proof);
        assert_eq!(
            res,
            Err(IbcAttestorClientError::InsufficientSignatures {
                got: 2,
                required: 3
            })
        );
    }

    #[test]
    fn fails_on_frozen() {
        let attestors = signers(5);
        let cs = client_state(&attestors, 3).frozen();
        let proof = state_proof(&attestors, 200, 2_000_000_000);

        let res = verify_client_message(&cs, &proof);
        assert_eq!(res, Err(IbcAttestorClientError::ClientFrozen));
    }

    #[test]
    fn fails_on_packet_attestation() {
        let attestors = signers(3);
        let cs = client_state(&attestors, 2);
        let proof = packet_proof(&attestors, 200, &[([0x01u8; 32], [0x02u8; 32])]);

        // signed for the packet domain, so the state digest recovers strangers
        let res = verify_client_message(&cs, &proof);
        assert!(matches!(res, Err(IbcAttestorClientError::UnknownSigner { .. })));

        // signed for the state domain, but not a state attestation
        let proof = AttestationProof::new(
            proof.attestation_data.clone(),
            sign(&attestors, AttestationType::State, &proof.attestation_data),
        );
        let res = verify_client_message(&cs, &proof);
        assert!(matches!(res, Err(IbcAttestorClientError::InvalidAttestedData { .. })));
    }

    #[test]
    fn fails_on_zero_height() {
        let attestors = signers(3);
        let cs = client_state(&attestors, 2);
        let proof = state_proof(&attestors, 0, 2_000_000_000);

        let res = verify_client_message(&cs, &proof);
        assert!(
            matches!(res, Err(IbcAttestorClientError::InvalidAttestedData { reason }) if reason.contains("height"))
        );
    }

    #[test]
    fn fails_on_sub_second_timestamp() {
        let attestors = signers(3);
        let cs = client_state(&attestors, 2);
        // truncated to zero seconds on the wire
        let proof = state_proof(&attestors, 10, 999_999_999);

        let res = verify_client_message(&cs, &proof);
        assert!(
            matches!(res, Err(IbcAttestorClientError::InvalidAttestedData { reason }) if reason.contains("timestamp"))
        );
    }
}
