//! Generic function and data structures for verifying
//! attested data.

use std::collections::HashSet;

use alloy_primitives::{Address, Signature, B256, U256};
use sha2::{Digest, Sha256};

use crate::{
    attestation::{Attestation, AttestationProof, AttestationType},
    client_state::ClientState,
    error::IbcAttestorClientError,
};

/// Length of a compact `r || s` signature
const COMPACT_SIGNATURE_LEN: usize = 64;
/// Length of `r || s || v`
pub const SIGNATURE_LEN: usize = COMPACT_SIGNATURE_LEN + 1;

/// Digest attestors sign: `sha256(tag || attestation_data)`
#[must_use]
pub fn signing_digest(kind: AttestationType, attestation_data: &[u8]) -> B256 {
    let mut hasher = Sha256::new();
    hasher.update([kind.tag()]);
    hasher.update(attestation_data);
    B256::from_slice(&hasher.finalize())
}

/// Maps the trailing signature byte to the y-parity of the signature.
///
/// Both the raw (0/1) and the Ethereum (27/28) conventions are accepted.
#[must_use]
pub const fn normalize_recovery_id(v: u8) -> Option<bool> {
    match v {
        0 | 27 => Some(false),
        1 | 28 => Some(true),
        _ => None,
    }
}

/// Recovers the Ethereum address that produced `signature` over `digest`
///
/// # Errors
/// Returns [`IbcAttestorClientError::InvalidSignature`] if the signature is
/// not 65 bytes, carries an unknown recovery byte, or recovery fails.
pub fn recover_signer(digest: &B256, signature: &[u8]) -> Result<Address, IbcAttestorClientError> {
    if signature.len() != SIGNATURE_LEN {
        return Err(IbcAttestorClientError::InvalidSignature {
            reason: format!(
                "expected {SIGNATURE_LEN} bytes, got {}",
                signature.len()
            ),
        });
    }

    let (rs, v) = signature.split_at(COMPACT_SIGNATURE_LEN);
    let parity = normalize_recovery_id(v[0]).ok_or_else(|| {
        IbcAttestorClientError::InvalidSignature {
            reason: format!("invalid recovery id {}", v[0]),
        }
    })?;

    let (r, s) = rs.split_at(COMPACT_SIGNATURE_LEN / 2);
    let sig = Signature::new(U256::from_be_slice(r), U256::from_be_slice(s), parity);

    sig.recover_address_from_prehash(digest)
        .map_err(|e| IbcAttestorClientError::InvalidSignature {
            reason: e.to_string(),
        })
}

/// Verifies the cryptographic validity of the attestation data.
///
/// Fails if:
/// - No signatures are submitted
/// - A signature is malformed or cannot be recovered
/// - A signature recovers to an address outside the attestor set
/// - Two signatures recover to the same attestor
/// - Fewer unique attestors than the quorum signed
///
/// # Errors
/// Returns [`IbcAttestorClientError::InvalidSignature`],
/// [`IbcAttestorClientError::UnknownSigner`] or
/// [`IbcAttestorClientError::DuplicateSigner`] for a rejected signature and
/// [`IbcAttestorClientError::InsufficientSignatures`] when the quorum is not reached.
#[allow(clippy::module_name_repetitions)]
pub fn verify_signatures(
    client_state: &ClientState,
    kind: AttestationType,
    attestation_data: &[u8],
    signatures: &[Vec<u8>],
) -> Result<(), IbcAttestorClientError> {
    if signatures.is_empty() {
        return Err(IbcAttestorClientError::InvalidSignature {
            reason: "no signatures provided".to_string(),
        });
    }

    let digest = signing_digest(kind, attestation_data);

    let mut signers = HashSet::with_capacity(signatures.len());
    for signature in signatures {
        let address = recover_signer(&digest, signature)?;

        if !client_state.is_attestor(&address) {
            return Err(IbcAttestorClientError::UnknownSigner { address });
        }
        if !signers.insert(address) {
            return Err(IbcAttestorClientError::DuplicateSigner { address });
        }
    }

    if signers.len() < client_state.min_required_sigs as usize {
        return Err(IbcAttestorClientError::InsufficientSignatures {
            got: signers.len(),
            required: client_state.min_required_sigs,
        });
    }

    Ok(())
}

/// Verifies the quorum over `proof` for the fact kind `kind` and decodes the fact.
///
/// # Errors
/// See [`verify_signatures`] and [`Attestation::decode`].
#[allow(clippy::module_name_repetitions)]
pub fn verify_attestation(
    client_state: &ClientState,
    proof: &AttestationProof,
    kind: AttestationType,
) -> Result<Attestation, IbcAttestorClientError> {
    verify_signatures(
        client_state,
        kind,
        &proof.attestation_data,
        &proof.signatures,
    )?;

    Attestation::decode(kind, &proof.attestation_data)
}
