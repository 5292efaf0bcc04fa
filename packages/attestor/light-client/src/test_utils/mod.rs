//! Test utilities for Attestor light client

#[cfg(any(test, feature = "test-utils"))]
pub use fixtures::*;

#[allow(missing_docs, clippy::missing_panics_doc)]
#[cfg(any(test, feature = "test-utils"))]
mod fixtures {
    use alloy_primitives::Address;
    use alloy_signer::SignerSync;
    use alloy_signer_local::PrivateKeySigner;
    use attestor_packet_membership::{PacketAttestation, PacketCompact};

    use crate::{
        attestation::{AttestationProof, AttestationType, StateAttestation},
        client_state::ClientState,
        verify_attestation::signing_digest,
    };

    /// `n` deterministic attestor keys
    #[must_use]
    pub fn signers(n: usize) -> Vec<PrivateKeySigner> {
        (1..=n)
            .map(|i| {
                let seed = u8::try_from(i).expect("at most 255 signers");
                PrivateKeySigner::from_slice(&[seed; 32]).expect("valid key")
            })
            .collect()
    }

    #[must_use]
    pub fn addresses(signers: &[PrivateKeySigner]) -> Vec<Address> {
        signers.iter().map(PrivateKeySigner::address).collect()
    }

    /// Client state trusting `signers` at height 1
    #[must_use]
    pub fn client_state(signers: &[PrivateKeySigner], min_required_sigs: u32) -> ClientState {
        ClientState::new(addresses(signers), min_required_sigs, 1)
    }

    /// `r || s || v` signatures with `v` in the 27/28 convention
    #[must_use]
    pub fn sign(signers: &[PrivateKeySigner], kind: AttestationType, data: &[u8]) -> Vec<Vec<u8>> {
        let digest = signing_digest(kind, data);
        signers
            .iter()
            .map(|signer| {
                let sig = signer.sign_hash_sync(&digest).expect("signing should work");
                let mut bytes = Vec::with_capacity(65);
                bytes.extend_from_slice(&sig.r().to_be_bytes::<32>());
                bytes.extend_from_slice(&sig.s().to_be_bytes::<32>());
                bytes.push(u8::from(sig.v()) + 27);
                bytes
            })
            .collect()
    }

    #[must_use]
    pub fn state_proof(
        signers: &[PrivateKeySigner],
        height: u64,
        timestamp: u64,
    ) -> AttestationProof {
        let data = StateAttestation::new(height, timestamp).to_abi_bytes();
        let signatures = sign(signers, AttestationType::State, &data);
        AttestationProof::new(data, signatures)
    }

    #[must_use]
    pub fn packet_proof(
        signers: &[PrivateKeySigner],
        height: u64,
        packets: &[([u8; 32], [u8; 32])],
    ) -> AttestationProof {
        let data = PacketAttestation::new(
            height,
            packets.iter().copied().map(PacketCompact::new_from_tuple).collect(),
        )
        .to_abi_bytes();
        let signatures = sign(signers, AttestationType::Packet, &data);
        AttestationProof::new(data, signatures)
    }
}
