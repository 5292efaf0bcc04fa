//! The light client module: every operation the host's client router calls,
//! scoped to one client region at a time.

use attestor_light_client::{
    attestation::{AttestationProof, StateAttestation},
    client_state::{ClientState, Status},
    consensus_state::ConsensusState,
    error::IbcAttestorClientError,
    membership, misbehaviour, proto,
    update::{self, UpdateOutcome},
    verify,
};
use cosmwasm_std::Storage;
use prost::Message;
use tracing::{debug, info, warn};

use crate::{store, LightClientModuleError};

/// Attestor light client module bound to a host store
pub struct LightClientModule<S: Storage> {
    storage: S,
}

impl<S: Storage> LightClientModule<S> {
    /// Create a module operating on `storage`
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// The underlying store
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Stores the initial client state and its consensus state at the
    /// client's latest height.
    ///
    /// # Errors
    /// Returns an error if a client already exists under `client_id`, if either
    /// state cannot be decoded, or if either state is invalid.
    pub fn initialize(
        &mut self,
        client_id: &str,
        client_state_bz: &[u8],
        consensus_state_bz: &[u8],
    ) -> Result<(), LightClientModuleError> {
        if store::has_client_state(&self.storage, client_id) {
            return Err(LightClientModuleError::ClientAlreadyExists {
                client_id: client_id.to_string(),
            });
        }

        let client_state = ClientState::try_from(proto::ClientState::decode(client_state_bz)?)?;
        client_state.validate()?;

        let consensus_state =
            ConsensusState::from(proto::ConsensusState::decode(consensus_state_bz)?);
        consensus_state.validate()?;

        store::store_client_state(&mut self.storage, client_id, &client_state);
        store::store_consensus_state(
            &mut self.storage,
            client_id,
            client_state.latest_height,
            &consensus_state,
        );

        info!(
            client_id,
            height = client_state.latest_height,
            timestamp = consensus_state.timestamp,
            attestors = client_state.attestor_addresses.len(),
            min_required_sigs = client_state.min_required_sigs,
            "initialized attestor client"
        );

        Ok(())
    }

    /// Verifies that `client_msg` is a quorum signed state attestation.
    ///
    /// # Errors
    /// Returns an error if the client is unknown or frozen, or if the message
    /// fails verification. see [`verify::verify_client_message`]
    pub fn verify_client_message(
        &self,
        client_id: &str,
        client_msg: &[u8],
    ) -> Result<(), LightClientModuleError> {
        let client_state = store::get_client_state(&self.storage, client_id)?;
        let proof = AttestationProof::decode(client_msg)?;

        let state = verify::verify_client_message(&client_state, &proof)?;
        debug!(
            client_id,
            height = state.height,
            timestamp = state.timestamp,
            "verified client message"
        );

        Ok(())
    }

    /// Whether `client_msg` attests a timestamp that conflicts with the one
    /// already trusted at the same height. Undecodable messages and unknown
    /// clients are never misbehaviour.
    pub fn check_for_misbehaviour(&self, client_id: &str, client_msg: &[u8]) -> bool {
        let Some(state) = decode_state_attestation(client_msg) else {
            return false;
        };

        match store::find_consensus_state(&self.storage, client_id, state.height) {
            Ok(existing) => misbehaviour::check_for_misbehaviour(existing.as_ref(), &state),
            Err(_) => false,
        }
    }

    /// Freezing only ever happens as a side effect of [`Self::update_state`]
    ///
    /// # Errors
    /// Always returns [`LightClientModuleError::Unsupported`]
    #[allow(clippy::unused_self, clippy::missing_const_for_fn)]
    pub fn update_state_on_misbehaviour(
        &mut self,
        _client_id: &str,
        _client_msg: &[u8],
    ) -> Result<(), LightClientModuleError> {
        Err(LightClientModuleError::Unsupported {
            operation: "updateStateOnMisbehaviour",
        })
    }

    /// Applies a client message that has already passed
    /// [`Self::verify_client_message`] and returns the heights it touched.
    ///
    /// A message for a height that is already trusted with the same timestamp
    /// is a no-op. A conflicting timestamp freezes the client and returns no
    /// heights. Malformed messages and frozen clients leave the store untouched.
    ///
    /// # Errors
    /// Returns an error if the client is unknown or its stored state cannot be decoded
    pub fn update_state(
        &mut self,
        client_id: &str,
        client_msg: &[u8],
    ) -> Result<Vec<u64>, LightClientModuleError> {
        let client_state = store::get_client_state(&self.storage, client_id)?;
        if client_state.is_frozen {
            debug!(client_id, "ignoring update for frozen client");
            return Ok(vec![]);
        }

        let Some(state) = decode_state_attestation(client_msg) else {
            warn!(client_id, "ignoring malformed client message");
            return Ok(vec![]);
        };

        let existing = store::find_consensus_state(&self.storage, client_id, state.height)?;
        let outcome = update::update_consensus_state(client_state, existing.as_ref(), &state);

        match &outcome {
            UpdateOutcome::Update {
                height,
                consensus_state,
                client_state,
            } => {
                store::store_consensus_state(&mut self.storage, client_id, *height, consensus_state);
                if let Some(client_state) = client_state {
                    store::store_client_state(&mut self.storage, client_id, client_state);
                }
                info!(
                    client_id,
                    height,
                    timestamp = consensus_state.timestamp,
                    "updated attestor client"
                );
            }
            UpdateOutcome::NoOp { height } => {
                debug!(client_id, height, "consensus state already stored");
            }
            UpdateOutcome::Misbehaviour { client_state } => {
                store::store_client_state(&mut self.storage, client_id, client_state);
                warn!(
                    client_id,
                    height = state.height,
                    attested_timestamp = state.timestamp,
                    trusted_timestamp = existing.map(|c| c.timestamp),
                    "conflicting attestation, client frozen"
                );
            }
        }

        Ok(outcome.heights())
    }

    /// Verifies that `value` is attested under `path` at `height`.
    ///
    /// The delay periods are accepted for interface compatibility; attestor
    /// clients enforce no delay.
    ///
    /// # Errors
    /// Returns an error if the client is unknown or frozen, no consensus state
    /// is trusted at `height`, or the proof fails verification.
    /// see [`membership::verify_membership`]
    #[allow(clippy::too_many_arguments)]
    pub fn verify_membership(
        &self,
        client_id: &str,
        height: u64,
        _delay_time_period: u64,
        _delay_block_period: u64,
        proof: &[u8],
        path: &[Vec<u8>],
        value: &[u8],
    ) -> Result<(), LightClientModuleError> {
        let (client_state, proof) = self.membership_context(client_id, height, proof)?;
        membership::verify_membership(&client_state, height, &proof, path, value)?;
        Ok(())
    }

    /// Verifies that `path` is attested as absent at `height`.
    ///
    /// # Errors
    /// Same as [`Self::verify_membership`], see also
    /// [`membership::verify_non_membership`]
    pub fn verify_non_membership(
        &self,
        client_id: &str,
        height: u64,
        _delay_time_period: u64,
        _delay_block_period: u64,
        proof: &[u8],
        path: &[Vec<u8>],
    ) -> Result<(), LightClientModuleError> {
        let (client_state, proof) = self.membership_context(client_id, height, proof)?;
        membership::verify_non_membership(&client_state, height, &proof, path)?;
        Ok(())
    }

    /// `Unknown` if no client is stored or it cannot be decoded
    pub fn status(&self, client_id: &str) -> Status {
        store::get_client_state(&self.storage, client_id)
            .map_or(Status::Unknown, |client_state| client_state.status())
    }

    /// Latest trusted height, 0 for unknown clients
    pub fn latest_height(&self, client_id: &str) -> u64 {
        store::get_client_state(&self.storage, client_id)
            .map_or(0, |client_state| client_state.latest_height)
    }

    /// Trusted timestamp in nanoseconds at `height`
    ///
    /// # Errors
    /// Returns an error if the client is unknown or no consensus state is stored at `height`
    pub fn timestamp_at_height(
        &self,
        client_id: &str,
        height: u64,
    ) -> Result<u64, LightClientModuleError> {
        if !store::has_client_state(&self.storage, client_id) {
            return Err(LightClientModuleError::ClientNotFound {
                client_id: client_id.to_string(),
            });
        }
        Ok(store::get_consensus_state(&self.storage, client_id, height)?.timestamp)
    }

    /// All heights with a trusted consensus state, ascending
    ///
    /// # Errors
    /// Returns an error if the client is unknown or a stored key is malformed
    pub fn consensus_state_heights(
        &self,
        client_id: &str,
    ) -> Result<Vec<u64>, LightClientModuleError> {
        if !store::has_client_state(&self.storage, client_id) {
            return Err(LightClientModuleError::ClientNotFound {
                client_id: client_id.to_string(),
            });
        }
        store::consensus_state_heights(&self.storage, client_id)
    }

    /// A frozen attestor client has no substitute trust root to recover from
    ///
    /// # Errors
    /// Always returns [`LightClientModuleError::Unsupported`]
    #[allow(clippy::unused_self, clippy::missing_const_for_fn)]
    pub fn recover_client(
        &mut self,
        _client_id: &str,
        _substitute_client_id: &str,
    ) -> Result<(), LightClientModuleError> {
        Err(LightClientModuleError::Unsupported {
            operation: "recoverClient",
        })
    }

    /// # Errors
    /// Always returns [`LightClientModuleError::Unsupported`]
    #[allow(clippy::unused_self, clippy::missing_const_for_fn)]
    pub fn verify_upgrade_and_update_state(
        &mut self,
        _client_id: &str,
        _new_client: &[u8],
        _new_consensus_state: &[u8],
        _upgrade_client_proof: &[u8],
        _upgrade_consensus_state_proof: &[u8],
    ) -> Result<(), LightClientModuleError> {
        Err(LightClientModuleError::Unsupported {
            operation: "verifyUpgradeAndUpdateState",
        })
    }

    fn membership_context(
        &self,
        client_id: &str,
        height: u64,
        proof: &[u8],
    ) -> Result<(ClientState, AttestationProof), LightClientModuleError> {
        let client_state = store::get_client_state(&self.storage, client_id)?;
        if client_state.is_frozen {
            return Err(IbcAttestorClientError::ClientFrozen.into());
        }
        store::get_consensus_state(&self.storage, client_id, height)?;

        Ok((client_state, AttestationProof::decode(proof)?))
    }
}

/// State attestation carried by `client_msg`, if well formed and non-zero
fn decode_state_attestation(client_msg: &[u8]) -> Option<StateAttestation> {
    let proof = AttestationProof::decode(client_msg).ok()?;
    StateAttestation::from_abi_bytes(&proof.attestation_data)
        .ok()
        .filter(|state| state.height > 0 && state.timestamp > 0)
}
