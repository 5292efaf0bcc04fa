//! Attestor light client update logic

use crate::{
    attestation::StateAttestation, client_state::ClientState, consensus_state::ConsensusState,
    misbehaviour::check_for_misbehaviour,
};

/// What the host must persist after applying a verified state attestation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// A new height is trusted
    Update {
        /// Newly trusted height
        height: u64,
        /// Consensus state to store at `height`
        consensus_state: ConsensusState,
        /// Client state with an advanced latest height, if it moved
        client_state: Option<ClientState>,
    },
    /// The same fact is already stored at `height`
    NoOp {
        /// Already trusted height
        height: u64,
    },
    /// A conflicting fact is stored at the attested height; the client must
    /// be persisted frozen
    Misbehaviour {
        /// Frozen client state
        client_state: ClientState,
    },
}

impl UpdateOutcome {
    /// Heights reported back to the host
    #[must_use]
    pub fn heights(&self) -> Vec<u64> {
        match self {
            Self::Update { height, .. } | Self::NoOp { height } => vec![*height],
            Self::Misbehaviour { .. } => vec![],
        }
    }
}

/// Decides how a verified state attestation changes the client.
///
/// `existing` is the consensus state currently stored at `attestation.height`.
#[must_use]
pub fn update_consensus_state(
    current_client_state: ClientState,
    existing: Option<&ConsensusState>,
    attestation: &StateAttestation,
) -> UpdateOutcome {
    if check_for_misbehaviour(existing, attestation) {
        return UpdateOutcome::Misbehaviour {
            client_state: current_client_state.frozen(),
        };
    }
    if existing.is_some() {
        return UpdateOutcome::NoOp {
            height: attestation.height,
        };
    }

    // Update client state if the height has progressed beyond the latest
    let height_has_progressed = attestation.height > current_client_state.latest_height;
    let new_client_state = height_has_progressed.then_some(ClientState {
        latest_height: attestation.height,
        ..current_client_state
    });

    UpdateOutcome::Update {
        height: attestation.height,
        consensus_state: ConsensusState::new(attestation.timestamp),
        client_state: new_client_state,
    }
}
