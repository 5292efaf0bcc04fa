//! State management for attestor clients on top of the host key-value store.
//!
//! Every client owns the region `clients/{client_id}/`; the identifier is only
//! used to build the prefix.

use attestor_light_client::{client_state::ClientState, consensus_state::ConsensusState, proto};
use cosmwasm_std::{Order, Storage};
use prost::Message;

use crate::LightClientModuleError;

/// Prefix shared by all client regions
pub const CLIENTS_PREFIX: &str = "clients";
/// The store key used to store the client state
pub const HOST_CLIENT_STATE_KEY: &str = "clientState";
/// The store key prefix used to store the consensus states
pub const HOST_CONSENSUS_STATES_KEY: &str = "consensusStates";

const HEIGHT_KEY_LEN: usize = 8;

/// Prefix of the region owned by `client_id`
#[must_use]
pub fn client_prefix(client_id: &str) -> Vec<u8> {
    format!("{CLIENTS_PREFIX}/{client_id}/").into_bytes()
}

/// The key used to store the client state
#[must_use]
pub fn client_state_key(client_id: &str) -> Vec<u8> {
    let mut key = client_prefix(client_id);
    key.extend_from_slice(HOST_CLIENT_STATE_KEY.as_bytes());
    key
}

/// Prefix under which consensus states are stored by height
#[must_use]
pub fn consensus_states_prefix(client_id: &str) -> Vec<u8> {
    let mut key = client_prefix(client_id);
    key.extend_from_slice(HOST_CONSENSUS_STATES_KEY.as_bytes());
    key.push(b'/');
    key
}

/// The key used to store the consensus state at `height`.
///
/// Heights are big-endian so that byte order equals numeric order.
#[must_use]
pub fn consensus_state_key(client_id: &str, height: u64) -> Vec<u8> {
    let mut key = consensus_states_prefix(client_id);
    key.extend_from_slice(&height.to_be_bytes());
    key
}

/// Whether a client state is stored for `client_id`
#[must_use]
pub fn has_client_state(storage: &dyn Storage, client_id: &str) -> bool {
    storage.get(&client_state_key(client_id)).is_some()
}

/// Get the attestor client state
/// # Errors
/// Returns an error if the client state is not found or cannot be decoded
pub fn get_client_state(
    storage: &dyn Storage,
    client_id: &str,
) -> Result<ClientState, LightClientModuleError> {
    let bz = storage
        .get(&client_state_key(client_id))
        .ok_or_else(|| LightClientModuleError::ClientNotFound {
            client_id: client_id.to_string(),
        })?;
    let raw = proto::ClientState::decode(bz.as_slice())?;

    Ok(ClientState::try_from(raw)?)
}

/// Store the client state, overwriting any previous value
#[allow(clippy::module_name_repetitions)]
pub fn store_client_state(storage: &mut dyn Storage, client_id: &str, client_state: &ClientState) {
    let raw = proto::ClientState::from(client_state.clone());
    storage.set(&client_state_key(client_id), &raw.encode_to_vec());
}

/// Get the consensus state at `height`, if any
/// # Errors
/// Returns an error if the stored consensus state cannot be decoded
pub fn find_consensus_state(
    storage: &dyn Storage,
    client_id: &str,
    height: u64,
) -> Result<Option<ConsensusState>, LightClientModuleError> {
    storage
        .get(&consensus_state_key(client_id, height))
        .map(|bz| {
            proto::ConsensusState::decode(bz.as_slice())
                .map(ConsensusState::from)
                .map_err(Into::into)
        })
        .transpose()
}

/// Get the consensus state at `height`
/// # Errors
/// Returns an error if no consensus state is stored at `height` or it cannot be decoded
pub fn get_consensus_state(
    storage: &dyn Storage,
    client_id: &str,
    height: u64,
) -> Result<ConsensusState, LightClientModuleError> {
    find_consensus_state(storage, client_id, height)?.ok_or_else(|| {
        LightClientModuleError::ConsensusStateNotFound {
            client_id: client_id.to_string(),
            height,
        }
    })
}

/// Store the consensus state at `height` unless one is already present.
///
/// Returns whether the value was written.
pub fn store_consensus_state(
    storage: &mut dyn Storage,
    client_id: &str,
    height: u64,
    consensus_state: &ConsensusState,
) -> bool {
    let key = consensus_state_key(client_id, height);
    if storage.get(&key).is_some() {
        return false;
    }

    let raw = proto::ConsensusState::from(*consensus_state);
    storage.set(&key, &raw.encode_to_vec());
    true
}

/// All heights with a stored consensus state, ascending
/// # Errors
/// Returns an error if a key under the consensus prefix does not end in a height
pub fn consensus_state_heights(
    storage: &dyn Storage,
    client_id: &str,
) -> Result<Vec<u64>, LightClientModuleError> {
    let start = consensus_states_prefix(client_id);
    let end = prefix_end(&start);

    storage
        .range(Some(start.as_slice()), Some(end.as_slice()), Order::Ascending)
        .map(|(key, _)| {
            key.get(start.len()..)
                .and_then(|suffix| <[u8; HEIGHT_KEY_LEN]>::try_from(suffix).ok())
                .map(u64::from_be_bytes)
                .ok_or(LightClientModuleError::MalformedConsensusKey { key })
        })
        .collect()
}

/// Smallest key greater than every key starting with `prefix`
fn prefix_end(prefix: &[u8]) -> Vec<u8> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.pop() {
        if last < u8::MAX {
            end.push(last + 1);
            return end;
        }
    }
    end
}
