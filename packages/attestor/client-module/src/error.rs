//! Defines the [`LightClientModuleError`] type.

use attestor_light_client::error::IbcAttestorClientError;
use thiserror::Error;

/// Error types that can be returned by light client module operations
#[derive(Error, Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum LightClientModuleError {
    /// Light client verification or validation failed
    #[error("{0}")]
    Client(#[from] IbcAttestorClientError),

    /// No client state is stored for the identifier
    #[error("client state not found for {client_id}")]
    ClientNotFound {
        /// Client identifier
        client_id: String,
    },

    /// A client state is already stored for the identifier
    #[error("client {client_id} already exists")]
    ClientAlreadyExists {
        /// Client identifier
        client_id: String,
    },

    /// No consensus state is stored at the height
    #[error("consensus state not found for {client_id} at height {height}")]
    ConsensusStateNotFound {
        /// Client identifier
        client_id: String,
        /// Requested height
        height: u64,
    },

    /// A consensus state key does not end in a big-endian height
    #[error("malformed consensus state key {key:02x?}")]
    MalformedConsensusKey {
        /// Offending store key
        key: Vec<u8>,
    },

    /// Operation is not supported by attestor clients
    #[error("{operation} is not supported")]
    Unsupported {
        /// Operation name
        operation: &'static str,
    },

    // Generic translation errors
    /// Prost decoding error
    #[error("prost decoding error: {0}")]
    ProstDecodeError(#[from] prost::DecodeError),
}
