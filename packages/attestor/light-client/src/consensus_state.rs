//! Attestor consensus state

use serde::{Deserialize, Serialize};

use crate::{error::IbcAttestorClientError, proto};

/// Trusted timestamp stored for a single height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusState {
    /// Unix timestamp in nanoseconds
    pub timestamp: u64,
}

impl ConsensusState {
    /// Create a new consensus state
    #[must_use]
    pub const fn new(timestamp: u64) -> Self {
        Self { timestamp }
    }

    /// # Errors
    /// Returns [`IbcAttestorClientError::InvalidConsensusState`] for a zero timestamp
    pub fn validate(&self) -> Result<(), IbcAttestorClientError> {
        if self.timestamp == 0 {
            return Err(IbcAttestorClientError::InvalidConsensusState {
                reason: "timestamp must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

impl From<proto::ConsensusState> for ConsensusState {
    fn from(raw: proto::ConsensusState) -> Self {
        Self::new(raw.timestamp)
    }
}

impl From<ConsensusState> for proto::ConsensusState {
    fn from(value: ConsensusState) -> Self {
        Self {
            timestamp: value.timestamp,
        }
    }
}
