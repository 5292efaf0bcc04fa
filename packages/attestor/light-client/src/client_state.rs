//! Attestor client state for IBC light client

use std::{collections::HashSet, fmt, str::FromStr};

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::{error::IbcAttestorClientError, proto};

/// Attestor client state for IBC light client.
///
/// The attestor set and quorum are fixed at initialization. Only
/// `latest_height` and `is_frozen` change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientState {
    /// Attestor Ethereum addresses (20-byte addresses recovered from signatures)
    pub attestor_addresses: Vec<Address>,
    /// Minimum required signatures
    pub min_required_sigs: u32,
    /// Latest height for tracking progression
    pub latest_height: u64,
    /// Whether the client is frozen due to misbehavior
    pub is_frozen: bool,
}

/// Status of an attestor client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Client accepts updates and proofs
    Active,
    /// Conflicting attestations were observed; terminal
    Frozen,
    /// No client state is stored for the identifier
    Unknown,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Frozen => write!(f, "Frozen"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

impl ClientState {
    /// Create a new, unfrozen client state
    #[must_use]
    pub const fn new(
        attestor_addresses: Vec<Address>,
        min_required_sigs: u32,
        latest_height: u64,
    ) -> Self {
        Self {
            attestor_addresses,
            min_required_sigs,
            latest_height,
            is_frozen: false,
        }
    }

    /// Construct a new client state from a list of public keys.
    #[must_use]
    pub fn new_from_pubkeys(
        pub_keys: &[k256::ecdsa::VerifyingKey],
        min_required_sigs: u32,
        latest_height: u64,
    ) -> Self {
        let attestor_addresses = pub_keys.iter().map(Address::from_public_key).collect();
        Self::new(attestor_addresses, min_required_sigs, latest_height)
    }

    /// Checks the structural invariants of the client state.
    ///
    /// # Errors
    /// Returns [`IbcAttestorClientError::InvalidClientState`] if the attestor set
    /// is empty or contains duplicates or the zero address, if the quorum is zero
    /// or exceeds the number of attestors, or if the latest height is zero.
    pub fn validate(&self) -> Result<(), IbcAttestorClientError> {
        let invalid = |reason: &str| IbcAttestorClientError::InvalidClientState {
            reason: reason.to_string(),
        };

        if self.attestor_addresses.is_empty() {
            return Err(invalid("attestor addresses cannot be empty"));
        }
        if self.min_required_sigs == 0 {
            return Err(invalid("min required sigs cannot be 0"));
        }
        if self.min_required_sigs as usize > self.attestor_addresses.len() {
            return Err(invalid("min required sigs cannot exceed number of attestors"));
        }

        let mut seen = HashSet::with_capacity(self.attestor_addresses.len());
        for address in &self.attestor_addresses {
            if address.is_zero() {
                return Err(invalid("attestor address cannot be empty"));
            }
            if !seen.insert(address) {
                return Err(IbcAttestorClientError::InvalidClientState {
                    reason: format!("duplicate attestor address {address}"),
                });
            }
        }

        if self.latest_height == 0 {
            return Err(invalid("latest height must be greater than 0"));
        }

        Ok(())
    }

    /// Current status derived from the frozen flag
    #[must_use]
    pub const fn status(&self) -> Status {
        if self.is_frozen {
            Status::Frozen
        } else {
            Status::Active
        }
    }

    /// Whether `address` belongs to the attestor set
    #[must_use]
    pub fn is_attestor(&self, address: &Address) -> bool {
        self.attestor_addresses.contains(address)
    }

    /// Returns the client state marked as frozen
    #[must_use]
    pub fn frozen(self) -> Self {
        Self {
            is_frozen: true,
            ..self
        }
    }
}

impl TryFrom<proto::ClientState> for ClientState {
    type Error = IbcAttestorClientError;

    fn try_from(raw: proto::ClientState) -> Result<Self, Self::Error> {
        let attestor_addresses = raw
            .attestor_addresses
            .iter()
            .map(String::as_str)
            .map(parse_address)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            attestor_addresses,
            min_required_sigs: raw.min_required_sigs,
            latest_height: raw.latest_height,
            is_frozen: raw.is_frozen,
        })
    }
}

impl From<ClientState> for proto::ClientState {
    fn from(value: ClientState) -> Self {
        Self {
            attestor_addresses: value
                .attestor_addresses
                .iter()
                .map(ToString::to_string)
                .collect(),
            min_required_sigs: value.min_required_sigs,
            latest_height: value.latest_height,
            is_frozen: value.is_frozen,
        }
    }
}

/// Parses a hex address with or without `0x` prefix, in any letter case.
fn parse_address(raw: &str) -> Result<Address, IbcAttestorClientError> {
    if raw.trim().is_empty() {
        return Err(IbcAttestorClientError::InvalidClientState {
            reason: "attestor address cannot be empty".to_string(),
        });
    }
    Address::from_str(raw).map_err(|e| IbcAttestorClientError::InvalidClientState {
        reason: format!("invalid attestor address format {raw}: {e}"),
    })
}
