//! Protobuf wire types persisted by the host and carried in client messages.
//!
//! These mirror `ibc.lightclients.attestations.v1` and are kept free of any
//! validation; see the domain types for the checked counterparts.

/// Raw attestor client state
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct ClientState {
    /// Hex encoded attestor addresses
    #[prost(string, repeated, tag = "1")]
    pub attestor_addresses: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
    /// Minimum number of unique attestor signatures
    #[prost(uint32, tag = "2")]
    pub min_required_sigs: u32,
    /// Latest trusted height
    #[prost(uint64, tag = "3")]
    pub latest_height: u64,
    /// Whether misbehaviour has been observed
    #[prost(bool, tag = "4")]
    pub is_frozen: bool,
}

/// Raw attestor consensus state
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct ConsensusState {
    /// Trusted timestamp in unix nanoseconds
    #[prost(uint64, tag = "1")]
    pub timestamp: u64,
}

/// Raw attestation proof, used both as client message and membership proof
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct AttestationProof {
    /// ABI encoded attested fact
    #[prost(bytes = "vec", tag = "1")]
    pub attestation_data: ::prost::alloc::vec::Vec<u8>,
    /// 65-byte `r || s || v` signatures over the tagged digest
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub signatures: ::prost::alloc::vec::Vec<::prost::alloc::vec::Vec<u8>>,
}
