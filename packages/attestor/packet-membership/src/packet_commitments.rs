//! Packet attestation types and their ABI encoding and decoding.

use alloy_primitives::{keccak256, FixedBytes as AlloyFixedBytes};
use alloy_sol_types::SolValue;

use crate::{
    abi::{read_bytes32, read_u64_word, ABI_WORD_SIZE},
    PacketAttestationError,
};

/// handy alias for 32-byte fixed bytes
pub type B32 = AlloyFixedBytes<32>;

/// Byte offset of the struct body in `abi.encode(PacketAttestation)`.
const TUPLE_OFFSET: u64 = 32;
/// Offset of the packets array, relative to the struct body.
const PACKETS_OFFSET: u64 = 64;
/// Tuple offset, height, packets offset and packets length.
const HEADER_WORDS: usize = 4;
/// Each packet is two words: path hash and commitment.
const PACKET_SIZE: usize = 2 * ABI_WORD_SIZE;

/// Reduce an application path of arbitrary length to the 32-byte key
/// attestors sign over.
#[must_use]
pub fn hash_path(path: &[u8]) -> B32 {
    keccak256(path)
}

/// Represents lightweight packet as `hash(path.path()) && packet.commitment()`.
/// Including path hash implies replay-protection for attestations
/// (because we can't rely on a merkle proof)
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PacketCompact {
    /// Packet's `commitment_path` hash
    pub path: B32,

    /// Packet's `commitment` hash. All zeroes marks the path as absent.
    pub commitment: B32,
}

impl PacketCompact {
    /// Create a new packet compact from a path hash and a commitment
    pub fn new<T>(path: T, commitment: T) -> Self
    where
        T: Into<B32>,
    {
        Self {
            path: path.into(),
            commitment: commitment.into(),
        }
    }

    /// Create a new packet compact from a tuple of path hash and commitment
    pub fn new_from_tuple<T>(tuple: (T, T)) -> Self
    where
        T: Into<B32>,
    {
        Self::new(tuple.0, tuple.1)
    }

    /// Convert packet compact to a tuple of path hash and commitment
    #[inline]
    #[must_use]
    pub const fn as_tuple(&self) -> (B32, B32) {
        (self.path, self.commitment)
    }

    /// Whether the commitment is the all-zero absence sentinel
    #[must_use]
    pub fn is_absent(&self) -> bool {
        self.commitment == B32::ZERO
    }

    /// Encode packet compact as `tuple(path_hash, commitment_hash)`
    #[must_use]
    pub fn to_abi_bytes(&self) -> Vec<u8> {
        self.as_tuple().abi_encode()
    }

    /// Decode packet compact from ABI bytes encoded as `tuple(bytes32, bytes32)`
    ///
    /// # Errors
    /// Fails unless `raw` is exactly two words.
    pub fn from_abi_bytes(raw: &[u8]) -> Result<Self, PacketAttestationError> {
        if raw.len() != PACKET_SIZE {
            return Err(PacketAttestationError::InvalidAttestationData {
                reason: format!("packet must be {PACKET_SIZE} bytes, got {}", raw.len()),
            });
        }
        Self::read_at(raw, 0)
    }

    fn read_at(raw: &[u8], offset: usize) -> Result<Self, PacketAttestationError> {
        let path = read_bytes32(raw, offset);
        let commitment = read_bytes32(raw, offset + ABI_WORD_SIZE);
        match (path, commitment) {
            (Some(path), Some(commitment)) => Ok(Self::new(path, commitment)),
            _ => Err(PacketAttestationError::InvalidAttestationData {
                reason: format!("truncated packet at offset {offset}"),
            }),
        }
    }
}

/// Attested list of packet commitments at a counterparty height.
///
/// Wire format is Solidity's `abi.encode(PacketAttestation)` for
/// `struct PacketAttestation { uint64 height; PacketCompact[] packets; }`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PacketAttestation {
    /// Counterparty height the packets were observed at
    pub height: u64,
    /// Attested `(path hash, commitment)` entries
    pub packets: Vec<PacketCompact>,
}

impl PacketAttestation {
    /// Create a new instance of [`PacketAttestation`]
    #[must_use]
    pub const fn new(height: u64, packets: Vec<PacketCompact>) -> Self {
        Self { height, packets }
    }

    /// Iterate over each individual packet commitment
    pub fn iterate(&self) -> impl Iterator<Item = &PacketCompact> {
        self.packets.iter()
    }

    /// Encode as `abi.encode(PacketAttestation)`
    #[must_use]
    pub fn to_abi_bytes(&self) -> Vec<u8> {
        let packets: Vec<(B32, B32)> = self.iterate().map(PacketCompact::as_tuple).collect();
        (self.height, packets).abi_encode()
    }

    /// Decode from `abi.encode(PacketAttestation)` bytes.
    ///
    /// # Errors
    /// Fails on truncated input, trailing bytes, unexpected offsets or
    /// integers that do not fit into a `uint64`.
    pub fn from_abi_bytes(raw: &[u8]) -> Result<Self, PacketAttestationError> {
        let invalid = |reason: String| PacketAttestationError::InvalidAttestationData { reason };

        let header_size = HEADER_WORDS * ABI_WORD_SIZE;
        if raw.len() < header_size {
            return Err(invalid(format!(
                "expected at least {header_size} bytes, got {}",
                raw.len()
            )));
        }

        let word = |index: usize| {
            read_u64_word(raw, index * ABI_WORD_SIZE)
                .ok_or_else(|| invalid(format!("word {index} is not a valid uint64")))
        };

        let tuple_offset = word(0)?;
        if tuple_offset != TUPLE_OFFSET {
            return Err(invalid(format!("unexpected tuple offset {tuple_offset}")));
        }
        let height = word(1)?;
        let packets_offset = word(2)?;
        if packets_offset != PACKETS_OFFSET {
            return Err(invalid(format!("unexpected packets offset {packets_offset}")));
        }
        let packets_len = usize::try_from(word(3)?)
            .map_err(|_| invalid("packets length overflows".to_string()))?;

        let expected_len = packets_len
            .checked_mul(PACKET_SIZE)
            .and_then(|body| body.checked_add(header_size))
            .ok_or_else(|| invalid("packets length overflows".to_string()))?;
        if raw.len() != expected_len {
            return Err(invalid(format!(
                "expected {expected_len} bytes for {packets_len} packets, got {}",
                raw.len()
            )));
        }

        let packets = (0..packets_len)
            .map(|i| PacketCompact::read_at(raw, header_size + i * PACKET_SIZE))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { height, packets })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::u64_word;
    use rstest::rstest;

    fn sample() -> PacketAttestation {
        PacketAttestation::new(
            200,
            vec![
                PacketCompact::new([0x01u8; 32], [0x02u8; 32]),
                PacketCompact::new([0x03u8; 32], [0x04u8; 32]),
                PacketCompact::new([0xABu8; 32], [0x00u8; 32]),
            ],
        )
    }

    #[test]
    fn test_packet_attestation_layout_matches_solidity() {
        // ARRANGE
        // abi.encode(PacketAttestation({
        //   height: 100,
        //   packets: [PacketCompact({path: bytes32(0x10..), commitment: bytes32(0x20..)})]
        // }))
        const SAMPLE_HEX: &str = concat!(
            "0000000000000000000000000000000000000000000000000000000000000020",
            "0000000000000000000000000000000000000000000000000000000000000064",
            "0000000000000000000000000000000000000000000000000000000000000040",
            "0000000000000000000000000000000000000000000000000000000000000001",
            "1000000000000000000000000000000000000000000000000000000000000000",
            "2000000000000000000000000000000000000000000000000000000000000000",
        );
        let mut path = [0u8; 32];
        path[0] = 0x10;
        let mut commitment = [0u8; 32];
        commitment[0] = 0x20;
        let attestation = PacketAttestation::new(100, vec![PacketCompact::new(path, commitment)]);

        // ACT
        let encoded = attestation.to_abi_bytes();

        // ASSERT
        assert_eq!(hex::encode(&encoded), SAMPLE_HEX, "hex mismatch");
        let decoded = PacketAttestation::from_abi_bytes(&encoded).unwrap();
        assert_eq!(decoded, attestation);
    }

    #[test]
    fn test_packet_attestation_preserves_order_and_sentinel() {
        let attestation = sample();
        let decoded = PacketAttestation::from_abi_bytes(&attestation.to_abi_bytes()).unwrap();

        assert_eq!(decoded.height, 200);
        assert_eq!(decoded.packets.len(), 3);
        assert_eq!(decoded.packets[0].path.as_slice()[0], 0x01);
        assert_eq!(decoded.packets[1].commitment.as_slice()[0], 0x04);
        assert!(decoded.packets[2].is_absent());
        assert!(!decoded.packets[0].is_absent());
    }

    #[test]
    fn test_empty_packets_decode() {
        let attestation = PacketAttestation::new(300, vec![]);
        let encoded = attestation.to_abi_bytes();
        assert_eq!(encoded.len(), 4 * ABI_WORD_SIZE);

        let decoded = PacketAttestation::from_abi_bytes(&encoded).unwrap();
        assert_eq!(decoded.height, 300);
        assert!(decoded.packets.is_empty());
    }

    #[rstest]
    #[case::empty(vec![])]
    #[case::garbage(vec![0x01, 0x02, 0x03])]
    #[case::truncated({
        let mut bz = sample().to_abi_bytes();
        bz.truncate(bz.len() - 1);
        bz
    })]
    #[case::trailing_word({
        let mut bz = sample().to_abi_bytes();
        bz.extend_from_slice(&[0u8; 32]);
        bz
    })]
    #[case::bad_tuple_offset({
        let mut bz = sample().to_abi_bytes();
        bz[..32].copy_from_slice(&u64_word(64));
        bz
    })]
    #[case::bad_packets_offset({
        let mut bz = sample().to_abi_bytes();
        bz[64..96].copy_from_slice(&u64_word(96));
        bz
    })]
    #[case::height_wider_than_u64({
        let mut bz = sample().to_abi_bytes();
        bz[32] = 1;
        bz
    })]
    #[case::length_overstated({
        let mut bz = sample().to_abi_bytes();
        bz[96..128].copy_from_slice(&u64_word(4));
        bz
    })]
    #[case::length_overflow({
        let mut bz = sample().to_abi_bytes();
        bz[96..128].copy_from_slice(&u64_word(u64::MAX));
        bz
    })]
    fn test_packet_attestation_rejects_malformed(#[case] raw: Vec<u8>) {
        assert!(matches!(
            PacketAttestation::from_abi_bytes(&raw),
            Err(PacketAttestationError::InvalidAttestationData { .. })
        ));
    }

    #[test]
    fn test_packet_compact_is_two_words() {
        let packet = PacketCompact::new([0xAAu8; 32], [0xBBu8; 32]);
        let encoded = packet.to_abi_bytes();

        assert_eq!(encoded.len(), 64);
        assert_eq!(&encoded[..32], &[0xAAu8; 32]);
        assert_eq!(&encoded[32..], &[0xBBu8; 32]);
        assert_eq!(PacketCompact::from_abi_bytes(&encoded).unwrap(), packet);
        assert!(PacketCompact::from_abi_bytes(&encoded[..63]).is_err());
    }

    #[test]
    fn test_hash_path_is_keccak256() {
        // keccak256("")
        assert_eq!(
            hex::encode(hash_path(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
        assert_ne!(hash_path(b"commitments/1"), hash_path(b"commitments/2"));
    }
}
