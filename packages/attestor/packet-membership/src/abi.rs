//! Strict readers for Ethereum ABI words.
//!
//! Encoding goes through `alloy-sol-types`. Decoding is done word by word so that
//! every fact is rejected unless it is byte-exact with what a Solidity verifier
//! would produce: integers must fit their declared width and no trailing or
//! missing words are tolerated.

/// Size of a single ABI word.
pub const ABI_WORD_SIZE: usize = 32;

/// Number of leading zero bytes in a word holding a `uint64`.
const U64_PADDING: usize = ABI_WORD_SIZE - 8;

/// Read a `uint64` from the word starting at `offset`.
///
/// Returns `None` if the word is out of bounds or if any of the 24 padding
/// bytes is non-zero (the value would not fit into a `uint64`).
#[must_use]
pub fn read_u64_word(data: &[u8], offset: usize) -> Option<u64> {
    let word = data.get(offset..offset.checked_add(ABI_WORD_SIZE)?)?;
    let (padding, value) = word.split_at(U64_PADDING);
    if padding.iter().any(|b| *b != 0) {
        return None;
    }
    Some(u64::from_be_bytes(value.try_into().ok()?))
}

/// Read a `bytes32` from the word starting at `offset`.
#[must_use]
pub fn read_bytes32(data: &[u8], offset: usize) -> Option<[u8; 32]> {
    data.get(offset..offset.checked_add(ABI_WORD_SIZE)?)?
        .try_into()
        .ok()
}

/// Encode a `uint64` as a single ABI word.
#[must_use]
pub fn u64_word(value: u64) -> [u8; ABI_WORD_SIZE] {
    let mut word = [0u8; ABI_WORD_SIZE];
    word[U64_PADDING..].copy_from_slice(&value.to_be_bytes());
    word
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::zero(0)]
    #[case::small(100)]
    #[case::max(u64::MAX)]
    fn reads_back_written_words(#[case] value: u64) {
        assert_eq!(read_u64_word(&u64_word(value), 0), Some(value));
    }

    #[test]
    fn rejects_dirty_padding() {
        let mut word = u64_word(7);
        word[0] = 1;
        assert_eq!(read_u64_word(&word, 0), None);
    }

    #[rstest]
    #[case::empty(vec![], 0)]
    #[case::short(vec![0u8; 31], 0)]
    #[case::offset_past_end(vec![0u8; 64], 40)]
    #[case::offset_overflow(vec![0u8; 64], usize::MAX)]
    fn out_of_bounds_reads_fail(#[case] data: Vec<u8>, #[case] offset: usize) {
        assert_eq!(read_u64_word(&data, offset), None);
        assert_eq!(read_bytes32(&data, offset), None);
    }
}
