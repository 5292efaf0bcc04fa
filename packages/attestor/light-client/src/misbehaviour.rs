//! Misbehaviour detection: two quorum-signed timestamps for one height

use crate::{
    attestation::{StateAttestation, NANOS_PER_SECOND},
    consensus_state::ConsensusState,
};

/// Whether applying `attestation` would contradict the consensus state
/// already trusted at its height.
///
/// Timestamps are compared in whole seconds, the precision attestations are
/// signed at, so a genesis timestamp with a sub-second part still matches.
/// A height with no stored consensus state can never be misbehaviour.
#[must_use]
pub fn check_for_misbehaviour(
    existing: Option<&ConsensusState>,
    attestation: &StateAttestation,
) -> bool {
    existing.is_some_and(|trusted| {
        trusted.timestamp / NANOS_PER_SECOND != attestation.timestamp / NANOS_PER_SECOND
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::empty_height(None, false)]
    #[case::same_timestamp(Some(ConsensusState::new(2_000_000_000)), false)]
    #[case::sub_second_trusted_timestamp(Some(ConsensusState::new(2_500_000_000)), false)]
    #[case::conflicting_timestamp(Some(ConsensusState::new(3_000_000_000)), true)]
    #[case::conflicting_by_one_second(Some(ConsensusState::new(1_999_999_999)), true)]
    fn detects_conflicts(#[case] existing: Option<ConsensusState>, #[case] expected: bool) {
        let attestation = StateAttestation::new(200, 2_000_000_000);
        assert_eq!(
            check_for_misbehaviour(existing.as_ref(), &attestation),
            expected
        );
    }
}
