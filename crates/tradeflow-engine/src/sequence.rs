//! Monotonic id sequences.

use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out 1-based sequence numbers for one entity kind.
///
/// Seeded from the highest stored sequence number, so a gap left by a
/// failed write is never filled by a later id.
#[derive(Debug)]
pub(crate) struct IdSequence {
    last: AtomicU64,
}

impl IdSequence {
    pub(crate) fn starting_after(last: u64) -> Self {
        Self {
            last: AtomicU64::new(last),
        }
    }

    pub(crate) fn next(&self) -> u64 {
        self.last.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// Highest sequence among stored ids; zero for an empty table.
pub(crate) fn last_sequence(sequences: impl IntoIterator<Item = Option<u64>>) -> u64 {
    sequences.into_iter().flatten().max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_continues_after_seed() {
        let seq = IdSequence::starting_after(3);
        assert_eq!(seq.next(), 4);
        assert_eq!(seq.next(), 5);
    }

    #[test]
    fn test_seed_skips_gaps_and_foreign_ids() {
        let seq = IdSequence::starting_after(last_sequence([Some(1), None, Some(7), Some(3)]));
        assert_eq!(seq.next(), 8);
        assert_eq!(last_sequence(std::iter::empty()), 0);
    }
}
