use std::collections::HashSet;

use oorandom::Rand32;

use podium::{Score, UserId};


/// Inclusive score ceiling shared by every benchmarked backend; the bucket
/// array is constructed with exactly this domain.
pub(crate) const MAX_SCORE: Score = 15_000;


/// Deterministic source of synthetic leaderboard traffic.
///
/// User ids are 6-digit integers, unique across the lifetime of the
/// workload; scores are uniform over `0..=MAX_SCORE`.
pub(crate) struct Workload {
    prng:   Rand32,
    issued: HashSet<UserId>,
}

impl Workload {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            prng:   Rand32::new(seed),
            issued: HashSet::new(),
        }
    }

    /// `n` entries whose user ids have never been handed out before.
    pub(crate) fn unique_entries(&mut self, n: usize) -> Vec<(UserId, Score)> {
        let mut entries = Vec::with_capacity(n);
        while entries.len() < n {
            let user = u64::from(self.prng.rand_range(100_000..1_000_000));
            if !self.issued.insert(user) {
                continue;
            }
            entries.push((user, self.random_score()));
        }
        entries
    }

    pub(crate) fn random_score(&mut self) -> Score {
        self.prng.rand_range(0..MAX_SCORE + 1)
    }

    /// `count` distinct elements of `items`, by partial Fisher-Yates over an
    /// index vector.
    ///
    /// # Panics
    /// Panics if `count > items.len()`.
    pub(crate) fn sample<'a, T>(&mut self, items: &'a [T], count: usize) -> Vec<&'a T> {
        assert!(count <= items.len(), "cannot sample {count} of {}", items.len());

        let mut indexes: Vec<usize> = (0..items.len()).collect();
        for position in 0..count {
            let remaining = u32::try_from(indexes.len() - position)
                .expect("sample space exceeded u32");
            let chosen = position + self.prng.rand_range(0..remaining) as usize;
            indexes.swap(position, chosen);
        }

        indexes[..count].iter().map(|&index| &items[index]).collect()
    }
}
