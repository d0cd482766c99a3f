use hashbrown::HashMap;

use crate::interface::{Leaderboard, Score, ScoreOutOfRange, TopK, UserId};


/// Score-bucket backend: one growable bucket of user ids per possible score
/// in a fixed domain `0..=max_score`, declared at construction.
///
/// Mutations are O(1) — removal swaps the bucket's last user into the freed
/// slot and truncates, at the cost of not preserving insertion order within
/// a bucket. Rank and [`top_k`](TopK::top_k) scan the whole domain, and the
/// buckets occupy domain-sized memory regardless of population, so this
/// backend only pays off when the score domain is small and bounded.
///
/// Two deliberate deviations from the other backends, kept as observed in
/// the system this was modeled on:
///
/// - [`rank`](Leaderboard::rank) counts **descending**: rank 0 is the
///   *highest* score, computed as the number of users in strictly-higher
///   buckets plus the user's in-bucket position.
/// - Ties within a score are ordered by insertion/swap history, not by user
///   id.
#[derive(Debug, Clone)]
pub struct BucketArrayLeaderboard {
    /// `buckets[score]` holds every user currently at `score`.
    buckets:   Vec<Vec<UserId>>,
    scores:    HashMap<UserId, Score>,
    /// Index of each user within its current bucket; kept exact across
    /// swap-and-pop removals.
    positions: HashMap<UserId, usize>,
    max_score: Score,
}

impl BucketArrayLeaderboard {
    /// A leaderboard accepting scores in `0..=max_score`.
    #[must_use]
    pub fn new(max_score: Score) -> Self {
        Self {
            buckets:   vec![Vec::new(); max_score as usize + 1],
            scores:    HashMap::new(),
            positions: HashMap::new(),
            max_score,
        }
    }

    /// The inclusive upper bound of the declared score domain.
    #[must_use]
    pub fn max_score(&self) -> Score {
        self.max_score
    }

    fn check_domain(&self, score: Score) -> Result<(), ScoreOutOfRange> {
        if score > self.max_score {
            return Err(ScoreOutOfRange { score, max_score: self.max_score });
        }
        Ok(())
    }

    /// Remove `user` from `buckets[score]` by swapping the last user into
    /// its slot.
    fn remove_from_bucket(&mut self, user: UserId, score: Score) {
        let index = self.positions[&user];
        let bucket = &mut self.buckets[score as usize];

        let moved = bucket.swap_remove(index);
        if moved != user {
            // The former last user now sits at the freed slot.
            self.positions.insert(moved, index);
        }
    }

    fn push_to_bucket(&mut self, user: UserId, score: Score) {
        let bucket = &mut self.buckets[score as usize];
        bucket.push(user);
        self.positions.insert(user, bucket.len() - 1);
    }
}

impl Leaderboard for BucketArrayLeaderboard {
    fn insert(&mut self, user: UserId, score: Score) -> Result<(), ScoreOutOfRange> {
        if self.scores.contains_key(&user) {
            return self.update(user, score);
        }

        self.check_domain(score)?;
        self.push_to_bucket(user, score);
        self.scores.insert(user, score);
        Ok(())
    }

    fn update(&mut self, user: UserId, new_score: Score) -> Result<(), ScoreOutOfRange> {
        self.check_domain(new_score)?;

        let Some(&old_score) = self.scores.get(&user) else {
            return self.insert(user, new_score);
        };
        if old_score == new_score {
            return Ok(());
        }

        self.remove_from_bucket(user, old_score);
        self.push_to_bucket(user, new_score);
        self.scores.insert(user, new_score);
        Ok(())
    }

    fn delete(&mut self, user: UserId) {
        let Some(score) = self.scores.remove(&user) else {
            return;
        };

        self.remove_from_bucket(user, score);
        self.positions.remove(&user);
    }

    /// Descending rank: the number of users with a strictly higher score,
    /// plus this user's position within its own bucket.
    fn rank(&self, user: UserId) -> Option<usize> {
        let &score = self.scores.get(&user)?;

        let higher: usize = self.buckets[score as usize + 1..]
            .iter()
            .map(Vec::len)
            .sum();
        Some(higher + self.positions[&user])
    }

    fn len(&self) -> usize {
        self.scores.len()
    }
}

impl TopK for BucketArrayLeaderboard {
    fn top_k(&self, k: usize) -> Vec<(UserId, Score)> {
        let mut entries = Vec::with_capacity(k.min(self.scores.len()));

        for score in (0..=self.max_score).rev() {
            for &user in &self.buckets[score as usize] {
                if entries.len() == k {
                    return entries;
                }
                entries.push((user, score));
            }
        }
        entries
    }
}
