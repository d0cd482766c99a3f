use hashbrown::HashMap;

use crate::interface::{Leaderboard, Score, ScoreOutOfRange, UserId};


/// Baseline backend keeping every entry in one contiguous sorted sequence.
///
/// Locating an entry is a binary search over `(score, user)` keys, so `rank`
/// is O(log n); `insert` and `delete` shift the tail of the sequence and are
/// O(n). This is the simplest correct implementation of the contract and
/// serves as the oracle the other backends are tested against.
#[derive(Debug, Default, Clone)]
pub struct SortedArrayLeaderboard {
    /// Sorted ascending by `(score, user)`.
    entries: Vec<(Score, UserId)>,
    scores:  HashMap<UserId, Score>,
}

impl SortedArrayLeaderboard {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            scores:  HashMap::new(),
        }
    }
}

impl Leaderboard for SortedArrayLeaderboard {
    fn insert(&mut self, user: UserId, score: Score) -> Result<(), ScoreOutOfRange> {
        if self.scores.contains_key(&user) {
            return self.update(user, score);
        }

        self.scores.insert(user, score);
        let position = match self.entries.binary_search(&(score, user)) {
            // The key is unique, so it can only be absent.
            Ok(position) | Err(position) => position,
        };
        self.entries.insert(position, (score, user));
        Ok(())
    }

    fn update(&mut self, user: UserId, new_score: Score) -> Result<(), ScoreOutOfRange> {
        let Some(&old_score) = self.scores.get(&user) else {
            return self.insert(user, new_score);
        };
        if old_score == new_score {
            return Ok(());
        }

        self.delete(user);
        self.insert(user, new_score)
    }

    fn delete(&mut self, user: UserId) {
        let Some(score) = self.scores.remove(&user) else {
            return;
        };

        if let Ok(position) = self.entries.binary_search(&(score, user)) {
            self.entries.remove(position);
        }
    }

    fn rank(&self, user: UserId) -> Option<usize> {
        let &score = self.scores.get(&user)?;
        self.entries.binary_search(&(score, user)).ok()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
