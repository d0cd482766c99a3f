use thiserror::Error;


/// Stable identity key of a leaderboard entry. At most one active entry
/// exists per user.
pub type UserId = u64;

/// A user's current score. Mutable through [`Leaderboard::update`].
pub type Score = u32;


/// A score was rejected because it falls outside the backend's declared
/// domain.
///
/// Only backends constructed with a bounded score domain (currently
/// [`BucketArrayLeaderboard`]) ever return this; the others accept any
/// [`Score`] and always succeed.
///
/// [`BucketArrayLeaderboard`]: crate::BucketArrayLeaderboard
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("score {score} is outside the declared domain 0..={max_score}")]
pub struct ScoreOutOfRange {
    pub score:     Score,
    pub max_score: Score,
}


/// A dynamic set of `(user, score)` entries with rank lookup.
///
/// Entries are totally ordered by `(score, user)` ascending: rank 0 is the
/// lowest score, and among equal scores the lowest user id ranks first.
/// (One implementation deviates — see [`BucketArrayLeaderboard`].)
///
/// After any sequence of mutations, [`rank`] reflects the full ordering of
/// all currently-active entries and [`len`] equals the number of distinct
/// active users.
///
/// [`rank`]: Leaderboard::rank
/// [`len`]: Leaderboard::len
/// [`BucketArrayLeaderboard`]: crate::BucketArrayLeaderboard
pub trait Leaderboard {
    /// Add an entry for `user`. If `user` already has an entry, this behaves
    /// as [`update`](Leaderboard::update).
    ///
    /// # Errors
    /// Returns [`ScoreOutOfRange`] if the backend declares a score domain and
    /// `score` falls outside it. No state changes in that case.
    fn insert(&mut self, user: UserId, score: Score) -> Result<(), ScoreOutOfRange>;

    /// Reposition `user`'s entry at `new_score`. A no-op if the entry already
    /// has that score; behaves as [`insert`](Leaderboard::insert) if `user`
    /// is unknown.
    ///
    /// # Errors
    /// Returns [`ScoreOutOfRange`] under the same condition as
    /// [`insert`](Leaderboard::insert).
    fn update(&mut self, user: UserId, new_score: Score) -> Result<(), ScoreOutOfRange>;

    /// Remove `user`'s entry. Deleting an absent user is a no-op, not an
    /// error.
    fn delete(&mut self, user: UserId);

    /// The 0-based rank of `user`'s entry, or `None` if the user is absent.
    ///
    /// Absence is reported by value; `Some(0)` always means "present, ranked
    /// first".
    #[must_use]
    fn rank(&self, user: UserId) -> Option<usize>;

    /// The number of active entries.
    #[must_use]
    fn len(&self) -> usize;

    /// Whether the leaderboard holds no entries.
    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Retrieval of the highest-scored entries, for backends that can do better
/// than a full sort.
pub trait TopK: Leaderboard {
    /// Up to `k` entries with the highest scores, highest first. Returns all
    /// entries if `k >= len()`.
    ///
    /// The order among equal scores is backend-defined.
    #[must_use]
    fn top_k(&self, k: usize) -> Vec<(UserId, Score)>;
}
