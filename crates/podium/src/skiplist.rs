use hashbrown::HashMap;
use oorandom::Rand32;

use crate::interface::{Leaderboard, Score, ScoreOutOfRange, TopK, UserId};


/// The maximum level of a node; levels run `0..=MAX_LEVEL`.
///
/// With promotion probability 1/2, one node in roughly 65 000 reaches the
/// cap, comfortably above the populations this crate is exercised with.
const MAX_LEVEL: usize = 16;

/// Arena index of the head node.
const HEAD: u32 = 0;

/// Sentinel for "no node" in a forward pointer.
const NONE: u32 = u32::MAX;

const DEFAULT_SEED: u64 = 0x5DEECE66D;


#[derive(Debug, Clone, Copy)]
struct Level {
    next: u32,
    /// Number of level-0 nodes this pointer skips over; toward the tail it
    /// is the number of nodes strictly after the owner.
    span: usize,
}

#[derive(Debug, Clone)]
struct SkipNode {
    user:   UserId,
    score:  Score,
    /// One entry per level the node participates in, sized to its drawn
    /// height. Owned inline rather than a list-of-lists.
    levels: Vec<Level>,
}

impl SkipNode {
    fn key(&self) -> (Score, UserId) {
        (self.score, self.user)
    }
}

/// Order-statistics skip list backend: a leveled list whose forward pointers
/// each carry a span, giving expected O(log n) insert, delete, and rank
/// without a worst-case guarantee (node levels are randomized).
///
/// Nodes live in an arena and reference each other by index; freed slots are
/// recycled. Node levels are drawn geometrically (promotion probability 1/2,
/// capped at [`MAX_LEVEL`]) from a seedable PRNG, so a list built from a
/// known seed is fully deterministic.
#[derive(Debug, Clone)]
pub struct SkiplistLeaderboard {
    /// `nodes[0]` is the head, which holds every level and no entry.
    nodes:  Vec<SkipNode>,
    free:   Vec<u32>,
    /// Highest level any current node participates in.
    level:  usize,
    len:    usize,
    scores: HashMap<UserId, Score>,
    prng:   Rand32,
}

impl Default for SkiplistLeaderboard {
    fn default() -> Self {
        Self::new()
    }
}

impl SkiplistLeaderboard {
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// A list whose level draws are determined by `seed`.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        let head = SkipNode {
            user:   0,
            score:  0,
            levels: vec![Level { next: NONE, span: 0 }; MAX_LEVEL + 1],
        };
        Self {
            nodes:  vec![head],
            free:   Vec::new(),
            level:  0,
            len:    0,
            scores: HashMap::new(),
            prng:   Rand32::new(seed),
        }
    }

    /// Random level in `0..=MAX_LEVEL`, geometrically distributed: each
    /// promotion happens with probability 1/2.
    fn random_level(&mut self) -> usize {
        let mut level = 0;
        while level < MAX_LEVEL && self.prng.rand_u32() % 2 == 0 {
            level += 1;
        }
        level
    }

    #[inline]
    fn node(&self, index: u32) -> &SkipNode {
        &self.nodes[index as usize]
    }

    #[inline]
    fn node_mut(&mut self, index: u32) -> &mut SkipNode {
        &mut self.nodes[index as usize]
    }

    fn alloc(&mut self, user: UserId, score: Score, height: usize) -> u32 {
        let node = SkipNode {
            user,
            score,
            levels: vec![Level { next: NONE, span: 0 }; height + 1],
        };
        if let Some(index) = self.free.pop() {
            self.nodes[index as usize] = node;
            index
        } else {
            let index = u32::try_from(self.nodes.len()).expect("skiplist arena exceeded u32 indexes");
            assert!(index != NONE, "skiplist arena exceeded u32 indexes");
            self.nodes.push(node);
            index
        }
    }

    fn insert_entry(&mut self, user: UserId, score: Score) {
        let key = (score, user);
        let mut update = [HEAD; MAX_LEVEL + 1];
        let mut rank = [0_usize; MAX_LEVEL + 1];

        let mut x = HEAD;
        for i in (0..=self.level).rev() {
            rank[i] = if i == self.level { 0 } else { rank[i + 1] };
            loop {
                let Level { next, span } = self.node(x).levels[i];
                if next != NONE && self.node(next).key() < key {
                    rank[i] += span;
                    x = next;
                } else {
                    break;
                }
            }
            update[i] = x;
        }

        let height = self.random_level();
        if height > self.level {
            for i in (self.level + 1)..=height {
                rank[i] = 0;
                update[i] = HEAD;
                self.node_mut(HEAD).levels[i].span = self.len;
            }
            self.level = height;
        }

        let new_node = self.alloc(user, score, height);
        for i in 0..=height {
            // Level-0 distance already covered between update[i] and the
            // insertion point.
            let advanced = rank[0] - rank[i];
            let Level { next, span } = self.node(update[i]).levels[i];
            debug_assert!(span >= advanced, "span bookkeeping lost a node");
            self.node_mut(new_node).levels[i] = Level { next, span: span - advanced };
            self.node_mut(update[i]).levels[i] = Level { next: new_node, span: advanced + 1 };
        }

        // Pointers passing over the new node at higher levels now skip one
        // more level-0 node.
        for i in (height + 1)..=self.level {
            self.node_mut(update[i]).levels[i].span += 1;
        }

        self.len += 1;
    }

    fn delete_entry(&mut self, user: UserId, score: Score) {
        let key = (score, user);
        let mut update = [HEAD; MAX_LEVEL + 1];

        let mut x = HEAD;
        for i in (0..=self.level).rev() {
            loop {
                let Level { next, .. } = self.node(x).levels[i];
                if next != NONE && self.node(next).key() < key {
                    x = next;
                } else {
                    break;
                }
            }
            update[i] = x;
        }

        let doomed = self.node(x).levels[0].next;
        if doomed == NONE || self.node(doomed).key() != key {
            return;
        }

        for i in 0..=self.level {
            let Level { next, span } = self.node(update[i]).levels[i];
            if next == doomed {
                let doomed_level = self.node(doomed).levels[i];
                self.node_mut(update[i]).levels[i] = Level {
                    next: doomed_level.next,
                    span: span + doomed_level.span - 1,
                };
            } else {
                // The pointer passes over the removed node's position.
                self.node_mut(update[i]).levels[i].span = span - 1;
            }
        }

        while self.level > 0 && self.node(HEAD).levels[self.level].next == NONE {
            self.level -= 1;
        }

        self.free.push(doomed);
        self.len -= 1;
    }

    fn rank_of(&self, user: UserId, score: Score) -> Option<usize> {
        let key = (score, user);
        let mut rank = 0_usize;

        let mut x = HEAD;
        for i in (0..=self.level).rev() {
            loop {
                let Level { next, span } = self.node(x).levels[i];
                if next != NONE && self.node(next).key() < key {
                    rank += span;
                    x = next;
                } else {
                    break;
                }
            }
        }

        let found = self.node(x).levels[0].next;
        if found != NONE && self.node(found).key() == key {
            Some(rank)
        } else {
            None
        }
    }
}

impl Leaderboard for SkiplistLeaderboard {
    fn insert(&mut self, user: UserId, score: Score) -> Result<(), ScoreOutOfRange> {
        if self.scores.contains_key(&user) {
            return self.update(user, score);
        }

        self.scores.insert(user, score);
        self.insert_entry(user, score);
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
        self.delete_entry(user, score);
    }

    fn rank(&self, user: UserId) -> Option<usize> {
        let &score = self.scores.get(&user)?;
        self.rank_of(user, score)
    }

    fn len(&self) -> usize {
        self.len
    }
}

impl TopK for SkiplistLeaderboard {
    fn top_k(&self, k: usize) -> Vec<(UserId, Score)> {
        let mut entries = Vec::with_capacity(self.len);
        let mut x = self.node(HEAD).levels[0].next;
        while x != NONE {
            let node = self.node(x);
            entries.push((node.user, node.score));
            x = node.levels[0].next;
        }

        entries.iter().rev().take(k).copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use super::*;

    impl SkiplistLeaderboard {
        /// Check the ordering of level 0 and the span algebra of every
        /// forward pointer against the actual level-0 positions.
        fn check_invariants(&self) {
            // Position of each live node, with the head at 0 and the j-th
            // real node at j + 1.
            let mut position = HashMap::new();
            position.insert(HEAD, 0_usize);

            let mut live = vec![HEAD];
            let mut previous_key = None;
            let mut x = self.node(HEAD).levels[0].next;
            while x != NONE {
                let node = self.node(x);
                if let Some(previous) = previous_key {
                    assert!(previous < node.key(), "level 0 out of order");
                }
                previous_key = Some(node.key());
                position.insert(x, live.len());
                live.push(x);
                x = node.levels[0].next;
            }
            assert_eq!(live.len() - 1, self.len, "len does not match level-0 walk");

            for &index in &live {
                let node = self.node(index);
                let levels = if index == HEAD {
                    // The head holds all levels, but only those up to the
                    // current list level are maintained.
                    &node.levels[..=self.level]
                } else {
                    assert!(node.levels.len() <= self.level + 1, "node taller than the list");
                    &node.levels[..]
                };

                for (i, level) in levels.iter().enumerate() {
                    if level.next == NONE {
                        assert_eq!(
                            position[&index] + level.span,
                            self.len,
                            "tail span at level {i} inconsistent",
                        );
                    } else {
                        let next = self.node(level.next);
                        assert!(next.levels.len() > i, "forward pointer to a shorter node");
                        assert_eq!(
                            position[&index] + level.span,
                            position[&level.next],
                            "span at level {i} does not match level-0 distance",
                        );
                    }
                }
            }
        }
    }

    fn expected_rank(model: &BTreeSet<(Score, UserId)>, key: (Score, UserId)) -> Option<usize> {
        model.iter().position(|&entry| entry == key)
    }

    #[derive(Debug, Clone)]
    enum Op {
        Insert(UserId, Score),
        Update(UserId, Score),
        Delete(UserId),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        let user = 0_u64..32;
        let score = 0_u32..100;
        prop_oneof![
            3 => (user.clone(), score.clone()).prop_map(|(u, s)| Op::Insert(u, s)),
            2 => (user.clone(), score).prop_map(|(u, s)| Op::Update(u, s)),
            1 => user.prop_map(Op::Delete),
        ]
    }

    proptest! {
        #[test]
        fn spans_hold_under_arbitrary_operations(
            seed in 0_u64..1024,
            ops in prop::collection::vec(op_strategy(), 0..400),
        ) {
            let mut list = SkiplistLeaderboard::with_seed(seed);
            let mut model: BTreeSet<(Score, UserId)> = BTreeSet::new();
            let mut scores: HashMap<UserId, Score> = HashMap::new();

            for op in ops {
                match op {
                    Op::Insert(user, score) => {
                        list.insert(user, score).unwrap();
                        if let Some(old) = scores.insert(user, score) {
                            model.remove(&(old, user));
                        }
                        model.insert((score, user));
                    }
                    Op::Update(user, score) => {
                        list.update(user, score).unwrap();
                        if let Some(old) = scores.insert(user, score) {
                            model.remove(&(old, user));
                        }
                        model.insert((score, user));
                    }
                    Op::Delete(user) => {
                        list.delete(user);
                        if let Some(old) = scores.remove(&user) {
                            model.remove(&(old, user));
                        }
                    }
                }

                list.check_invariants();
                prop_assert_eq!(list.len(), model.len());
                for (&user, &score) in &scores {
                    prop_assert_eq!(list.rank(user), expected_rank(&model, (score, user)));
                }
            }
        }
    }

    #[test]
    fn level_shrinks_back_down() {
        let mut list = SkiplistLeaderboard::with_seed(7);
        for user in 0..512_u64 {
            list.insert(user, 10).unwrap();
        }
        assert!(list.level > 0);

        for user in 0..512_u64 {
            list.delete(user);
        }
        assert_eq!(list.level, 0);
        assert!(list.is_empty());
        list.check_invariants();
    }

    #[test]
    fn top_k_returns_highest_scores_first() {
        let mut list = SkiplistLeaderboard::with_seed(42);
        for (user, score) in [(1, 30), (2, 10), (3, 50), (4, 40), (5, 20)] {
            list.insert(user, score).unwrap();
        }

        assert_eq!(list.top_k(3), vec![(3, 50), (4, 40), (1, 30)]);
        assert_eq!(list.top_k(0), vec![]);
        // Requests beyond the population return everything.
        assert_eq!(list.top_k(10).len(), 5);
        assert_eq!(list.top_k(10)[4], (2, 10));
    }
}
