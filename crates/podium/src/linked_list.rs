use hashbrown::HashMap;

use crate::interface::{Leaderboard, Score, ScoreOutOfRange, UserId};


type Link = Option<Box<Node>>;

#[derive(Debug)]
struct Node {
    user:  UserId,
    score: Score,
    next:  Link,
}

impl Node {
    fn key(&self) -> (Score, UserId) {
        (self.score, self.user)
    }
}

/// Baseline backend keeping entries in a sorted singly-linked chain.
///
/// There is no random access, so `insert`, `delete`, and `rank` all walk the
/// chain from the head: O(n) each. The membership map only makes existence
/// checks O(1). Included to characterize the cost of forgoing an index;
/// drivers should bound the population accordingly.
#[derive(Debug, Default)]
pub struct LinkedListLeaderboard {
    head:   Link,
    len:    usize,
    scores: HashMap<UserId, Score>,
}

impl LinkedListLeaderboard {
    #[must_use]
    pub fn new() -> Self {
        Self {
            head:   None,
            len:    0,
            scores: HashMap::new(),
        }
    }

    /// The first link whose node's key is `>= key`, or the trailing `None`.
    fn link_at(&mut self, key: (Score, UserId)) -> &mut Link {
        let mut cursor = &mut self.head;
        while cursor.as_ref().is_some_and(|node| node.key() < key) {
            // The is_some_and guard makes this unwrap infallible.
            cursor = &mut cursor.as_mut().unwrap().next;
        }
        cursor
    }
}

impl Leaderboard for LinkedListLeaderboard {
    fn insert(&mut self, user: UserId, score: Score) -> Result<(), ScoreOutOfRange> {
        if self.scores.contains_key(&user) {
            return self.update(user, score);
        }

        self.scores.insert(user, score);
        let cursor = self.link_at((score, user));
        let next = cursor.take();
        *cursor = Some(Box::new(Node { user, score, next }));
        self.len += 1;
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

        let cursor = self.link_at((score, user));
        if cursor.as_ref().is_some_and(|node| node.key() == (score, user)) {
            let node = cursor.take().unwrap();
            *cursor = node.next;
            self.len -= 1;
        }
    }

    fn rank(&self, user: UserId) -> Option<usize> {
        let &score = self.scores.get(&user)?;

        let mut cursor = self.head.as_deref();
        let mut index = 0;
        while let Some(node) = cursor {
            if node.key() == (score, user) {
                return Some(index);
            }
            cursor = node.next.as_deref();
            index += 1;
        }
        None
    }

    fn len(&self) -> usize {
        self.len
    }
}

impl Drop for LinkedListLeaderboard {
    fn drop(&mut self) {
        // Unlink iteratively; dropping a long chain recursively could
        // overflow the stack.
        let mut head = self.head.take();
        while let Some(mut node) = head {
            head = node.next.take();
        }
    }
}
