mod node;

use hashbrown::HashMap;

use crate::interface::{Leaderboard, Score, ScoreOutOfRange, UserId};
use self::node::{Color, Node, NodeId};


/// Order-statistics tree backend: a red-black tree keyed by `(score, user)`
/// where every node also stores the size of its subtree, giving O(log n)
/// worst-case insert, delete, and rank.
///
/// Nodes live in an arena and reference each other by index (slot 0 is the
/// shared black `nil` sentinel); freed slots are recycled through a free
/// list. Rotations transfer the rotated subtree's size to the new subtree
/// root, so the size augmentation survives rebalancing without extra passes.
#[derive(Debug, Clone)]
pub struct OsTreeLeaderboard {
    nodes:  Vec<Node>,
    free:   Vec<NodeId>,
    root:   NodeId,
    scores: HashMap<UserId, Score>,
}

impl Default for OsTreeLeaderboard {
    fn default() -> Self {
        Self::new()
    }
}

impl OsTreeLeaderboard {
    #[must_use]
    pub fn new() -> Self {
        let sentinel = Node {
            user:   0,
            score:  0,
            color:  Color::Black,
            parent: NodeId::NIL,
            left:   NodeId::NIL,
            right:  NodeId::NIL,
            size:   0,
        };
        Self {
            nodes:  vec![sentinel],
            free:   Vec::new(),
            root:   NodeId::NIL,
            scores: HashMap::new(),
        }
    }

    #[inline]
    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    #[inline]
    fn left(&self, id: NodeId) -> NodeId {
        self.node(id).left
    }

    #[inline]
    fn right(&self, id: NodeId) -> NodeId {
        self.node(id).right
    }

    #[inline]
    fn parent(&self, id: NodeId) -> NodeId {
        self.node(id).parent
    }

    #[inline]
    fn color(&self, id: NodeId) -> Color {
        self.node(id).color
    }

    #[inline]
    fn size(&self, id: NodeId) -> u32 {
        self.node(id).size
    }

    fn alloc(&mut self, user: UserId, score: Score) -> NodeId {
        let node = Node {
            user,
            score,
            color:  Color::Red,
            parent: NodeId::NIL,
            left:   NodeId::NIL,
            right:  NodeId::NIL,
            size:   1,
        };
        if let Some(id) = self.free.pop() {
            self.nodes[id.index()] = node;
            id
        } else {
            self.nodes.push(node);
            NodeId::from_index(self.nodes.len() - 1)
        }
    }

    fn release(&mut self, id: NodeId) {
        debug_assert!(!id.is_nil());
        self.free.push(id);
    }

    fn update_size(&mut self, id: NodeId) {
        if !id.is_nil() {
            let size = 1 + self.size(self.left(id)) + self.size(self.right(id));
            self.node_mut(id).size = size;
        }
    }

    fn left_rotate(&mut self, x: NodeId) {
        let y = self.right(x);
        let y_left = self.left(y);

        self.node_mut(x).right = y_left;
        if !y_left.is_nil() {
            self.node_mut(y_left).parent = x;
        }

        let x_parent = self.parent(x);
        self.node_mut(y).parent = x_parent;
        if x_parent.is_nil() {
            self.root = y;
        } else if x == self.left(x_parent) {
            self.node_mut(x_parent).left = y;
        } else {
            self.node_mut(x_parent).right = y;
        }

        self.node_mut(y).left = x;
        self.node_mut(x).parent = y;

        // The subtree as a whole kept its size; only the demoted node needs
        // recomputing.
        let subtree_size = self.size(x);
        self.node_mut(y).size = subtree_size;
        self.update_size(x);
    }

    fn right_rotate(&mut self, y: NodeId) {
        let x = self.left(y);
        let x_right = self.right(x);

        self.node_mut(y).left = x_right;
        if !x_right.is_nil() {
            self.node_mut(x_right).parent = y;
        }

        let y_parent = self.parent(y);
        self.node_mut(x).parent = y_parent;
        if y_parent.is_nil() {
            self.root = x;
        } else if y == self.right(y_parent) {
            self.node_mut(y_parent).right = x;
        } else {
            self.node_mut(y_parent).left = x;
        }

        self.node_mut(x).right = y;
        self.node_mut(y).parent = x;

        let subtree_size = self.size(y);
        self.node_mut(x).size = subtree_size;
        self.update_size(y);
    }

    fn insert_entry(&mut self, user: UserId, score: Score) {
        let key = (score, user);
        let mut parent = NodeId::NIL;
        let mut current = self.root;

        // Every node on the descent gains the new entry in its subtree;
        // rotations in the fixup preserve sizes from here on.
        while !current.is_nil() {
            parent = current;
            self.node_mut(current).size += 1;
            current = if key < self.node(current).key() {
                self.left(current)
            } else {
                self.right(current)
            };
        }

        let z = self.alloc(user, score);
        self.node_mut(z).parent = parent;
        if parent.is_nil() {
            self.root = z;
        } else if key < self.node(parent).key() {
            self.node_mut(parent).left = z;
        } else {
            self.node_mut(parent).right = z;
        }

        self.insert_fixup(z);
    }

    fn insert_fixup(&mut self, mut z: NodeId) {
        while self.color(self.parent(z)) == Color::Red {
            let parent = self.parent(z);
            let grandparent = self.parent(parent);

            if parent == self.left(grandparent) {
                let uncle = self.right(grandparent);
                if self.color(uncle) == Color::Red {
                    self.node_mut(parent).color = Color::Black;
                    self.node_mut(uncle).color = Color::Black;
                    self.node_mut(grandparent).color = Color::Red;
                    z = grandparent;
                } else {
                    if z == self.right(parent) {
                        z = parent;
                        self.left_rotate(z);
                    }
                    let parent = self.parent(z);
                    let grandparent = self.parent(parent);
                    self.node_mut(parent).color = Color::Black;
                    self.node_mut(grandparent).color = Color::Red;
                    self.right_rotate(grandparent);
                }
            } else {
                let uncle = self.left(grandparent);
                if self.color(uncle) == Color::Red {
                    self.node_mut(parent).color = Color::Black;
                    self.node_mut(uncle).color = Color::Black;
                    self.node_mut(grandparent).color = Color::Red;
                    z = grandparent;
                } else {
                    if z == self.left(parent) {
                        z = parent;
                        self.right_rotate(z);
                    }
                    let parent = self.parent(z);
                    let grandparent = self.parent(parent);
                    self.node_mut(parent).color = Color::Black;
                    self.node_mut(grandparent).color = Color::Red;
                    self.left_rotate(grandparent);
                }
            }
        }

        let root = self.root;
        self.node_mut(root).color = Color::Black;
    }

    /// Replace the subtree rooted at `u` with the one rooted at `v`.
    ///
    /// `v`'s parent is written even when `v` is the sentinel; the delete
    /// fixup relies on being able to walk up from it.
    fn transplant(&mut self, u: NodeId, v: NodeId) {
        let u_parent = self.parent(u);
        if u_parent.is_nil() {
            self.root = v;
        } else if u == self.left(u_parent) {
            self.node_mut(u_parent).left = v;
        } else {
            self.node_mut(u_parent).right = v;
        }
        self.node_mut(v).parent = u_parent;
    }

    fn minimum(&self, mut id: NodeId) -> NodeId {
        while !self.left(id).is_nil() {
            id = self.left(id);
        }
        id
    }

    fn find_node(&self, user: UserId, score: Score) -> NodeId {
        let key = (score, user);
        let mut current = self.root;
        while !current.is_nil() {
            let node = self.node(current);
            if node.key() == key {
                return current;
            }
            current = if key < node.key() { node.left } else { node.right };
        }
        NodeId::NIL
    }

    fn delete_entry(&mut self, user: UserId, score: Score) {
        let z = self.find_node(user, score);
        if z.is_nil() {
            return;
        }

        let mut y = z;
        let mut removed_color = self.color(y);
        let x;
        let x_parent;

        if self.left(z).is_nil() {
            x = self.right(z);
            x_parent = self.parent(z);
            self.transplant(z, x);
        } else if self.right(z).is_nil() {
            x = self.left(z);
            x_parent = self.parent(z);
            self.transplant(z, x);
        } else {
            y = self.minimum(self.right(z));
            removed_color = self.color(y);
            x = self.right(y);
            if self.parent(y) == z {
                // x may be the sentinel; the fixup walks up from it.
                self.node_mut(x).parent = y;
                x_parent = y;
            } else {
                x_parent = self.parent(y);
                let y_right = self.right(y);
                self.transplant(y, y_right);
                let z_right = self.right(z);
                self.node_mut(y).right = z_right;
                self.node_mut(z_right).parent = y;
            }
            self.transplant(z, y);
            let z_left = self.left(z);
            self.node_mut(y).left = z_left;
            self.node_mut(z_left).parent = y;
            self.node_mut(y).color = self.color(z);
        }

        // Recompute subtree sizes from the physical splice point up to the
        // root. Rotations performed by the fixup below maintain sizes on
        // their own, as in insert.
        let mut current = x_parent;
        while !current.is_nil() {
            self.update_size(current);
            current = self.parent(current);
        }

        if removed_color == Color::Black {
            self.delete_fixup(x);
        }
        self.release(z);
    }

    fn delete_fixup(&mut self, mut x: NodeId) {
        while x != self.root && self.color(x) == Color::Black {
            let parent = self.parent(x);
            if x == self.left(parent) {
                let mut w = self.right(parent);
                if self.color(w) == Color::Red {
                    self.node_mut(w).color = Color::Black;
                    self.node_mut(parent).color = Color::Red;
                    self.left_rotate(parent);
                    w = self.right(parent);
                }
                if self.color(self.left(w)) == Color::Black
                    && self.color(self.right(w)) == Color::Black
                {
                    self.node_mut(w).color = Color::Red;
                    x = parent;
                } else {
                    if self.color(self.right(w)) == Color::Black {
                        let w_left = self.left(w);
                        self.node_mut(w_left).color = Color::Black;
                        self.node_mut(w).color = Color::Red;
                        self.right_rotate(w);
                        w = self.right(parent);
                    }
                    self.node_mut(w).color = self.color(parent);
                    self.node_mut(parent).color = Color::Black;
                    let w_right = self.right(w);
                    self.node_mut(w_right).color = Color::Black;
                    self.left_rotate(parent);
                    x = self.root;
                }
            } else {
                let mut w = self.left(parent);
                if self.color(w) == Color::Red {
                    self.node_mut(w).color = Color::Black;
                    self.node_mut(parent).color = Color::Red;
                    self.right_rotate(parent);
                    w = self.left(parent);
                }
                if self.color(self.right(w)) == Color::Black
                    && self.color(self.left(w)) == Color::Black
                {
                    self.node_mut(w).color = Color::Red;
                    x = parent;
                } else {
                    if self.color(self.left(w)) == Color::Black {
                        let w_right = self.right(w);
                        self.node_mut(w_right).color = Color::Black;
                        self.node_mut(w).color = Color::Red;
                        self.left_rotate(w);
                        w = self.left(parent);
                    }
                    self.node_mut(w).color = self.color(parent);
                    self.node_mut(parent).color = Color::Black;
                    let w_left = self.left(w);
                    self.node_mut(w_left).color = Color::Black;
                    self.right_rotate(parent);
                    x = self.root;
                }
            }
        }
        self.node_mut(x).color = Color::Black;
    }

    fn rank_of(&self, user: UserId, score: Score) -> Option<usize> {
        let key = (score, user);
        let mut current = self.root;
        let mut rank = 0_usize;
        while !current.is_nil() {
            let node = self.node(current);
            if node.key() == key {
                return Some(rank + self.size(node.left) as usize);
            }
            if key < node.key() {
                current = node.left;
            } else {
                rank += self.size(node.left) as usize + 1;
                current = node.right;
            }
        }
        None
    }
}

impl Leaderboard for OsTreeLeaderboard {
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
        self.size(self.root) as usize
    }
}
