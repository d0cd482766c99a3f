use crate::interface::{Score, UserId};


/// Index of a node in the tree's arena.
///
/// Index 0 is reserved for the shared `nil` sentinel, so a freshly
/// constructed tree always holds one slot. Using indexes instead of
/// references keeps the parent/child/sentinel graph (which is cyclic) out of
/// the ownership model entirely; rotations and transplants are plain index
/// writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub(super) struct NodeId(u32);

impl NodeId {
    /// The sentinel leaf. Black, size 0, and freely re-parented during
    /// splices.
    pub(super) const NIL: Self = Self(0);

    #[inline]
    pub(super) fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).expect("tree arena exceeded u32 indexes"))
    }

    #[inline]
    pub(super) const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(super) const fn is_nil(self) -> bool {
        self.0 == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Color {
    Red,
    Black,
}

#[derive(Debug, Clone)]
pub(super) struct Node {
    pub(super) user:   UserId,
    pub(super) score:  Score,
    pub(super) color:  Color,
    pub(super) parent: NodeId,
    pub(super) left:   NodeId,
    pub(super) right:  NodeId,
    /// Nodes in the subtree rooted here, including this one.
    pub(super) size:   u32,
}

impl Node {
    pub(super) fn key(&self) -> (Score, UserId) {
        (self.score, self.user)
    }
}
