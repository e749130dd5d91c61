//! Search tree with arena allocation.
//!
//! Nodes live in a contiguous `Vec` and refer to each other by [`NodeId`]
//! indices, so parent back-references need no shared ownership and the whole
//! tree is dropped in one piece when a decision is returned. The arena only
//! grows: one node per expansion, never removed mid-search.

use crate::board::{Move, OccupiedCell, Outcome};
use crate::node::{Node, NodeId, RewardPerspective};

/// Arena-backed search tree.
#[derive(Debug)]
pub struct SearchTree {
    /// Arena storing all nodes.
    nodes: Vec<Node>,
    /// Root node index (always 0 after construction).
    root: NodeId,
}

impl SearchTree {
    /// Creates a tree holding just the given root.
    pub fn new(root: Node) -> Self {
        SearchTree {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    /// The root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// A reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    /// A mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    /// Total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True only before construction completes, i.e. never.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Expansion: pops one untried move from `parent`, builds the child
    /// position, allocates it, and links it as the newest child.
    ///
    /// Returns `None` when the parent has no untried move left. Each move is
    /// expanded at most once per node; removal from the untried list is what
    /// enforces that.
    pub fn expand_next(&mut self, parent: NodeId) -> Option<Result<NodeId, OccupiedCell>> {
        let mv = self.get_mut(parent).untried.pop()?;
        Some(self.attach(parent, mv))
    }

    fn attach(&mut self, parent: NodeId, mv: Move) -> Result<NodeId, OccupiedCell> {
        let child = Node::from_move(self.get(parent), parent, mv)?;
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(child);
        self.get_mut(parent).children.push(id);
        Ok(id)
    }

    /// Backpropagation: walks from `from` to the root inclusive, giving every
    /// node on the path one visit and the outcome's reward as seen from that
    /// node's position.
    pub fn backpropagate(
        &mut self,
        from: NodeId,
        outcome: Outcome,
        perspective: RewardPerspective,
    ) {
        let mut current = from;
        while current.is_some() {
            let node = self.get_mut(current);
            let reward = node.reward_for(outcome, perspective);
            node.visits += 1;
            node.score += reward;
            current = node.parent;
        }
    }
}
