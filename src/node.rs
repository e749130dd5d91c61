//! Search-tree node: one ply of the game.
//!
//! A node owns a grid snapshot and the color to move next from it, augmented
//! with the search statistics (visit count, accumulated score) and the tree
//! linkage (parent index, child indices, untried candidate list) that the
//! engine mutates during a search. After construction the snapshot and the
//! turn are never touched again; only the statistics and linkage change.

use crate::board::{Board, Move, OccupiedCell, Outcome, Player};

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel for "no node"; the root's parent.
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    #[inline]
    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// Which color a rollout outcome credits at each node on the path.
///
/// The two conventions differ in who a node's statistics speak for. Under
/// `LastMover` a node is credited when the rollout winner is the color that
/// moved *into* it, which makes a child's Q/N mean "value to the player
/// choosing it" in the parent's UCB1 comparison. `NextMover` is the dual,
/// crediting the color whose turn it is at the node.
///
/// `LastMover` is the validated default: it is the convention under which
/// the engine takes an open four immediately and beats random play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RewardPerspective {
    #[default]
    LastMover,
    NextMover,
}

/// A node in the search tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node index ([`NodeId::NONE`] for the root).
    pub parent: NodeId,
    /// Move that produced this node from its parent; `None` for the root.
    pub mv: Option<Move>,
    /// Grid snapshot after `mv` was applied.
    pub board: Board,
    /// Color to move next from this position.
    pub to_move: Player,
    /// Terminal status. A terminal node is never expanded.
    pub outcome: Option<Outcome>,
    /// Visit count N.
    pub visits: u32,
    /// Accumulated score Q.
    pub score: f64,
    /// Candidate moves not yet expanded into children.
    pub untried: Vec<Move>,
    /// Expanded children, in expansion order.
    pub children: Vec<NodeId>,
}

impl Node {
    /// Root node over an externally supplied position.
    ///
    /// Win detection needs the last placement, which the root does not have,
    /// so callers must not start a search from an already-won position. A
    /// position with no candidate cell left is marked drawn here, which is
    /// how the engine rejects a full board up front.
    pub fn root(board: Board, to_move: Player) -> Self {
        let untried = board.candidate_moves();
        let outcome = untried.is_empty().then_some(Outcome::Draw);
        Node {
            parent: NodeId::NONE,
            mv: None,
            board,
            to_move,
            outcome,
            visits: 0,
            score: 0.0,
            untried,
            children: Vec::new(),
        }
    }

    /// Child node: applies `mv` under the *parent's* mover, flips the turn,
    /// and recomputes terminal status and the candidate set.
    ///
    /// An occupied target cell is a bookkeeping error and is rejected.
    pub fn from_move(parent: &Node, parent_id: NodeId, mv: Move) -> Result<Self, OccupiedCell> {
        let mover = parent.to_move;
        let mut board = parent.board.clone();
        board.place(mv, mover)?;
        let mut outcome = board.check_win(mv.0, mv.1).map(Outcome::Win);
        let untried = if outcome.is_some() {
            Vec::new()
        } else {
            board.candidate_moves()
        };
        if outcome.is_none() && untried.is_empty() {
            outcome = Some(Outcome::Draw);
        }
        Ok(Node {
            parent: parent_id,
            mv: Some(mv),
            board,
            to_move: mover.opponent(),
            outcome,
            visits: 0,
            score: 0.0,
            untried,
            children: Vec::new(),
        })
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// Mean value Q / N. Zero before the first visit.
    #[inline]
    pub fn mean_value(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.score / f64::from(self.visits)
        }
    }

    /// UCB1 score for selection: `Q/N + c * sqrt(ln N_parent / N)`.
    ///
    /// Every child is rolled out immediately upon creation, so the visit
    /// count is positive whenever selection compares children.
    #[inline]
    pub fn ucb1(&self, parent_visits_ln: f64, exploration: f64) -> f64 {
        debug_assert!(self.visits > 0, "UCB1 evaluated on an unvisited child");
        let visits = f64::from(self.visits);
        self.score / visits + exploration * (parent_visits_ln / visits).sqrt()
    }

    /// Score adjustment this node receives when a rollout from below it ends
    /// in `outcome`: zero on a draw, otherwise plus or minus one under the
    /// configured perspective.
    pub fn reward_for(&self, outcome: Outcome, perspective: RewardPerspective) -> f64 {
        match outcome {
            Outcome::Draw => 0.0,
            Outcome::Win(winner) => {
                let next_mover_won = winner == self.to_move;
                match perspective {
                    RewardPerspective::LastMover => {
                        if next_mover_won {
                            -1.0
                        } else {
                            1.0
                        }
                    }
                    RewardPerspective::NextMover => {
                        if next_mover_won {
                            1.0
                        } else {
                            -1.0
                        }
                    }
                }
            }
        }
    }
}
