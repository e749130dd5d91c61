//! # Search Engine
//!
//! The four-phase Monte Carlo Tree Search loop over [`SearchTree`]:
//!
//! 1. **Selection**: descend from the root through UCB1-best children until
//!    reaching a node that still has untried moves (or a terminal node).
//! 2. **Expansion**: pop one untried move and materialize it as a new child,
//!    one per iteration, so the frontier grows breadth-first.
//! 3. **Simulation**: play the new position out with uniformly-random
//!    candidate moves to a win or draw, on a disposable grid copy.
//! 4. **Backpropagation**: walk the parent chain to the root, incrementing
//!    every visit count and crediting the outcome per the configured
//!    reward perspective.
//!
//! After the iteration budget is spent, the decision is the root child with
//! the best average score Q/N.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use thiserror::Error;
use tracing::{debug, trace};

use crate::board::{Board, Move, OccupiedCell, Outcome, Player};
use crate::node::{Node, NodeId, RewardPerspective};
use crate::rollout;
use crate::tree::SearchTree;

/// Canonical iteration budget per decision.
pub const DEFAULT_BUDGET: u32 = 1600;

/// Canonical UCB1 exploration constant.
pub const DEFAULT_EXPLORATION: f64 = 2.0;

/// Errors that can occur during a search.
///
/// All of them are internal-invariant violations or caller precondition
/// failures; the engine never degrades into a partial result.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Untried-list bookkeeping produced a move onto an occupied cell.
    #[error(transparent)]
    InvalidMove(#[from] OccupiedCell),

    /// A fully-expanded, non-terminal node had no children to descend into.
    #[error("fully expanded node has no children")]
    NoChildren,

    /// The search was invoked on a position that is already finished.
    /// Callers must check terminal status before asking for a move.
    #[error("search invoked on a terminal position")]
    TerminalPosition,
}

/// Search configuration.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Iterations per decision.
    pub iterations: u32,

    /// UCB1 exploration constant.
    pub exploration: f64,

    /// Independent rollouts per selected leaf. The canonical value is 1;
    /// larger values fan the simulation phase out on a thread pool while
    /// tree mutation stays on the search thread.
    pub rollouts_per_leaf: usize,

    /// Reward-sign convention used during backpropagation.
    pub reward: RewardPerspective,

    /// Seed for the rollout random source. `None` seeds from entropy;
    /// a fixed seed makes the whole search reproducible.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            iterations: DEFAULT_BUDGET,
            exploration: DEFAULT_EXPLORATION,
            rollouts_per_leaf: 1,
            reward: RewardPerspective::default(),
            seed: None,
        }
    }
}

impl SearchConfig {
    /// A fast, seeded configuration for tests.
    pub fn for_testing() -> Self {
        SearchConfig {
            iterations: 256,
            seed: Some(42),
            ..SearchConfig::default()
        }
    }

    /// Builder pattern: set the iteration budget.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Builder pattern: set the exploration constant.
    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    /// Builder pattern: set the rollout fan-out per leaf.
    pub fn with_rollouts_per_leaf(mut self, rollouts: usize) -> Self {
        self.rollouts_per_leaf = rollouts;
        self
    }

    /// Builder pattern: set the reward perspective.
    pub fn with_reward(mut self, reward: RewardPerspective) -> Self {
        self.reward = reward;
        self
    }

    /// Builder pattern: set the rollout seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// The search engine. Owns the rollout random source and, when leaf-parallel
/// rollouts are configured, the thread pool they run on.
///
/// The tree itself is per-decision: built fresh in [`Mcts::uct_search`] and
/// dropped when the move is returned.
pub struct Mcts {
    config: SearchConfig,
    rng: Xoshiro256StarStar,
    pool: Option<ThreadPool>,
}

impl Mcts {
    /// Creates an engine for the given configuration.
    pub fn new(config: SearchConfig) -> Self {
        let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
        let rng = Xoshiro256StarStar::seed_from_u64(seed);
        let pool = (config.rollouts_per_leaf > 1).then(|| {
            ThreadPoolBuilder::new()
                .num_threads(config.rollouts_per_leaf.min(num_cpus::get()))
                .build()
                .expect("rollout thread pool construction failed")
        });
        Mcts { config, rng, pool }
    }

    /// An engine with the canonical configuration.
    pub fn with_defaults() -> Self {
        Mcts::new(SearchConfig::default())
    }

    /// Entry point: runs the full iteration budget from the given position
    /// and returns the move of the root child with the best average score.
    /// Ties go to the first-expanded child.
    ///
    /// The position must not be finished; a position with no candidate cell
    /// left is rejected with [`SearchError::TerminalPosition`].
    pub fn uct_search(&mut self, board: &Board, player: Player) -> Result<Move, SearchError> {
        let mut tree = SearchTree::new(Node::root(board.clone(), player));
        if tree.get(tree.root()).is_terminal() {
            return Err(SearchError::TerminalPosition);
        }
        for iteration in 0..self.config.iterations {
            let leaf = self.select(&mut tree)?;
            let outcomes = self.simulate(&tree, leaf)?;
            for outcome in outcomes {
                tree.backpropagate(leaf, outcome, self.config.reward);
            }
            trace!(iteration, leaf = ?tree.get(leaf).mv, "iteration complete");
        }
        let decision = self.best_decision(&tree)?;
        debug!(
            nodes = tree.len(),
            iterations = self.config.iterations,
            %decision,
            "search complete"
        );
        Ok(decision)
    }

    /// Selection phase: descends while the current node is non-terminal,
    /// expanding the first node met that still has untried moves. Terminal
    /// nodes are returned as-is.
    fn select(&mut self, tree: &mut SearchTree) -> Result<NodeId, SearchError> {
        let mut current = tree.root();
        loop {
            if tree.get(current).is_terminal() {
                return Ok(current);
            }
            if let Some(expanded) = tree.expand_next(current) {
                return expanded.map_err(SearchError::from);
            }
            current = self.best_child(tree, current)?;
        }
    }

    /// The UCB1 maximiser over `parent`'s children; the first-encountered
    /// index wins ties.
    fn best_child(&self, tree: &SearchTree, parent: NodeId) -> Result<NodeId, SearchError> {
        let parent_node = tree.get(parent);
        debug_assert!(parent_node.visits > 0, "selection reached an unvisited interior node");
        let parent_ln = f64::from(parent_node.visits).ln();
        let mut best: Option<(f64, NodeId)> = None;
        for &child_id in &parent_node.children {
            let score = tree.get(child_id).ucb1(parent_ln, self.config.exploration);
            if best.map_or(true, |(top, _)| score > top) {
                best = Some((score, child_id));
            }
        }
        best.map(|(_, id)| id).ok_or(SearchError::NoChildren)
    }

    /// Simulation phase: rollouts from the selected node's position.
    ///
    /// The canonical configuration performs a single rollout on the search
    /// thread. With a larger fan-out, independent rollouts run on the pool
    /// under per-rollout seeds drawn from the master stream, and the engine
    /// joins them before any statistic is touched, so ancestor updates stay
    /// single-writer. A terminal node evaluates to its recorded outcome.
    fn simulate(&mut self, tree: &SearchTree, leaf: NodeId) -> Result<Vec<Outcome>, SearchError> {
        let node = tree.get(leaf);
        let fan_out = self.config.rollouts_per_leaf.max(1);
        if let Some(outcome) = node.outcome {
            return Ok(vec![outcome; fan_out]);
        }
        match &self.pool {
            None => {
                let mut board = node.board.clone();
                let outcome = rollout::play_out(&mut board, node.to_move, &mut self.rng)?;
                Ok(vec![outcome])
            }
            Some(pool) => {
                let seeds: Vec<u64> = (0..fan_out).map(|_| self.rng.gen()).collect();
                let board = &node.board;
                let to_move = node.to_move;
                let outcomes: Result<Vec<Outcome>, OccupiedCell> = pool.install(|| {
                    seeds
                        .par_iter()
                        .map(|&seed| {
                            let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
                            let mut board = board.clone();
                            rollout::play_out(&mut board, to_move, &mut rng)
                        })
                        .collect()
                });
                outcomes.map_err(SearchError::from)
            }
        }
    }

    /// Final decision: argmax of Q/N over the root's children.
    fn best_decision(&self, tree: &SearchTree) -> Result<Move, SearchError> {
        let root = tree.get(tree.root());
        let mut best: Option<(f64, Move)> = None;
        for &child_id in &root.children {
            let child = tree.get(child_id);
            let mv = child
                .mv
                .expect("expanded child must record its originating move");
            let value = child.mean_value();
            if best.map_or(true, |(top, _)| value > top) {
                best = Some((value, mv));
            }
        }
        best.map(|(_, mv)| mv).ok_or(SearchError::NoChildren)
    }
}
