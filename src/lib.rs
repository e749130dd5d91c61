//! # Gomoku MCTS Engine
//!
//! A Monte Carlo Tree Search engine that plays five-in-a-row ("Gomoku") on a
//! fixed 11x11 board. The engine owns nothing but the search: it takes a
//! position and a color, spends a fixed iteration budget growing a tree of
//! candidate continuations, and returns one move.
//!
//! ## How a decision is made
//! - A root node is built from the live position; its candidate moves are the
//!   empty cells near existing stones (just the center on an empty board).
//! - Each iteration selects a path through the tree by UCB1, expands exactly
//!   one new node, evaluates it with a uniformly-random rollout, and
//!   backpropagates the outcome to the root.
//! - The returned move is the root child with the best average score.
//!
//! ## Crate layout
//! - [`board`]: grid, players, moves, the win scan, and the candidate set
//! - [`node`] / [`tree`]: arena-allocated search tree
//! - [`search`]: the four-phase engine and its configuration
//! - [`rollout`]: the random policy used for evaluation and as a baseline
//!   opponent
//!
//! The `play` binary pits engine and random seats against each other for
//! full games on the terminal.

pub mod board;
pub mod node;
pub mod rollout;
pub mod search;
pub mod tree;

// Re-export main types
pub use board::{Board, Move, OccupiedCell, Outcome, Player, BOARD_SIZE, LINE_SIZE};
pub use node::{Node, NodeId, RewardPerspective};
pub use rollout::{Ply, RandomPolicy};
pub use search::{Mcts, SearchConfig, SearchError, DEFAULT_BUDGET, DEFAULT_EXPLORATION};
pub use tree::SearchTree;
