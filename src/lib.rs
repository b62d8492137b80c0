//! Monte Carlo move evaluation for connection and line games.
//!
//! Every empty field of a board is scored by filling the rest of the board with legal random
//! completions and counting how often the player to move ends up with a winning configuration.
//! On top of that sits a shallow lookahead that expands the best candidates of both sides a few
//! plies deep before choosing. Hex (connect your two edges on a rhombic grid) and Tic-Tac-Toe
//! style line games are supported.
//!
//! # Example
//!
//! ```rust
//! use mc_connect::board::{Board, Coordinate};
//! use mc_connect::lookahead::LookaheadSearch;
//! use mc_connect::random::CustomNumberGenerator;
//! use mc_connect::rules::GameKind;
//!
//! let mut board = Board::new(5);
//! board.play(Coordinate::new(2, 2));
//!
//! // Configure a two-ply search with three candidates per branching level
//! let search = LookaheadSearch::builder(GameKind::Hex.rollout_rule())
//!     .with_repetitions(50)
//!     .with_plies(2)
//!     .with_best_moves(3)
//!     .build();
//!
//! let mut rng = CustomNumberGenerator::default();
//! let outcome = search.search(&board, &mut rng).unwrap();
//!
//! println!(
//!     "The best move is {} ({:.2}%)",
//!     outcome.first_move.coordinate,
//!     outcome.probability * 100.0
//! );
//! ```

/// Board, marks, players and coordinates.
pub mod board;
/// Engine configuration.
pub mod config;
/// The crate's error type.
pub mod error;
/// Dataset export of evaluated positions.
pub mod export;
/// A turn-taking loop between two strategies.
pub mod game;
/// Random, legally reachable positions.
pub mod generator;
/// The multi-ply lookahead search.
pub mod lookahead;
/// Worker partitioning for the rollout evaluator.
pub mod parallel;
/// Contains traits and implementations for random number generation.
pub mod random;
/// The Monte Carlo rollout evaluator.
pub mod rollout;
/// Win detection.
pub mod rules;
/// Contains the `SearchNode` struct, the node payload of the lookahead tree.
pub mod search_node;
/// Move choosing strategies.
pub mod strategy;

pub use board::{Board, Coordinate, Mark, Player};
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use lookahead::{LookaheadSearch, SearchOutcome};
pub use rollout::{RankedMove, RolloutEvaluator};
pub use rules::{GameKind, WinRule, WinRuleKind};
