//! # tictactoe-mcts
//!
//! Monte Carlo Tree Search over the complete game tree of tic-tac-toe.
//!
//! The game is small enough that every reachable position is built up front,
//! so the search never expands nodes lazily: each iteration only walks the
//! prebuilt tree and updates statistics.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use tictactoe_mcts::{MCTSConfig, MCTS};
//!
//! fn main() -> Result<(), tictactoe_mcts::MCTSError> {
//!     let config = MCTSConfig::default()
//!         .with_iterations(10_000)
//!         .with_seed(42);
//!
//!     // Builds every position reachable from the empty board
//!     let mut mcts = MCTS::new(config);
//!
//!     // The opponent opens in the centre
//!     mcts.play(4)?;
//!
//!     // Per-cell (wins, visits) for each reply
//!     for (cell, stats) in mcts.search()? {
//!         println!("{}: {}/{}", cell, stats.wins, stats.visits);
//!     }
//!
//!     let reply = mcts.play_best()?;
//!     println!("Engine plays {}\n{}", reply, mcts.render());
//!     Ok(())
//! }
//! ```
//!
//! ## How It Works
//!
//! Each iteration runs four steps:
//!
//! 1. **Selection**: From the root, follow the child with the best UCT score
//!    until reaching a node that is terminal or has an unvisited child.
//!
//! 2. **Candidate**: Take the least visited child of that node. If selection
//!    ever lands on a terminal node, this and every later iteration of the
//!    same search take the candidate from the root's children instead.
//!
//! 3. **Simulation**: Play out from the candidate, taking an immediate win
//!    whenever one exists and a random move otherwise.
//!
//! 4. **Backpropagation**: Walk back to the root, adding a visit to every
//!    node and crediting the win to alternating levels.
//!
//! After the budget is spent the child with the best win ratio is played.

pub mod config;
pub mod game_state;
pub mod mcts;
pub mod policy;
pub mod stats;
pub mod tree;
pub mod utils;

pub use config::MCTSConfig;
pub use game_state::{Mark, Move, Position};
pub use mcts::{best_child_of, ChildStats, MCTS};
pub use policy::{BackpropagationPolicy, Outcome, SelectionPolicy, SimulationPolicy};
pub use stats::SearchStatistics;
pub use tree::{MCTSNode, NodeId, SearchTree};

/// Why a move could not be played
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMove {
    /// The cell index is not on the board
    #[error("cell {0} is outside the board (0-8)")]
    OutOfRange(usize),

    /// The cell already holds a mark
    #[error("cell {0} is already occupied")]
    Occupied(usize),
}

/// Error types for the MCTS engine
#[derive(thiserror::Error, Debug)]
pub enum MCTSError {
    /// The requested move cannot be played from the current position
    #[error("Illegal move: {0}")]
    IllegalMove(#[from] IllegalMove),

    /// The position is finished, so there is nothing to search or play
    #[error("No legal moves available from current position")]
    NoLegalMoves,

    /// Only direct children of the root can be committed
    #[error("Node {0} is not a child of the root")]
    NotAChildOfRoot(NodeId),

    /// The position could not have arisen from alternating play
    #[error("Invalid position: {0}")]
    InvalidPosition(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result type for MCTS operations
pub type Result<T> = std::result::Result<T, MCTSError>;
