//! Policies for different phases of the MCTS algorithm
//!
//! This module contains the policies used by the search driver:
//! - Selection policies: How to descend from the root to a leaf
//! - Simulation policies: How to play out games from a node
//! - Backpropagation policies: How to update node statistics

pub mod backpropagation;
pub mod selection;
pub mod simulation;

pub use backpropagation::{AlternatingPolicy, BackpropagationPolicy};
pub use selection::{is_leaf, select_leaf, SelectionPolicy, UCTPolicy};
pub use simulation::{Outcome, RandomPolicy, SimulationPolicy, WinFirstPolicy};
