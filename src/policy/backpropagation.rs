//! Backpropagation policies for the MCTS algorithm
//!
//! Backpropagation policies determine how to update node statistics
//! after a simulation.

use crate::game_state::CELLS;
use crate::policy::simulation::Outcome;
use crate::tree::{NodeId, SearchTree};

/// Trait for policies that backpropagate simulation results
pub trait BackpropagationPolicy: Send + Sync {
    /// Updates every node from `start` up to the arena root
    fn backpropagate(&self, tree: &mut SearchTree, start: NodeId, outcome: Outcome);

    /// Create a boxed clone of this policy
    fn clone_box(&self) -> Box<dyn BackpropagationPolicy>;
}

/// Alternating-level backpropagation
///
/// Every node on the path gets one more visit. Consecutive levels belong to
/// opposing players, so the win is credited on the starting node's level and
/// every second level above it when the playout was a win, and on the other
/// levels when it was not.
#[derive(Debug, Clone)]
pub struct AlternatingPolicy;

impl AlternatingPolicy {
    /// Creates a new alternating policy
    pub fn new() -> Self {
        AlternatingPolicy
    }
}

impl Default for AlternatingPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl BackpropagationPolicy for AlternatingPolicy {
    fn backpropagate(&self, tree: &mut SearchTree, start: NodeId, outcome: Outcome) {
        let mut current = Some(start);
        let mut level = 0usize;

        while let Some(id) = current {
            assert!(level <= CELLS, "backpropagation walked past depth {}", CELLS);

            let node = tree.get_mut(id);
            node.visits += 1;

            let credited = if level % 2 == 0 {
                outcome == Outcome::Win
            } else {
                outcome == Outcome::NotWin
            };
            if credited {
                node.wins += 1;
            }

            assert!(
                node.wins <= node.visits,
                "{}: wins {} exceed visits {}",
                id,
                node.wins,
                node.visits
            );

            level += 1;
            current = node.parent;
        }
    }

    fn clone_box(&self) -> Box<dyn BackpropagationPolicy> {
        Box::new(self.clone())
    }
}
