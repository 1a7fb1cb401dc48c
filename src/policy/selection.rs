//! Selection policies for the MCTS algorithm
//!
//! Selection descends from the search root until it reaches a leaf. In this
//! engine a leaf is not a childless node: it is any node that is terminal or
//! still has a child that has never been visited.

use crate::tree::{NodeId, SearchTree};
use crate::utils::{self, DEFAULT_EXPLORATION_CONSTANT};

/// Trait for policies that pick the child to descend into
pub trait SelectionPolicy: Send + Sync {
    /// Selects a child of `node`. Returns `None` only if `node` has no children.
    fn select_child(&self, tree: &SearchTree, node: NodeId) -> Option<NodeId>;

    /// Create a boxed clone of this policy
    fn clone_box(&self) -> Box<dyn SelectionPolicy>;
}

/// Returns true if `node` is terminal or has at least one unvisited child
pub fn is_leaf(tree: &SearchTree, node: NodeId) -> bool {
    tree.get(node).is_terminal() || tree.children(node).iter().any(|&c| tree.get(c).visits == 0)
}

/// Descends from `from` with `policy` until [`is_leaf`] holds
pub fn select_leaf(tree: &SearchTree, from: NodeId, policy: &dyn SelectionPolicy) -> NodeId {
    let mut current = from;
    while !is_leaf(tree, current) {
        match policy.select_child(tree, current) {
            Some(next) => current = next,
            None => break,
        }
    }
    current
}

/// Upper Confidence bound applied to Trees (UCT)
///
/// ```text
/// UCT = wins / visits + exploration_constant * sqrt(ln(N) / visits)
/// ```
///
/// `N` is the visit count of the node being expanded from when it is the
/// root of the arena, and the visit count of that node's parent otherwise.
/// Ties go to the first maximal child in child order.
#[derive(Debug, Clone)]
pub struct UCTPolicy {
    /// Exploration constant that controls the balance between exploration and exploitation.
    pub exploration_constant: f64,
}

impl UCTPolicy {
    /// Creates a new UCT policy with the given exploration constant
    pub fn new(exploration_constant: f64) -> Self {
        UCTPolicy {
            exploration_constant,
        }
    }

    /// Calculates the UCT value for a child
    pub fn uct_value(&self, wins: u64, visits: u64, total_visits: u64) -> f64 {
        utils::uct_value(wins, visits, total_visits, self.exploration_constant)
    }
}

impl Default for UCTPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_EXPLORATION_CONSTANT)
    }
}

impl SelectionPolicy for UCTPolicy {
    fn select_child(&self, tree: &SearchTree, node: NodeId) -> Option<NodeId> {
        let total_visits = match tree.parent(node) {
            Some(parent) => tree.get(parent).visits,
            None => tree.get(node).visits,
        };

        let mut best: Option<(NodeId, f64)> = None;
        for &child in tree.children(node) {
            let stats = tree.get(child);
            let score = self.uct_value(stats.wins, stats.visits, total_visits);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((child, score));
            }
        }

        best.map(|(child, _)| child)
    }

    fn clone_box(&self) -> Box<dyn SelectionPolicy> {
        Box::new(self.clone())
    }
}
