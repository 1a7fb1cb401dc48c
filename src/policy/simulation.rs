//! Simulation policies for the MCTS algorithm
//!
//! A simulation walks down the prebuilt tree from a node to a finished game
//! and reports whether the mark that moved into the starting node won.

use rand::seq::SliceRandom;
use rand::RngCore;

use crate::game_state::Mark;
use crate::tree::{NodeId, SearchTree};

/// Result of one playout, from the perspective of the starting node's mover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The perspective mark completed a line
    Win,
    /// The opponent won or the board filled up
    NotWin,
}

impl Outcome {
    /// Classifies a finished game for `perspective`
    pub fn for_player(winner: Option<Mark>, perspective: Mark) -> Self {
        if winner == Some(perspective) {
            Outcome::Win
        } else {
            Outcome::NotWin
        }
    }
}

/// Trait for policies that simulate games
pub trait SimulationPolicy: Send + Sync {
    /// Plays out from `node` to a terminal node and returns the result for
    /// `node`'s mover
    fn simulate(&self, tree: &SearchTree, node: NodeId, rng: &mut dyn RngCore) -> Outcome;

    /// Create a boxed clone of this policy
    fn clone_box(&self) -> Box<dyn SimulationPolicy>;
}

/// Greedy playout policy
///
/// At every step, takes a child that ends the game with a winner if one
/// exists, otherwise a uniformly random child. This is the default policy.
#[derive(Debug, Clone)]
pub struct WinFirstPolicy;

impl WinFirstPolicy {
    /// Creates a new win-first policy
    pub fn new() -> Self {
        WinFirstPolicy
    }
}

impl Default for WinFirstPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationPolicy for WinFirstPolicy {
    fn simulate(&self, tree: &SearchTree, node: NodeId, rng: &mut dyn RngCore) -> Outcome {
        let perspective = tree.get(node).player;
        let mut current = node;

        while !tree.get(current).is_terminal() {
            let children = tree.children(current);
            let winning = children.iter().copied().find(|&c| {
                let child = tree.get(c);
                child.is_terminal() && child.winner().is_some()
            });

            match winning.or_else(|| children.choose(rng).copied()) {
                Some(next) => current = next,
                None => break,
            }
        }

        Outcome::for_player(tree.get(current).winner(), perspective)
    }

    fn clone_box(&self) -> Box<dyn SimulationPolicy> {
        Box::new(self.clone())
    }
}

/// Random simulation policy
///
/// This policy plays uniformly random moves until the game ends.
#[derive(Debug, Clone)]
pub struct RandomPolicy;

impl RandomPolicy {
    /// Creates a new random policy
    pub fn new() -> Self {
        RandomPolicy
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationPolicy for RandomPolicy {
    fn simulate(&self, tree: &SearchTree, node: NodeId, rng: &mut dyn RngCore) -> Outcome {
        let perspective = tree.get(node).player;
        let mut current = node;

        while let Some(&next) = tree.children(current).choose(rng) {
            current = next;
        }

        Outcome::for_player(tree.get(current).winner(), perspective)
    }

    fn clone_box(&self) -> Box<dyn SimulationPolicy> {
        Box::new(self.clone())
    }
}
