//! Configuration options for the MCTS algorithm
//!
//! This module defines the configuration parameters that control the
//! behavior of a search session.

use crate::utils::DEFAULT_EXPLORATION_CONSTANT;
use crate::{MCTSError, Result};

/// Criteria for selecting the best child after search is complete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BestChildCriteria {
    /// Select the child with the highest `wins / visits`
    ///
    /// This is the decision rule of the reference engine. Ties go to the
    /// child encountered first.
    HighestWinRate,

    /// Select the child with the most visits
    ///
    /// More conservative: relies on how much the search trusted a move
    /// rather than on a possibly noisy ratio.
    MostVisits,
}

/// Configuration for a search session
///
/// Use the builder methods to create a customized configuration.
///
/// # Example
///
/// ```
/// use tictactoe_mcts::{MCTSConfig, config::BestChildCriteria};
///
/// let config = MCTSConfig::default()
///     .with_exploration_constant(1.5)
///     .with_iterations(2_000)
///     .with_seed(7)
///     .with_best_child_criteria(BestChildCriteria::MostVisits);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct MCTSConfig {
    /// Exploration constant `C` of the UCT score.
    ///
    /// The standard value is sqrt(2) ≈ 1.414.
    pub exploration_constant: f64,

    /// Iterations run by each call to `MCTS::search`
    pub iterations: usize,

    /// Seed for the playout random source. `None` draws one from the OS.
    pub seed: Option<u64>,

    /// How the final move is picked once the budget is spent
    pub best_child_criteria: BestChildCriteria,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        MCTSConfig {
            exploration_constant: DEFAULT_EXPLORATION_CONSTANT,
            iterations: 10_000,
            seed: None,
            best_child_criteria: BestChildCriteria::HighestWinRate,
        }
    }
}

impl MCTSConfig {
    /// Sets the exploration constant
    pub fn with_exploration_constant(mut self, constant: f64) -> Self {
        self.exploration_constant = constant;
        self
    }

    /// Sets the number of iterations per search
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Fixes the seed of the playout random source
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the criteria for selecting the best child
    pub fn with_best_child_criteria(mut self, criteria: BestChildCriteria) -> Self {
        self.best_child_criteria = criteria;
        self
    }

    /// Rejects settings the search cannot run with
    pub fn validate(&self) -> Result<()> {
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(MCTSError::InvalidConfiguration(format!(
                "exploration constant must be finite and non-negative, got {}",
                self.exploration_constant
            )));
        }
        if self.iterations == 0 {
            return Err(MCTSError::InvalidConfiguration(
                "iteration budget must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
