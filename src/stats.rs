//! Statistics collection for MCTS searches
//!
//! This module provides structures for collecting and reporting statistics
//! about a single search call.

use std::time::Duration;

/// Statistics collected during an MCTS search
#[derive(Debug, Clone)]
pub struct SearchStatistics {
    /// Number of iterations performed
    pub iterations: usize,

    /// Total time spent searching
    pub total_time: Duration,

    /// Number of nodes in the tree being searched
    pub tree_size: usize,

    /// Deepest leaf returned by selection
    pub max_depth: usize,

    /// Iteration at which selection first hit a terminal leaf. From then on
    /// every iteration of the call restarts from the root.
    pub fallback_iteration: Option<usize>,

    /// Playouts that started on an already finished board
    pub terminal_playouts: usize,
}

impl SearchStatistics {
    /// Creates a new, empty statistics object
    pub fn new() -> Self {
        SearchStatistics {
            iterations: 0,
            total_time: Duration::from_secs(0),
            tree_size: 0,
            max_depth: 0,
            fallback_iteration: None,
            terminal_playouts: 0,
        }
    }

    /// Returns the average time per iteration in microseconds
    pub fn avg_time_per_iteration_us(&self) -> f64 {
        if self.iterations == 0 {
            return 0.0;
        }
        self.total_time.as_micros() as f64 / self.iterations as f64
    }

    /// Returns the number of iterations per second
    pub fn iterations_per_second(&self) -> f64 {
        if self.total_time.as_secs_f64() <= 0.0 {
            return 0.0;
        }
        self.iterations as f64 / self.total_time.as_secs_f64()
    }

    /// Returns a summary of the statistics as a string
    pub fn summary(&self) -> String {
        let fallback = match self.fallback_iteration {
            Some(i) => format!("from iteration {}", i),
            None => "never".to_string(),
        };
        format!(
            "MCTS Search Statistics:\n\
             - Iterations: {}\n\
             - Total time: {:.3} seconds\n\
             - Tree size: {} nodes\n\
             - Max depth: {}\n\
             - Root fallback: {}\n\
             - Terminal playouts: {}\n\
             - Avg time per iteration: {:.3} µs\n\
             - Iterations per second: {:.1}",
            self.iterations,
            self.total_time.as_secs_f64(),
            self.tree_size,
            self.max_depth,
            fallback,
            self.terminal_playouts,
            self.avg_time_per_iteration_us(),
            self.iterations_per_second(),
        )
    }
}

impl Default for SearchStatistics {
    fn default() -> Self {
        Self::new()
    }
}
