//! Main implementation of the Monte Carlo Tree Search algorithm
//!
//! This module contains the search driver, orchestrating selection,
//! candidate choice, simulation and backpropagation over a prebuilt tree,
//! plus the decision policy that picks the move to play afterwards.

use std::collections::BTreeMap;
use std::time::Instant;

use log::{debug, info, trace, warn};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{
    config::{BestChildCriteria, MCTSConfig},
    game_state::{Move, Position},
    policy::{
        backpropagation::{AlternatingPolicy, BackpropagationPolicy},
        selection::{select_leaf, SelectionPolicy, UCTPolicy},
        simulation::{SimulationPolicy, WinFirstPolicy},
    },
    stats::SearchStatistics,
    tree::{NodeId, SearchTree},
    MCTSError, Result,
};

/// Statistics of one direct child of the root after a search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildStats {
    /// Simulations credited to the mark that played this cell
    pub wins: u64,
    /// Simulations that passed through this child
    pub visits: u64,
}

/// Picks the child of `node` to play according to `criteria`.
///
/// Ties go to the first child in child order. Fails with
/// [`MCTSError::NoLegalMoves`] if `node` is terminal.
pub fn best_child_of(
    tree: &SearchTree,
    node: NodeId,
    criteria: BestChildCriteria,
) -> Result<NodeId> {
    let mut best: Option<(NodeId, f64)> = None;

    for &child in tree.children(node) {
        let stats = tree.get(child);
        let score = match criteria {
            BestChildCriteria::HighestWinRate => stats.win_rate(),
            BestChildCriteria::MostVisits => stats.visits as f64,
        };
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((child, score));
        }
    }

    best.map(|(child, _)| child).ok_or(MCTSError::NoLegalMoves)
}

/// A search session over one game tree
///
/// The session owns the tree, the policies and the random source used by
/// playouts. Committing a move re-roots the tree and drops the rest.
pub struct MCTS {
    /// The game tree being searched
    tree: SearchTree,

    /// Configuration for the search
    config: MCTSConfig,

    /// Statistics gathered during the last search
    statistics: SearchStatistics,

    /// Policy for descending to a leaf
    selection_policy: Box<dyn SelectionPolicy>,

    /// Policy for simulating games during the simulation phase
    simulation_policy: Box<dyn SimulationPolicy>,

    /// Policy for backpropagating results
    backpropagation_policy: Box<dyn BackpropagationPolicy>,

    /// Random source for playouts
    rng: ChaCha8Rng,
}

impl MCTS {
    /// Creates a session over the full tree of the empty board
    pub fn new(config: MCTSConfig) -> Self {
        Self::with_tree(SearchTree::new(), config)
    }

    /// Creates a session over the full tree below `position`
    pub fn from_position(position: Position, config: MCTSConfig) -> Result<Self> {
        Ok(Self::with_tree(SearchTree::from_position(position)?, config))
    }

    /// Creates a session over an already built tree
    pub fn with_tree(tree: SearchTree, config: MCTSConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let selection_policy: Box<dyn SelectionPolicy> =
            Box::new(UCTPolicy::new(config.exploration_constant));

        MCTS {
            tree,
            config,
            statistics: SearchStatistics::new(),
            selection_policy,
            simulation_policy: Box::new(WinFirstPolicy::new()),
            backpropagation_policy: Box::new(AlternatingPolicy::new()),
            rng,
        }
    }

    /// Sets the selection policy to use
    pub fn with_selection_policy<P: SelectionPolicy + 'static>(mut self, policy: P) -> Self {
        self.selection_policy = Box::new(policy);
        self
    }

    /// Sets the simulation policy to use
    pub fn with_simulation_policy<P: SimulationPolicy + 'static>(mut self, policy: P) -> Self {
        self.simulation_policy = Box::new(policy);
        self
    }

    /// Sets the backpropagation policy to use
    pub fn with_backpropagation_policy<P: BackpropagationPolicy + 'static>(
        mut self,
        policy: P,
    ) -> Self {
        self.backpropagation_policy = Box::new(policy);
        self
    }

    /// Returns the tree being searched
    pub fn tree(&self) -> &SearchTree {
        &self.tree
    }

    /// Returns the tree for direct inspection or seeding of statistics
    pub fn tree_mut(&mut self) -> &mut SearchTree {
        &mut self.tree
    }

    /// Returns the configuration
    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }

    /// Returns the board at the current root
    pub fn root_position(&self) -> Position {
        self.tree.get(self.tree.root()).position
    }

    /// Returns true once the game at the root is finished
    pub fn is_over(&self) -> bool {
        self.tree.get(self.tree.root()).is_terminal()
    }

    /// Renders the board at the current root
    pub fn render(&self) -> String {
        self.root_position().to_string()
    }

    /// Runs `config.iterations` iterations from the root
    pub fn search(&mut self) -> Result<BTreeMap<usize, ChildStats>> {
        self.config.validate()?;
        self.run_search(self.config.iterations)
    }

    /// Runs the given number of iterations from the root and returns the
    /// statistics of each direct child, keyed by cell.
    ///
    /// Once any iteration selects a terminal leaf, every remaining iteration
    /// of this call expands from the root instead of descending.
    pub fn run_search(&mut self, iterations: usize) -> Result<BTreeMap<usize, ChildStats>> {
        if self.is_over() {
            return Err(MCTSError::NoLegalMoves);
        }

        self.statistics = SearchStatistics::new();
        self.statistics.tree_size = self.tree.node_count();
        info!("Running {} iterations", iterations);

        let start_time = Instant::now();
        for i in 0..iterations {
            self.execute_iteration(i)?;
            self.statistics.iterations = i + 1;
        }
        self.statistics.total_time = start_time.elapsed();

        let results = self.child_stats();
        for (cell, stats) in &results {
            debug!("{}: {}/{}", cell, stats.wins, stats.visits);
        }
        info!(
            "Search finished: {} iterations in {:.3}s",
            self.statistics.iterations,
            self.statistics.total_time.as_secs_f64()
        );

        Ok(results)
    }

    /// Execute a single iteration of the search
    fn execute_iteration(&mut self, iteration: usize) -> Result<()> {
        let root = self.tree.root();

        // 1. Selection, unless an earlier iteration already hit a terminal leaf
        let mut leaf = root;
        if self.statistics.fallback_iteration.is_none() {
            leaf = select_leaf(&self.tree, root, self.selection_policy.as_ref());
            let depth = self.tree.depth(leaf);
            self.statistics.max_depth = self.statistics.max_depth.max(depth);

            if self.tree.get(leaf).is_terminal() {
                warn!(
                    "Selection reached terminal node {} at iteration {}; expanding from the root for the rest of this search",
                    leaf, iteration
                );
                self.statistics.fallback_iteration = Some(iteration);
                leaf = root;
            }
        }

        // 2. The least visited child of the leaf is the one simulated
        let candidate = self
            .tree
            .children(leaf)
            .iter()
            .copied()
            .min_by_key(|&child| self.tree.get(child).visits)
            .ok_or(MCTSError::NoLegalMoves)?;
        if self.tree.get(candidate).is_terminal() {
            self.statistics.terminal_playouts += 1;
        }

        // 3. Simulation
        let outcome = self
            .simulation_policy
            .simulate(&self.tree, candidate, &mut self.rng);

        // 4. Backpropagation
        self.backpropagation_policy
            .backpropagate(&mut self.tree, candidate, outcome);

        trace!(
            "iteration {}: leaf {} candidate {} outcome {:?}",
            iteration,
            leaf,
            candidate,
            outcome
        );

        Ok(())
    }

    /// Returns `(wins, visits)` of every direct child of the root, by cell
    pub fn child_stats(&self) -> BTreeMap<usize, ChildStats> {
        self.tree
            .children(self.tree.root())
            .iter()
            .filter_map(|&child| {
                let node = self.tree.get(child);
                node.cell().map(|cell| {
                    (
                        cell,
                        ChildStats {
                            wins: node.wins,
                            visits: node.visits,
                        },
                    )
                })
            })
            .collect()
    }

    /// Returns the child of the root recommended by the configured criteria
    pub fn best_child(&self) -> Result<NodeId> {
        best_child_of(
            &self.tree,
            self.tree.root(),
            self.config.best_child_criteria,
        )
    }

    /// Returns the child of the root whose move occupies `cell`
    pub fn child_at_cell(&self, cell: usize) -> Result<NodeId> {
        self.tree.child_at_cell(self.tree.root(), cell)
    }

    /// Plays `cell` for the side to move and re-roots the tree there
    pub fn play(&mut self, cell: usize) -> Result<Move> {
        let child = self.child_at_cell(cell)?;
        self.commit(child)
    }

    /// Plays the recommended move and re-roots the tree there
    pub fn play_best(&mut self) -> Result<Move> {
        let child = self.best_child()?;
        self.commit(child)
    }

    /// Plays a uniformly random move and re-roots the tree there
    pub fn play_random(&mut self) -> Result<Move> {
        let child = self
            .tree
            .children(self.tree.root())
            .choose(&mut self.rng)
            .copied()
            .ok_or(MCTSError::NoLegalMoves)?;
        self.commit(child)
    }

    fn commit(&mut self, child: NodeId) -> Result<Move> {
        let mv = self
            .tree
            .get(child)
            .action
            .ok_or(MCTSError::NotAChildOfRoot(child))?;
        self.tree.commit(child)?;
        debug!("Played {}", mv);
        Ok(mv)
    }

    /// Returns the search statistics
    pub fn get_statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    /// Returns a visualization of the top of the search tree
    pub fn visualize_tree(&self, max_depth: usize) -> String {
        self.tree.visualize(max_depth)
    }
}

impl Clone for MCTS {
    fn clone(&self) -> Self {
        MCTS {
            tree: self.tree.clone(),
            config: self.config.clone(),
            statistics: self.statistics.clone(),
            selection_policy: self.selection_policy.clone_box(),
            simulation_policy: self.simulation_policy.clone_box(),
            backpropagation_policy: self.backpropagation_policy.clone_box(),
            rng: self.rng.clone(),
        }
    }
}
