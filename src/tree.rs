//! Tree data structures for Monte Carlo Tree Search
//!
//! The whole reachable game tree is built eagerly when a [`SearchTree`] is
//! created. Nodes live in a flat arena and refer to each other by
//! [`NodeId`], so the parent back-link and the owned child list never form a
//! reference cycle; the arena is dropped as a unit.

use std::collections::VecDeque;
use std::fmt;

use log::debug;

use crate::game_state::{Mark, Move, Position};
use crate::{MCTSError, Result};

/// Index of a node inside its [`SearchTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the arena index
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Represents a node in the MCTS tree
///
/// Each node holds its own copy of the board, the move that produced it and
/// the running statistics. Only `visits` and `wins` change after the tree has
/// been built, and only through backpropagation.
#[derive(Debug, Clone)]
pub struct MCTSNode {
    /// The board at this node
    pub position: Position,

    /// The move that led to this position (None for root)
    pub action: Option<Move>,

    /// Mark that made `action`. For the root this is the mark that would
    /// have moved last, so the first child belongs to the player to move.
    pub player: Mark,

    /// Number of simulations that passed through this node
    pub visits: u64,

    /// Number of those simulations credited to `player`
    pub wins: u64,

    /// Parent node (None for root)
    pub parent: Option<NodeId>,

    /// One child per empty cell, in ascending cell order; empty iff terminal
    pub children: Vec<NodeId>,

    /// Distance from the root (root = 0)
    pub depth: usize,

    winner: Option<Mark>,
    terminal: bool,
}

impl MCTSNode {
    fn new(
        position: Position,
        action: Option<Move>,
        player: Mark,
        parent: Option<NodeId>,
        depth: usize,
    ) -> Self {
        MCTSNode {
            position,
            action,
            player,
            visits: 0,
            wins: 0,
            parent,
            children: Vec::new(),
            depth,
            winner: position.winner(),
            terminal: position.is_terminal(),
        }
    }

    /// Returns true if the game is over at this node
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Returns the winning mark, if the game ended with a line
    pub fn winner(&self) -> Option<Mark> {
        self.winner
    }

    /// Returns the board cell of the move that produced this node
    pub fn cell(&self) -> Option<usize> {
        self.action.map(|mv| mv.cell)
    }

    /// Returns the observed win ratio, 0.0 before the first visit
    pub fn win_rate(&self) -> f64 {
        crate::utils::win_rate(self.wins, self.visits)
    }
}

/// Arena holding every node reachable from a root position
#[derive(Debug, Clone)]
pub struct SearchTree {
    nodes: Vec<MCTSNode>,
    root: NodeId,
}

impl SearchTree {
    /// Builds the full tree for the empty board. `X` makes the first move.
    pub fn new() -> Self {
        Self::build(Position::empty(), Mark::O)
    }

    /// Builds the full tree below an arbitrary reachable position.
    ///
    /// The player to move is inferred from the mark counts.
    pub fn from_position(position: Position) -> Result<Self> {
        let last_mover = position.last_mover()?;
        Ok(Self::build(position, last_mover))
    }

    /// Expands every node with a work list rather than recursion. Children
    /// are pushed in ascending cell order.
    fn build(position: Position, last_mover: Mark) -> Self {
        let mut nodes = vec![MCTSNode::new(position, None, last_mover, None, 0)];
        let mut pending = vec![0usize];

        while let Some(index) = pending.pop() {
            if nodes[index].is_terminal() {
                continue;
            }

            let position = nodes[index].position;
            let mover = nodes[index].player.opponent();
            let depth = nodes[index].depth + 1;

            for cell in position.empty_cells() {
                let mv = Move::new(cell, mover);
                let child = nodes.len();
                nodes.push(MCTSNode::new(
                    position.with_move(mv),
                    Some(mv),
                    mover,
                    Some(NodeId(index)),
                    depth,
                ));
                nodes[index].children.push(NodeId(child));
                pending.push(child);
            }
        }

        debug!("Built search tree with {} nodes", nodes.len());

        SearchTree {
            nodes,
            root: NodeId(0),
        }
    }

    /// Returns the root node id
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the node with the given id
    pub fn get(&self, id: NodeId) -> &MCTSNode {
        &self.nodes[id.0]
    }

    /// Returns the node with the given id for updating its statistics
    pub fn get_mut(&mut self, id: NodeId) -> &mut MCTSNode {
        &mut self.nodes[id.0]
    }

    /// Returns the children of `id`
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Returns the parent of `id`
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Total number of nodes created for this tree
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Same as [`node_count`](Self::node_count)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false once built; the root is never removed
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of moves between the root and `id`
    pub fn depth(&self, id: NodeId) -> usize {
        self.nodes[id.index()].depth
    }

    /// Iterates over every node in arena order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &MCTSNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Returns the child of `id` whose move occupies `cell`
    pub fn child_at_cell(&self, id: NodeId, cell: usize) -> Result<NodeId> {
        let node = self.get(id);
        node.position.check_playable(cell)?;

        // A playable cell on a finished board has no child.
        node.children
            .iter()
            .copied()
            .find(|&child| self.get(child).cell() == Some(cell))
            .ok_or(MCTSError::NoLegalMoves)
    }

    /// Makes a direct child of the root the new root.
    ///
    /// Sibling subtrees and the old root are released; statistics inside the
    /// kept subtree are preserved. The new root has no parent, so later UCT
    /// scores at the root use its own visit count as `N` and backpropagation
    /// stops there instead of reaching the old root.
    pub fn commit(&mut self, child: NodeId) -> Result<()> {
        if child.index() >= self.nodes.len() || self.parent(child) != Some(self.root) {
            return Err(MCTSError::NotAChildOfRoot(child));
        }

        let base_depth = self.get(child).depth;
        let mut kept = Vec::new();
        let mut queue = VecDeque::from([(child, None::<NodeId>)]);

        while let Some((old, new_parent)) = queue.pop_front() {
            let id = NodeId(kept.len());
            let source = &self.nodes[old.0];

            let mut node = MCTSNode {
                children: Vec::with_capacity(source.children.len()),
                parent: new_parent,
                depth: source.depth - base_depth,
                ..source.clone()
            };
            if new_parent.is_none() {
                node.action = None;
            }
            kept.push(node);

            if let Some(parent) = new_parent {
                kept[parent.0].children.push(id);
            }
            queue.extend(source.children.iter().map(|&c| (c, Some(id))));
        }

        debug!(
            "Committed {}: kept {} of {} nodes",
            child,
            kept.len(),
            self.nodes.len()
        );

        self.nodes = kept;
        self.root = NodeId(0);
        Ok(())
    }

    /// Verifies the structural and statistical invariants of every node.
    ///
    /// Returns a description of the first violation found.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        for (id, node) in self.iter() {
            if node.wins > node.visits {
                return Err(format!(
                    "{}: wins {} exceed visits {}",
                    id, node.wins, node.visits
                ));
            }

            let expected = if node.is_terminal() {
                0
            } else {
                node.position.empty_cells().len()
            };
            if node.children.len() != expected {
                return Err(format!(
                    "{}: {} children, expected {}",
                    id,
                    node.children.len(),
                    expected
                ));
            }

            for &child in &node.children {
                if self.parent(child) != Some(id) {
                    return Err(format!("{}: child {} has a different parent", id, child));
                }
            }
        }
        Ok(())
    }

    /// Returns an indented dump of the tree down to `max_depth` below the root
    pub fn visualize(&self, max_depth: usize) -> String {
        let mut output = String::new();
        self.visualize_node(self.root, 0, max_depth, &mut output);
        output
    }

    fn visualize_node(&self, id: NodeId, depth: usize, max_depth: usize, output: &mut String) {
        let node = self.get(id);
        let indent = "  ".repeat(depth);
        let label = match node.action {
            Some(mv) => mv.to_string(),
            None => "Root".to_string(),
        };

        output.push_str(&format!(
            "{}{} ({}/{})\n",
            indent, label, node.wins, node.visits
        ));

        if depth < max_depth {
            for &child in &node.children {
                self.visualize_node(child, depth + 1, max_depth, output);
            }
        }
    }
}

impl Default for SearchTree {
    fn default() -> Self {
        Self::new()
    }
}
