use tictactoe_mcts::{
    config::BestChildCriteria, policy::simulation::RandomPolicy, BackpropagationPolicy,
    IllegalMove, MCTSConfig, MCTSError, Mark, NodeId, Outcome, Position, SearchTree,
    SelectionPolicy, MCTS,
};

const X: Option<Mark> = Some(Mark::X);
const O: Option<Mark> = Some(Mark::O);
const E: Option<Mark> = None;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// Test helper
fn race_position() -> Position {
    // X X .
    // O O .
    // . . .
    // X to move and can win at 2; O threatens 5
    Position::from_cells([X, X, E, O, O, E, E, E, E])
}

#[test]
fn test_full_tree_size() {
    let tree = SearchTree::new();
    assert_eq!(tree.node_count(), 549_946);
    assert!(tree.check_invariants().is_ok());
}

#[test]
fn test_opening_has_nine_children() {
    let tree = SearchTree::new();
    let root = tree.root();
    assert_eq!(tree.get(root).player, Mark::O);
    assert!(tree.get(root).action.is_none());

    let children = tree.children(root);
    assert_eq!(children.len(), 9);
    for (cell, &child) in children.iter().enumerate() {
        let node = tree.get(child);
        assert_eq!(node.cell(), Some(cell));
        assert_eq!(node.player, Mark::X);
        assert_eq!(node.position.get(cell), Some(Mark::X));
        assert_eq!(tree.parent(child), Some(root));
    }
}

#[test]
fn test_centre_opening_has_eight_replies() {
    let tree = SearchTree::new();
    let centre = tree.child_at_cell(tree.root(), 4).unwrap();
    let node = tree.get(centre);
    assert_eq!(node.position.get(4), Some(Mark::X));
    assert_eq!(node.position.count(Mark::X), 1);
    assert_eq!(tree.children(centre).len(), 8);
    for &reply in tree.children(centre) {
        assert_eq!(tree.get(reply).player, Mark::O);
    }
}

#[test]
fn test_illegal_moves_are_rejected() {
    let mut mcts = MCTS::new(MCTSConfig::default().with_seed(1));

    assert!(matches!(
        mcts.child_at_cell(10),
        Err(MCTSError::IllegalMove(IllegalMove::OutOfRange(10)))
    ));

    mcts.play(4).unwrap();
    assert!(matches!(
        mcts.child_at_cell(4),
        Err(MCTSError::IllegalMove(IllegalMove::Occupied(4)))
    ));
    assert!(matches!(
        mcts.play(4),
        Err(MCTSError::IllegalMove(IllegalMove::Occupied(4)))
    ));

    // A rejected move leaves the session untouched
    assert_eq!(mcts.root_position().count(Mark::X), 1);
    assert_eq!(mcts.tree().node_count(), 55_505);
}

#[test]
fn test_visits_are_conserved() {
    init_logging();
    let iterations = 500;
    let mut mcts = MCTS::new(MCTSConfig::default().with_seed(7));
    let results = mcts.run_search(iterations).unwrap();

    assert_eq!(results.len(), 9);
    let total: u64 = results.values().map(|s| s.visits).sum();
    assert_eq!(total, iterations as u64);

    let tree = mcts.tree();
    assert_eq!(tree.get(tree.root()).visits, iterations as u64);
    assert!(tree.check_invariants().is_ok());

    let stats = mcts.get_statistics();
    assert_eq!(stats.iterations, iterations);
    assert_eq!(stats.tree_size, 549_946);
}

#[test]
fn test_every_opening_is_tried_first() {
    let mut mcts = MCTS::new(MCTSConfig::default().with_seed(3));
    let results = mcts.run_search(9).unwrap();
    for stats in results.values() {
        assert_eq!(stats.visits, 1);
        assert!(stats.wins <= 1);
    }
}

#[test]
fn test_finds_winning_move() {
    let config = MCTSConfig::default().with_iterations(1_000).with_seed(11);
    let mut mcts = MCTS::from_position(race_position(), config).unwrap();

    let results = mcts.search().unwrap();
    let win = results[&2];
    assert!(win.visits > 0);
    assert_eq!(win.wins, win.visits);

    let mv = mcts.play_best().unwrap();
    assert_eq!(mv.cell, 2);
    assert_eq!(mv.mark, Mark::X);
    assert!(mcts.is_over());
    assert_eq!(mcts.root_position().winner(), Some(Mark::X));
}

#[test]
fn test_terminal_leaf_latches_root_fallback() {
    init_logging();
    let config = MCTSConfig::default().with_iterations(300).with_seed(5);
    let mut mcts = MCTS::from_position(race_position(), config).unwrap();
    let results = mcts.search().unwrap();

    let stats = mcts.get_statistics();
    let latched_at = stats
        .fallback_iteration
        .expect("selection should reach the winning leaf");
    assert!(latched_at >= 5);

    // From the latch on, root children are taken round-robin by visit count
    let visits: Vec<u64> = results.values().map(|s| s.visits).collect();
    let min = *visits.iter().min().unwrap();
    let max = *visits.iter().max().unwrap();
    assert!(max - min <= (latched_at as u64) + 1);
    assert_eq!(visits.iter().sum::<u64>(), 300);
    assert!(mcts.tree().check_invariants().is_ok());
}

#[test]
fn test_root_fallback_resets_between_calls() {
    let config = MCTSConfig::default().with_seed(5);
    let mut mcts = MCTS::from_position(race_position(), config).unwrap();

    // The five openings are tried once each, then UCT lands on the winning X@2
    let first = mcts.run_search(300).unwrap();
    let stats = mcts.get_statistics().clone();
    assert_eq!(stats.fallback_iteration, Some(5));
    assert_eq!(stats.max_depth, 1);
    for child in first.values() {
        assert_eq!(child.visits, 60);
    }
    // Every X@2 visit plays out from a finished board
    assert_eq!(stats.terminal_playouts, 60);
    assert_eq!(first[&2].wins, 60);

    // A new call descends again before it latches
    mcts.run_search(10).unwrap();
    let stats = mcts.get_statistics();
    assert_eq!(stats.iterations, 10);
    assert_eq!(stats.fallback_iteration, Some(0));
    assert_eq!(stats.max_depth, 1);
    assert_eq!(mcts.tree().get(mcts.tree().root()).visits, 310);
}

/// Always descends into the last child
#[derive(Clone)]
struct LastChild;

impl SelectionPolicy for LastChild {
    fn select_child(&self, tree: &SearchTree, node: NodeId) -> Option<NodeId> {
        tree.children(node).last().copied()
    }

    fn clone_box(&self) -> Box<dyn SelectionPolicy> {
        Box::new(self.clone())
    }
}

/// Counts visits and never credits a win
#[derive(Clone)]
struct VisitsOnly;

impl BackpropagationPolicy for VisitsOnly {
    fn backpropagate(&self, tree: &mut SearchTree, start: NodeId, _outcome: Outcome) {
        let mut current = Some(start);
        while let Some(id) = current {
            tree.get_mut(id).visits += 1;
            current = tree.parent(id);
        }
    }

    fn clone_box(&self) -> Box<dyn BackpropagationPolicy> {
        Box::new(self.clone())
    }
}

#[test]
fn test_custom_policies_are_used() {
    let config = MCTSConfig::default().with_seed(5);
    let mut mcts = MCTS::from_position(race_position(), config)
        .unwrap()
        .with_selection_policy(LastChild)
        .with_backpropagation_policy(VisitsOnly);

    // root -> X@8 -> O@7 is still a non-terminal leaf after 12 iterations
    let results = mcts.run_search(12).unwrap();
    let stats = mcts.get_statistics();
    assert_eq!(stats.fallback_iteration, None);
    assert_eq!(stats.max_depth, 2);

    assert_eq!(results[&8].visits, 8);
    assert!(results.values().all(|s| s.wins == 0));
    assert_eq!(results.values().map(|s| s.visits).sum::<u64>(), 12);
}

#[test]
fn test_search_on_finished_board() {
    // X O X
    // X O O
    // O X X
    let drawn = Position::from_cells([X, O, X, X, O, O, O, X, X]);
    let mut mcts = MCTS::from_position(drawn, MCTSConfig::default()).unwrap();

    let result = mcts.search();
    match result {
        Err(e) => assert!(
            format!("{}", e).contains("No legal moves"),
            "Error should indicate no legal moves"
        ),
        _ => panic!("Unexpected result"),
    }
    assert!(matches!(mcts.best_child(), Err(MCTSError::NoLegalMoves)));
}

#[test]
fn test_impossible_position_is_rejected() {
    let position = Position::from_cells([O, O, E, E, E, E, E, E, E]);
    assert!(matches!(
        MCTS::from_position(position, MCTSConfig::default()),
        Err(MCTSError::InvalidPosition(_))
    ));
}

#[test]
fn test_same_seed_same_statistics() {
    let config = MCTSConfig::default().with_iterations(400).with_seed(99);
    let mut first = MCTS::new(config);
    first.play(0).unwrap();
    let mut second = first.clone();

    let a = first.search().unwrap();
    let b = second.search().unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_self_play_reaches_the_end() {
    init_logging();
    let config = MCTSConfig::default()
        .with_iterations(300)
        .with_seed(2024)
        .with_best_child_criteria(BestChildCriteria::MostVisits);
    let mut mcts = MCTS::new(config).with_simulation_policy(RandomPolicy::new());

    mcts.play_random().unwrap();
    let mut plies = 1;
    while !mcts.is_over() {
        mcts.search().unwrap();
        let mv = mcts.play_best().unwrap();
        assert_eq!(Some(mv.mark), mcts.root_position().get(mv.cell));
        plies += 1;
    }

    assert!((5..=9).contains(&plies));
    let position = mcts.root_position();
    assert!(position.is_terminal());
    assert!(matches!(mcts.play_random(), Err(MCTSError::NoLegalMoves)));
}
