use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tictactoe_mcts::{
    policy::simulation::{RandomPolicy, SimulationPolicy, WinFirstPolicy},
    Mark, Outcome, Position, SearchTree,
};

const X: Option<Mark> = Some(Mark::X);
const O: Option<Mark> = Some(Mark::O);
const E: Option<Mark> = None;

fn win_count(policy: &dyn SimulationPolicy, tree: &SearchTree, seed: u64, runs: usize) -> usize {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..runs)
        .filter(|_| policy.simulate(tree, tree.root(), &mut rng) == Outcome::Win)
        .count()
}

#[test]
fn test_playouts_are_reproducible() {
    let tree = SearchTree::from_position(Position::from_cells([E, E, E, E, X, E, E, E, E])).unwrap();
    let policy = WinFirstPolicy::new();

    let first = win_count(&policy, &tree, 17, 100);
    let second = win_count(&policy, &tree, 17, 100);
    assert_eq!(first, second);
}

#[test]
fn test_win_first_converts_a_double_threat() {
    // X . X
    // . O .
    // X . O     O to move, X threatens both 1 and 3; X just moved
    let tree =
        SearchTree::from_position(Position::from_cells([X, E, X, E, O, E, X, E, O])).unwrap();
    assert_eq!(tree.get(tree.root()).player, Mark::X);

    // Whatever O does, X completes a line on the next move
    assert_eq!(win_count(&WinFirstPolicy::new(), &tree, 1, 50), 50);
}

#[test]
fn test_uniform_rollout_wastes_the_double_threat() {
    let tree =
        SearchTree::from_position(Position::from_cells([X, E, X, E, O, E, X, E, O])).unwrap();

    let wins = win_count(&RandomPolicy::new(), &tree, 1, 200);
    assert!(wins > 0);
    assert!(wins < 200);
}

#[test]
fn test_simulation_policy_cloning() {
    let boxed: Box<dyn SimulationPolicy> = Box::new(WinFirstPolicy::new());
    let cloned = boxed.clone_box();

    let tree = SearchTree::from_position(Position::from_cells([X, X, X, O, O, E, E, E, E])).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    assert_eq!(cloned.simulate(&tree, tree.root(), &mut rng), Outcome::Win);
}
