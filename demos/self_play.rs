//! Self-play example for the MCTS engine
//!
//! Builds the full tic-tac-toe tree, opens with a random move and then lets
//! the engine pick every following move for both sides.
//!
//! ```bash
//! RUST_LOG=debug cargo run --release --example self_play -- 5000 42
//! ```

use std::env;

use tictactoe_mcts::{MCTSConfig, MCTSError, MCTS};

fn main() -> Result<(), MCTSError> {
    // Initialize logging
    env_logger::init();

    let mut args = env::args().skip(1);
    let iterations = args
        .next()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(10_000);

    let mut config = MCTSConfig::default().with_iterations(iterations);
    if let Some(seed) = args.next().and_then(|s| s.parse::<u64>().ok()) {
        config = config.with_seed(seed);
    }

    println!("MCTS Tic-Tac-Toe Self-Play");
    println!("==========================");
    println!("Loading nodes into memory...");

    let mut mcts = MCTS::new(config);
    println!("{} nodes", mcts.tree().node_count());
    println!("{}\n", mcts.root_position().render_with_indices());

    // Searching the opening only fills in statistics; the move is random
    mcts.search()?;
    let opening = mcts.play_random()?;
    println!("Opening: {}\n{}\n", opening, mcts.render());

    while !mcts.is_over() {
        let results = mcts.search()?;
        for (cell, stats) in &results {
            println!("{}: {}/{}", cell, stats.wins, stats.visits);
        }

        let mv = mcts.play_best()?;
        println!("Engine plays {}\n{}\n", mv, mcts.render());
        println!("{}\n", mcts.get_statistics().summary());
    }

    match mcts.root_position().winner() {
        Some(winner) => println!("Player {} wins!", winner),
        None => println!("The game is a draw!"),
    }

    Ok(())
}
