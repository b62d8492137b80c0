extern crate mc_connect;

use mc_connect::board::{Board, Coordinate};
use mc_connect::config::EngineConfig;
use mc_connect::game::Game;
use mc_connect::lookahead::{ExpansionPolicy, LookaheadSearch};
use mc_connect::random::StandardRandomGenerator;
use mc_connect::rollout::RolloutEvaluator;
use mc_connect::rules::GameKind;
use mc_connect::strategy::{LookaheadStrategy, RolloutStrategy};

fn main() -> mc_connect::Result<()> {
    // Initialize tracing, RUST_LOG=mc_connect=debug shows every move
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let kind = GameKind::TicTacToe;
    let config = EngineConfig::default()
        .with_repetitions(300)
        .with_workers(4)
        .with_plies(1)
        .with_best_moves(3)
        .with_policy(ExpansionPolicy::Full);

    // Print the chances of every opening move
    let evaluator = RolloutEvaluator::builder(kind.rollout_rule())
        .with_repetitions(config.repetitions)
        .with_workers(config.workers)
        .build();
    let mut rng = StandardRandomGenerator::default();
    let mut board = Board::new(3);
    board.play(Coordinate::new(1, 1));
    for ranked in evaluator.evaluate(&board, &mut rng) {
        println!("Move: {} = {:.2}%", ranked.coordinate, ranked.probability() * 100.0);
    }

    // Rollout player against lookahead player
    let first = RolloutStrategy::new(evaluator, StandardRandomGenerator::default());
    let second = LookaheadStrategy::new(
        LookaheadSearch::from_config(kind.rollout_rule(), &config)?,
        StandardRandomGenerator::default(),
    );
    let mut game = Game::new(kind, 3, Box::new(first), Box::new(second));
    let result = game.play()?;

    match result.winner {
        Some(player) => println!("{:?} won after {} moves", player, result.moves),
        None => println!("Draw after {} moves", result.moves),
    }
    println!("{}", game.board().to_single_row(false));
    Ok(())
}
