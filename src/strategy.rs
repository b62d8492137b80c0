use crate::board::{Board, Coordinate};
use crate::lookahead::LookaheadSearch;
use crate::random::RandomGenerator;
use crate::rollout::RolloutEvaluator;
use crate::rules::WinRule;

/// Something that picks the next move for the player to move.
pub trait Strategy {
    /// Returns the chosen field, or `None` when the strategy has nothing to play.
    fn choose_move(&mut self, board: &Board) -> Option<Coordinate>;
}

/// Plays the top move of a [`RolloutEvaluator`].
pub struct RolloutStrategy<W: WinRule, K: RandomGenerator> {
    evaluator: RolloutEvaluator<W>,
    rng: K,
}

impl<W: WinRule, K: RandomGenerator> RolloutStrategy<W, K> {
    pub fn new(evaluator: RolloutEvaluator<W>, rng: K) -> Self {
        Self { evaluator, rng }
    }
}

impl<W: WinRule, K: RandomGenerator> Strategy for RolloutStrategy<W, K> {
    fn choose_move(&mut self, board: &Board) -> Option<Coordinate> {
        self.evaluator
            .best_move(board, &mut self.rng)
            .map(|ranked| ranked.coordinate)
    }
}

/// Plays the first move picked by a [`LookaheadSearch`].
pub struct LookaheadStrategy<W: WinRule, K: RandomGenerator> {
    search: LookaheadSearch<W>,
    rng: K,
}

impl<W: WinRule, K: RandomGenerator> LookaheadStrategy<W, K> {
    pub fn new(search: LookaheadSearch<W>, rng: K) -> Self {
        Self { search, rng }
    }
}

impl<W: WinRule, K: RandomGenerator> Strategy for LookaheadStrategy<W, K> {
    fn choose_move(&mut self, board: &Board) -> Option<Coordinate> {
        self.search
            .search(board, &mut self.rng)
            .map(|outcome| outcome.first_move.coordinate)
    }
}
