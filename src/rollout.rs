use crate::board::{completion_marks, Board, Coordinate, Mark, Player};
use crate::config::{DEFAULT_REPETITIONS, DEFAULT_WORKERS};
use crate::parallel::ParallelRolloutRunner;
use crate::random::RandomGenerator;
use crate::rules::WinRule;
use std::ops::Range;
use tracing::{debug, trace};

/// A candidate move and how many of its rollouts were won by the player who made it.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct RankedMove {
    pub coordinate: Coordinate,
    /// Number of won rollouts.
    pub wins: u32,
    /// Number of rollouts played.
    pub repetitions: u32,
}

impl RankedMove {
    /// Calculates the win rate of this move.
    pub fn probability(&self) -> f64 {
        if self.repetitions == 0 {
            0.0
        } else {
            (self.wins as f64) / (self.repetitions as f64)
        }
    }
}

/// Sorts by descending wins. The sort is stable, so equal scores keep row-major field order.
pub fn rank(moves: &mut [RankedMove]) {
    moves.sort_by(|a, b| b.wins.cmp(&a.wins));
}

/// Estimates, for every empty field, how often the player to move wins after claiming it.
///
/// Each candidate is scored by playing `repetitions` legal random completions of the rest of the
/// board and asking the win rule whether the mover won a playout (for line games: holds a line
/// the opponent does not match). A candidate that wins on the spot scores every repetition.
/// Candidates are split over `workers` threads by a [`ParallelRolloutRunner`].
pub struct RolloutEvaluator<W: WinRule> {
    rule: W,
    repetitions: u32,
    workers: usize,
}

/// A builder for creating instances of `RolloutEvaluator`.
pub struct RolloutEvaluatorBuilder<W: WinRule> {
    rule: W,
    repetitions: u32,
    workers: usize,
}

impl<W: WinRule> RolloutEvaluatorBuilder<W> {
    /// Creates a new builder for the given win rule.
    pub fn new(rule: W) -> Self {
        Self {
            rule,
            repetitions: DEFAULT_REPETITIONS,
            workers: DEFAULT_WORKERS,
        }
    }

    /// Sets the number of rollouts per candidate.
    pub fn with_repetitions(mut self, repetitions: u32) -> Self {
        self.repetitions = repetitions;
        self
    }

    /// Sets the number of worker threads.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Builds the `RolloutEvaluator` instance with the configured parameters.
    pub fn build(self) -> RolloutEvaluator<W> {
        RolloutEvaluator::new(self.rule, self.repetitions, self.workers)
    }
}

impl<W: WinRule> RolloutEvaluator<W> {
    /// Returns a new builder for `RolloutEvaluator`.
    pub fn builder(rule: W) -> RolloutEvaluatorBuilder<W> {
        RolloutEvaluatorBuilder::new(rule)
    }

    /// Creates a new evaluator. Panics when `repetitions` is 0.
    pub fn new(rule: W, repetitions: u32, workers: usize) -> Self {
        assert!(repetitions > 0, "rollout evaluator needs at least one repetition");
        Self {
            rule,
            repetitions,
            workers: workers.max(1),
        }
    }

    pub fn rule(&self) -> &W {
        &self.rule
    }

    pub fn repetitions(&self) -> u32 {
        self.repetitions
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Scores every empty field for the player to move, best first.
    ///
    /// A full board yields an empty ranking.
    pub fn evaluate<K: RandomGenerator>(&self, board: &Board, rng: &mut K) -> Vec<RankedMove> {
        let fields = board.empty_fields();
        if fields.is_empty() {
            return vec![];
        }

        debug!(
            "evaluating {} empty fields for {:?}, repetitions={}, workers={}",
            fields.len(),
            board.next_player(),
            self.repetitions,
            self.workers
        );

        let runner = ParallelRolloutRunner::new(self.workers);
        let mut ranking = runner.run_on_board(board, fields.len(), rng, |copy, range, worker_rng| {
            self.evaluate_fields(copy, &fields, range, worker_rng)
        });
        rank(&mut ranking);
        ranking
    }

    /// The `n` best moves for the player to move.
    pub fn best_moves<K: RandomGenerator>(&self, board: &Board, n: usize, rng: &mut K) -> Vec<RankedMove> {
        let mut ranking = self.evaluate(board, rng);
        ranking.truncate(n);
        ranking
    }

    /// The single best move for the player to move, `None` on a full board.
    pub fn best_move<K: RandomGenerator>(&self, board: &Board, rng: &mut K) -> Option<RankedMove> {
        self.evaluate(board, rng).into_iter().next()
    }

    /// Probability that `player` wins when the rest of `board` is filled by legal random play.
    ///
    /// A board on which the opponent already holds a winning configuration is worth 0, one that
    /// `player` has already won is worth 1.
    pub fn evaluate_position<K: RandomGenerator>(&self, board: &Board, player: Player, rng: &mut K) -> f64 {
        let mut copy = board.clone();
        self.position_wins(&mut copy, player, rng) as f64 / self.repetitions as f64
    }

    /// [`evaluate_position`](Self::evaluate_position) for many boards, split over the workers.
    pub fn evaluate_positions<K: RandomGenerator>(&self, boards: &[Board], player: Player, rng: &mut K) -> Vec<f64> {
        let runner = ParallelRolloutRunner::new(self.workers);
        runner.run(boards.len(), rng, |range, worker_rng| {
            range
                .map(|i| {
                    let mut copy = boards[i].clone();
                    self.position_wins(&mut copy, player, worker_rng) as f64 / self.repetitions as f64
                })
                .collect()
        })
    }

    /// Scores `fields[range]` on the worker's private board.
    ///
    /// The board is written with unchecked placements and is back in its original state when
    /// this returns.
    fn evaluate_fields<K: RandomGenerator>(
        &self,
        board: &mut Board,
        fields: &[Coordinate],
        range: Range<usize>,
        rng: &mut K,
    ) -> Vec<RankedMove> {
        let mover = board.next_player();
        let indices: Vec<usize> = fields.iter().map(|c| board.index_of(*c)).collect();
        // after the candidate is claimed the opponent is due, so it gets the odd field
        let mut completion = completion_marks(indices.len() - 1, mover.opponent());
        let mut moves = Vec::with_capacity(range.len());

        for candidate in range {
            board.set_unchecked(indices[candidate], mover.mark());

            let mut wins = 0;
            if self.rule.wins_playout(board, mover) {
                // the candidate completes a winning configuration, the game ends here
                wins = self.repetitions;
            } else {
                for _ in 0..self.repetitions {
                    rng.shuffle(&mut completion);
                    let others = indices
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| *i != candidate)
                        .map(|(_, index)| *index);
                    for (index, mark) in others.clone().zip(completion.iter()) {
                        board.set_unchecked(index, *mark);
                    }

                    if self.rule.wins_playout(board, mover) {
                        wins += 1;
                    }

                    for index in others {
                        board.set_unchecked(index, Mark::Empty);
                    }
                }
            }

            board.set_unchecked(indices[candidate], Mark::Empty);
            trace!("candidate {} won {}/{}", fields[candidate], wins, self.repetitions);
            moves.push(RankedMove {
                coordinate: fields[candidate],
                wins,
                repetitions: self.repetitions,
            });
        }

        moves
    }

    fn position_wins<K: RandomGenerator>(&self, board: &mut Board, player: Player, rng: &mut K) -> u32 {
        if self.rule.has_won(board, player.opponent()) {
            return 0;
        }
        if self.rule.has_won(board, player) {
            return self.repetitions;
        }

        let indices: Vec<usize> = board.empty_fields().iter().map(|c| board.index_of(*c)).collect();
        let mut completion = completion_marks(indices.len(), board.next_player());

        let mut wins = 0;
        for _ in 0..self.repetitions {
            rng.shuffle(&mut completion);
            for (index, mark) in indices.iter().zip(completion.iter()) {
                board.set_unchecked(*index, *mark);
            }

            if self.rule.wins_playout(board, player) {
                wins += 1;
            }

            for index in &indices {
                board.set_unchecked(*index, Mark::Empty);
            }
        }
        wins
    }
}
