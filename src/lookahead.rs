use crate::board::{Board, Player};
use crate::config::{EngineConfig, DEFAULT_BEST_MOVES, DEFAULT_PLIES, DEFAULT_REPETITIONS, DEFAULT_WORKERS};
use crate::error::Result;
use crate::random::RandomGenerator;
use crate::rollout::{RankedMove, RolloutEvaluator};
use crate::rules::WinRule;
use crate::search_node::SearchNode;
use ego_tree::{NodeId, Tree};
use tracing::debug;

/// How the lookahead tree grows from one level to the next.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ExpansionPolicy {
    /// The searching player branches into its `K` best moves, the opponent answers with its
    /// single best reply. `K^plies` leaves.
    Narrow,
    /// Both players branch into their `K` best moves. `K^(2 * plies)` leaves.
    Full,
}

/// How the first move is chosen from the evaluated leaves.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum SelectionRule {
    /// The first-ply branch holding the single most promising leaf.
    Greedy,
    /// The first-ply branch whose worst leaf is best.
    ///
    /// The leaf values are Monte Carlo estimates, so this is a minimax over noisy numbers: with
    /// few repetitions the minimum of a branch is biased downwards and the choice gets unstable.
    Minimax,
}

/// Result of a lookahead search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// The chosen first move, with the score the rollout evaluator gave it.
    pub first_move: RankedMove,
    /// Leaf probability that decided the choice (the maximum leaf for greedy selection, the
    /// branch minimum for minimax).
    pub probability: f64,
    /// Index of the chosen branch among the first-ply candidates.
    pub branch: usize,
    /// Number of evaluated leaves.
    pub leaves: usize,
    /// `true` when the search overrides the evaluator's top move.
    pub changed_move: bool,
    /// The explored tree. Leaves carry their probabilities.
    pub tree: Tree<SearchNode>,
}

/// Multi-ply search driving the [`RolloutEvaluator`].
///
/// Levels are expanded one after another; the boards of one level form the ply buffer from
/// which the next level is grown. Every board of a level has the same number of empty fields,
/// so every level has a fixed width and each first-ply branch owns one contiguous chunk of
/// `leaves / K` leaves.
pub struct LookaheadSearch<W: WinRule> {
    evaluator: RolloutEvaluator<W>,
    plies: usize,
    best_moves: usize,
    policy: ExpansionPolicy,
    selection: SelectionRule,
}

/// A builder for creating instances of `LookaheadSearch`.
pub struct LookaheadSearchBuilder<W: WinRule> {
    rule: W,
    repetitions: u32,
    workers: usize,
    plies: usize,
    best_moves: usize,
    policy: ExpansionPolicy,
    selection: SelectionRule,
}

impl<W: WinRule> LookaheadSearchBuilder<W> {
    pub fn new(rule: W) -> Self {
        Self {
            rule,
            repetitions: DEFAULT_REPETITIONS,
            workers: DEFAULT_WORKERS,
            plies: DEFAULT_PLIES,
            best_moves: DEFAULT_BEST_MOVES,
            policy: ExpansionPolicy::Narrow,
            selection: SelectionRule::Greedy,
        }
    }

    pub fn with_repetitions(mut self, repetitions: u32) -> Self {
        self.repetitions = repetitions;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_plies(mut self, plies: usize) -> Self {
        self.plies = plies;
        self
    }

    pub fn with_best_moves(mut self, best_moves: usize) -> Self {
        self.best_moves = best_moves;
        self
    }

    pub fn with_policy(mut self, policy: ExpansionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_selection(mut self, selection: SelectionRule) -> Self {
        self.selection = selection;
        self
    }

    pub fn build(self) -> LookaheadSearch<W> {
        LookaheadSearch {
            evaluator: RolloutEvaluator::new(self.rule, self.repetitions, self.workers),
            plies: self.plies,
            best_moves: self.best_moves.max(1),
            policy: self.policy,
            selection: self.selection,
        }
    }
}

impl<W: WinRule> LookaheadSearch<W> {
    pub fn builder(rule: W) -> LookaheadSearchBuilder<W> {
        LookaheadSearchBuilder::new(rule)
    }

    /// Creates a search from a validated configuration.
    pub fn from_config(rule: W, config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(LookaheadSearchBuilder::new(rule)
            .with_repetitions(config.repetitions)
            .with_workers(config.workers)
            .with_plies(config.plies)
            .with_best_moves(config.best_moves)
            .with_policy(config.policy)
            .with_selection(config.selection)
            .build())
    }

    pub fn evaluator(&self) -> &RolloutEvaluator<W> {
        &self.evaluator
    }

    /// Picks a move for the player to move. `None` on a full board.
    pub fn search<K: RandomGenerator>(&self, board: &Board, rng: &mut K) -> Option<SearchOutcome> {
        let empty = board.empty_count();
        if empty == 0 {
            return None;
        }

        let widths = self.level_widths(empty);
        let mut tree = Tree::new(SearchNode::root(board.clone()));

        if widths.is_empty() {
            let first_move = self.evaluator.best_move(board, rng)?;
            return Some(SearchOutcome {
                first_move,
                probability: first_move.probability(),
                branch: 0,
                leaves: 0,
                changed_move: false,
                tree,
            });
        }

        let mover = board.next_player();
        let leaves = self.expand(&mut tree, &widths, rng);
        let probabilities = self.evaluate_leaves(&mut tree, &leaves, mover, rng);
        let (branch, probability) = self.select(&probabilities, widths[0]);

        let first_move = tree
            .root()
            .children()
            .nth(branch)
            .and_then(|node| node.value().prev_move)?;

        debug!(
            "lookahead picked {} (branch {} of {}), probability={:.3}, leaves={}",
            first_move.coordinate,
            branch,
            widths[0],
            probability,
            leaves.len()
        );

        Some(SearchOutcome {
            first_move,
            probability,
            branch,
            leaves: leaves.len(),
            changed_move: branch != 0,
            tree,
        })
    }

    /// Minimax value of a position for `player`: both sides branch from `board` itself and the
    /// best chunk minimum over the first level is returned.
    pub fn position_value<K: RandomGenerator>(&self, board: &Board, player: Player, rng: &mut K) -> f64 {
        let widths = self.full_widths(board.empty_count());
        if widths.is_empty() {
            return self.evaluator.evaluate_position(board, player, rng);
        }

        let mut tree = Tree::new(SearchNode::root(board.clone()));
        let leaves = self.expand(&mut tree, &widths, rng);
        let probabilities = self.evaluate_leaves(&mut tree, &leaves, player, rng);
        let chunk = chunk_size(probabilities.len(), widths[0]);
        probabilities
            .chunks(chunk)
            .map(|c| c.iter().copied().fold(f64::INFINITY, f64::min))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Branching width of every level, clamped to the empty fields left at that level.
    fn level_widths(&self, empty: usize) -> Vec<usize> {
        match self.policy {
            ExpansionPolicy::Narrow => clamp_widths(&[self.best_moves, 1], self.plies, empty),
            ExpansionPolicy::Full => self.full_widths(empty),
        }
    }

    fn full_widths(&self, empty: usize) -> Vec<usize> {
        clamp_widths(&[self.best_moves, self.best_moves], self.plies, empty)
    }

    /// Grows the tree level by level and returns the leaf ids in buffer order.
    fn expand<K: RandomGenerator>(&self, tree: &mut Tree<SearchNode>, widths: &[usize], rng: &mut K) -> Vec<NodeId> {
        let mut buffer = vec![tree.root().id()];

        for (level, width) in widths.iter().copied().enumerate() {
            let mut next = Vec::with_capacity(buffer.len() * width);
            for id in &buffer {
                let parent = tree.get(*id).expect("buffer ids belong to the tree").value().clone();
                let moves = self.evaluator.best_moves(&parent.board, width, rng);
                assert_eq!(moves.len(), width, "BUG: level {} is narrower than planned", level);

                let mut parent_node = tree.get_mut(*id).expect("buffer ids belong to the tree");
                for ranked in moves {
                    next.push(parent_node.append(SearchNode::child(&parent, ranked)).id());
                }
            }

            debug!("lookahead level {}: width {}, {} boards", level, width, next.len());
            buffer = next;
        }

        buffer
    }

    /// Win probability of `player` at every leaf.
    ///
    /// A leaf whose path already contains a won position takes that result; the remaining leaves
    /// are evaluated by rollouts.
    fn evaluate_leaves<K: RandomGenerator>(
        &self,
        tree: &mut Tree<SearchNode>,
        leaves: &[NodeId],
        player: Player,
        rng: &mut K,
    ) -> Vec<f64> {
        let mut probabilities: Vec<Option<f64>> = leaves.iter().map(|id| self.decided(tree, *id, player)).collect();

        let open: Vec<usize> = (0..leaves.len()).filter(|i| probabilities[*i].is_none()).collect();
        let boards: Vec<Board> = open
            .iter()
            .map(|i| tree.get(leaves[*i]).expect("leaf ids belong to the tree").value().board.clone())
            .collect();
        let estimates = self.evaluator.evaluate_positions(&boards, player, rng);
        for (i, estimate) in open.into_iter().zip(estimates) {
            probabilities[i] = Some(estimate);
        }

        let probabilities: Vec<f64> = probabilities.into_iter().map(|p| p.unwrap_or(0.0)).collect();
        for (id, probability) in leaves.iter().zip(&probabilities) {
            if let Some(mut node) = tree.get_mut(*id) {
                node.value().leaf_probability = Some(*probability);
            }
        }
        probabilities
    }

    /// The result for `player` if some move on the path from the root to `leaf` won the game.
    fn decided(&self, tree: &Tree<SearchNode>, leaf: NodeId, player: Player) -> Option<f64> {
        let node = tree.get(leaf)?;
        let mut path: Vec<_> = node.ancestors().collect();
        path.reverse();
        path.push(node);

        path.iter().find_map(|n| {
            let mover = n.value().mover?;
            self.evaluator
                .rule()
                .has_won(&n.value().board, mover)
                .then_some(if mover == player { 1.0 } else { 0.0 })
        })
    }

    /// Returns the chosen first-ply branch and the probability that decided it.
    fn select(&self, probabilities: &[f64], width: usize) -> (usize, f64) {
        let chunk = chunk_size(probabilities.len(), width);
        match self.selection {
            SelectionRule::Greedy => {
                let mut best = 0;
                for (i, p) in probabilities.iter().enumerate() {
                    if *p > probabilities[best] {
                        best = i;
                    }
                }
                (best / chunk, probabilities[best])
            }
            SelectionRule::Minimax => {
                let mut best_branch = 0;
                let mut best_min = f64::NEG_INFINITY;
                for (branch, leaves) in probabilities.chunks(chunk).enumerate() {
                    let worst = leaves.iter().copied().fold(f64::INFINITY, f64::min);
                    if worst > best_min {
                        best_min = worst;
                        best_branch = branch;
                    }
                }
                (best_branch, best_min)
            }
        }
    }
}

/// Repeats `per_ply` for every ply, clamping each width to the fields still empty and stopping
/// once the board would be full.
fn clamp_widths(per_ply: &[usize], plies: usize, empty: usize) -> Vec<usize> {
    let mut widths = Vec::with_capacity(plies * per_ply.len());
    let mut remaining = empty;
    for _ in 0..plies {
        for width in per_ply {
            if remaining == 0 {
                return widths;
            }
            widths.push((*width).min(remaining));
            remaining -= 1;
        }
    }
    widths
}

/// Leaves per first-ply branch. Fixed-width levels make this exact.
fn chunk_size(leaves: usize, width: usize) -> usize {
    assert!(
        width > 0 && leaves > 0 && leaves % width == 0,
        "BUG: {} leaves cannot be split into {} equal branches",
        leaves,
        width
    );
    leaves / width
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Coordinate, Mark};
    use crate::random::{CustomNumberGenerator, StandardRandomGenerator};
    use crate::rules::WinRuleKind;

    fn board(s: &str) -> Board {
        let marks: Vec<Mark> = s
            .chars()
            .map(|ch| match ch {
                'A' => Mark::First,
                'B' => Mark::Second,
                _ => Mark::Empty,
            })
            .collect();
        let size = (marks.len() as f64).sqrt() as usize;
        Board::from_marks(size, &marks).unwrap()
    }

    #[test]
    fn widths_are_clamped_to_empty_fields() {
        assert_eq!(clamp_widths(&[3, 1], 2, 10), vec![3, 1, 3, 1]);
        assert_eq!(clamp_widths(&[3, 3], 2, 3), vec![3, 3, 1]);
        assert_eq!(clamp_widths(&[2, 1], 0, 9), Vec::<usize>::new());
        assert_eq!(clamp_widths(&[2, 2], 3, 2), vec![2, 2]);
    }

    #[test]
    fn narrow_tree_has_k_to_the_plies_leaves() {
        // arrange
        let search = LookaheadSearch::builder(WinRuleKind::ConnectionSweep)
            .with_repetitions(10)
            .with_plies(2)
            .with_best_moves(3)
            .build();
        let mut rng = CustomNumberGenerator::default();

        // act
        let outcome = search.search(&Board::new(4), &mut rng).unwrap();

        // assert
        assert_eq!(outcome.leaves, 9);
        assert_eq!(outcome.tree.root().children().count(), 3);
        assert!(outcome.branch < 3);
        assert_eq!(outcome.changed_move, outcome.branch != 0);
        let leaves: Vec<_> = outcome
            .tree
            .nodes()
            .filter(|n| n.value().leaf_probability.is_some())
            .collect();
        assert_eq!(leaves.len(), 9);
        assert!(leaves.iter().all(|n| n.value().height == 4));
    }

    #[test]
    fn full_tree_has_k_to_the_two_plies_leaves() {
        let search = LookaheadSearch::builder(WinRuleKind::Line)
            .with_repetitions(10)
            .with_plies(1)
            .with_best_moves(2)
            .with_policy(ExpansionPolicy::Full)
            .with_selection(SelectionRule::Minimax)
            .build();
        let mut rng = CustomNumberGenerator::default();

        let outcome = search.search(&Board::new(3), &mut rng).unwrap();
        assert_eq!(outcome.leaves, 4);
        assert!(outcome.branch < 2);
    }

    #[test]
    fn greedy_maps_leaf_back_to_its_branch() {
        let search = LookaheadSearch::builder(WinRuleKind::Line).build();
        assert_eq!(search.select(&[0.1, 0.2, 0.3, 0.9, 0.4, 0.5], 3), (1, 0.9));
        assert_eq!(search.select(&[0.5, 0.5, 0.5, 0.5], 2), (0, 0.5));
    }

    #[test]
    fn minimax_maximises_the_branch_minimum() {
        let search = LookaheadSearch::builder(WinRuleKind::Line)
            .with_selection(SelectionRule::Minimax)
            .build();
        assert_eq!(search.select(&[0.9, 0.1, 0.4, 0.5, 0.3, 0.35], 3), (1, 0.4));
    }

    #[test]
    #[should_panic]
    fn uneven_chunks_are_a_bug() {
        chunk_size(5, 2);
    }

    #[test]
    fn zero_plies_is_pure_rollout() {
        let search = LookaheadSearch::builder(WinRuleKind::Line)
            .with_repetitions(100)
            .with_plies(0)
            .build();
        let mut rng = StandardRandomGenerator::seeded(5);

        let outcome = search.search(&board("AA_BB____"), &mut rng).unwrap();
        assert_eq!(outcome.first_move.coordinate, Coordinate::new(0, 2));
        assert_eq!(outcome.probability, 1.0);
        assert_eq!(outcome.leaves, 0);
    }

    #[test]
    fn narrow_search_keeps_the_only_winning_move() {
        let search = LookaheadSearch::builder(WinRuleKind::Line)
            .with_repetitions(100)
            .with_plies(1)
            .with_best_moves(2)
            .build();
        let mut rng = StandardRandomGenerator::seeded(5);

        let outcome = search.search(&board("AA_BB____"), &mut rng).unwrap();
        assert_eq!(outcome.first_move.coordinate, Coordinate::new(0, 2));
        assert_eq!(outcome.probability, 1.0);
        assert!(!outcome.changed_move);
    }

    #[test]
    fn leaves_behind_a_won_position_are_decided() {
        // arrange: the second player threatens the top row, (0,2) is the only block
        let search = LookaheadSearch::builder(WinRuleKind::Line)
            .with_repetitions(500)
            .with_plies(1)
            .with_best_moves(2)
            .build();
        let mut rng = StandardRandomGenerator::seeded(9);

        // act
        let outcome = search.search(&board("BB_A____A"), &mut rng).unwrap();

        // assert
        assert_eq!(outcome.first_move.coordinate, Coordinate::new(0, 2));
        let losing = outcome.tree.root().children().nth(1).unwrap();
        let reply = losing.children().next().unwrap();
        assert_eq!(reply.value().prev_move.unwrap().coordinate, Coordinate::new(0, 2));
        assert_eq!(reply.value().leaf_probability, Some(0.0));
    }

    #[test]
    fn full_board_yields_nothing() {
        let search = LookaheadSearch::builder(WinRuleKind::Line).with_repetitions(5).build();
        let mut rng = CustomNumberGenerator::default();
        assert!(search.search(&board("ABAABBBAA"), &mut rng).is_none());
    }

    #[test]
    fn position_value_of_won_position() {
        let search = LookaheadSearch::builder(WinRuleKind::ConnectionSweep)
            .with_repetitions(20)
            .with_plies(1)
            .with_best_moves(2)
            .build();
        let mut rng = CustomNumberGenerator::default();

        let won = board("AB_AB_A__");
        assert_eq!(search.position_value(&won, Player::First, &mut rng), 1.0);
        assert_eq!(search.position_value(&won, Player::Second, &mut rng), 0.0);
    }

    #[test]
    fn from_config_validates() {
        let config = EngineConfig::for_testing().with_repetitions(0);
        assert!(LookaheadSearch::from_config(WinRuleKind::Line, &config).is_err());
        let search = LookaheadSearch::from_config(WinRuleKind::Line, &EngineConfig::for_testing()).unwrap();
        assert_eq!(search.evaluator().repetitions(), 100);
    }
}
