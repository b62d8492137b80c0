//! Random, legally reachable board positions for tests and data generation.

use crate::board::{completion_marks, Board, Mark, Player};
use crate::error::{Error, Result};
use crate::random::RandomGenerator;
use crate::rules::WinRule;
use std::collections::HashSet;
use tracing::warn;

/// A board of the given size with `moves` marks scattered over it.
///
/// The first player owns `ceil(moves / 2)` of them, so the position is one a legal game could
/// reach, though it may already contain a winning configuration.
pub fn random_board<K: RandomGenerator>(moves: usize, size: usize, rng: &mut K) -> Result<Board> {
    let cells = size * size;
    if moves > cells {
        return Err(Error::TooManyMoves { moves, cells });
    }

    let mut marks = completion_marks(moves, Player::First);
    marks.resize(cells, Mark::Empty);
    rng.shuffle(&mut marks);
    Board::from_marks(size, &marks)
}

/// [`random_board`] with the number of moves drawn uniformly from `1..=size²`.
pub fn random_board_any<K: RandomGenerator>(size: usize, rng: &mut K) -> Result<Board> {
    let cells = size * size;
    if cells == 0 {
        return Ok(Board::new(size));
    }
    let moves = rng.next_range(1, cells as i32 + 1) as usize;
    random_board(moves, size, rng)
}

/// A random board on which neither player has won yet.
///
/// Boards are drawn until `rule` reports no winner; after `max_attempts` draws
/// [`Error::GenerationExhausted`] is returned.
pub fn unfinished_random_board<K: RandomGenerator, W: WinRule>(
    moves: usize,
    size: usize,
    rule: &W,
    max_attempts: usize,
    rng: &mut K,
) -> Result<Board> {
    for _ in 0..max_attempts {
        let board = random_board(moves, size, rng)?;
        if rule.winner(&board).is_none() {
            return Ok(board);
        }
    }

    warn!(
        "no unfinished {}x{} board with {} moves after {} attempts",
        size, size, moves, max_attempts
    );
    Err(Error::GenerationExhausted { attempts: max_attempts })
}

/// `count` pairwise different random boards.
///
/// Boards are compared by their flattened marks. Gives up with [`Error::GenerationExhausted`]
/// once `max_attempts` draws in total did not produce enough distinct positions.
pub fn distinct_random_boards<K: RandomGenerator>(
    count: usize,
    moves: usize,
    size: usize,
    max_attempts: usize,
    rng: &mut K,
) -> Result<Vec<Board>> {
    let mut seen = HashSet::with_capacity(count);
    let mut boards = Vec::with_capacity(count);

    let mut attempts = 0;
    while boards.len() < count {
        if attempts == max_attempts {
            warn!(
                "only {} of {} distinct boards found after {} attempts",
                boards.len(),
                count,
                attempts
            );
            return Err(Error::GenerationExhausted { attempts });
        }
        attempts += 1;

        let board = random_board(moves, size, rng)?;
        if seen.insert(board.to_single_row(false)) {
            boards.push(board);
        }
    }
    Ok(boards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MAX_ATTEMPTS;
    use crate::random::{CustomNumberGenerator, StandardRandomGenerator};
    use crate::rules::WinRuleKind;

    #[test]
    fn random_board_is_turn_balanced() {
        let mut rng = CustomNumberGenerator::default();
        for moves in 0..=25 {
            let board = random_board(moves, 5, &mut rng).unwrap();
            let first = board.cells().iter().filter(|m| **m == Mark::First).count();
            let second = board.cells().iter().filter(|m| **m == Mark::Second).count();

            assert_eq!(board.moves_played(), moves);
            assert_eq!(first, moves.div_ceil(2));
            assert_eq!(second, moves / 2);
        }
    }

    #[test]
    fn too_many_moves_is_an_error() {
        let mut rng = CustomNumberGenerator::default();
        assert!(matches!(
            random_board(10, 3, &mut rng),
            Err(Error::TooManyMoves { moves: 10, cells: 9 })
        ));
    }

    #[test]
    fn any_board_has_at_least_one_move() {
        let mut rng = StandardRandomGenerator::seeded(3);
        for _ in 0..50 {
            let board = random_board_any(4, &mut rng).unwrap();
            assert!((1..=16).contains(&board.moves_played()));
        }
    }

    #[test]
    fn unfinished_boards_have_no_winner() {
        // arrange
        let mut rng = StandardRandomGenerator::seeded(7);
        let rule = WinRuleKind::ConnectionSweep;

        // act
        let boards: Vec<Board> = (0..20)
            .map(|_| unfinished_random_board(12, 5, &rule, DEFAULT_MAX_ATTEMPTS, &mut rng).unwrap())
            .collect();

        // assert
        assert!(boards.iter().all(|b| rule.winner(b).is_none()));
        assert!(boards.iter().all(|b| b.moves_played() == 12));
    }

    #[test]
    fn impossible_request_is_exhausted() {
        // every completely filled hex board has a winner
        let mut rng = CustomNumberGenerator::default();
        let result = unfinished_random_board(9, 3, &WinRuleKind::ConnectionSweep, 25, &mut rng);
        assert!(matches!(result, Err(Error::GenerationExhausted { attempts: 25 })));
    }

    #[test]
    fn distinct_boards_differ() {
        let mut rng = StandardRandomGenerator::seeded(1);
        let boards = distinct_random_boards(30, 3, 3, DEFAULT_MAX_ATTEMPTS, &mut rng).unwrap();
        let rows: HashSet<String> = boards.iter().map(|b| b.to_single_row(false)).collect();
        assert_eq!(rows.len(), 30);

        // a 2x2 board with one move has only four positions
        let result = distinct_random_boards(5, 1, 2, 200, &mut rng);
        assert!(matches!(result, Err(Error::GenerationExhausted { attempts: 200 })));
    }
}
