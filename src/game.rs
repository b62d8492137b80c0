use crate::board::{Board, Coordinate, Player};
use crate::error::{Error, Result};
use crate::rules::{line, ConnectionTracker, GameKind};
use crate::strategy::Strategy;
use tracing::debug;

/// How a finished game ended.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct GameResult {
    /// `None` for a draw.
    pub winner: Option<Player>,
    /// Number of moves played.
    pub moves: usize,
}

/// Turn-taking loop between two strategies on one board.
///
/// The connection game keeps a [`ConnectionTracker`] up to date move by move; the line game
/// checks the mover's lines after each move and ends in a draw on a full board.
pub struct Game {
    kind: GameKind,
    board: Board,
    tracker: ConnectionTracker,
    first: Box<dyn Strategy>,
    second: Box<dyn Strategy>,
}

impl Game {
    pub fn new(kind: GameKind, size: usize, first: Box<dyn Strategy>, second: Box<dyn Strategy>) -> Self {
        Self {
            kind,
            board: Board::new(size),
            tracker: ConnectionTracker::new(size),
            first,
            second,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Plays until someone wins, the board is full, or a strategy passes.
    ///
    /// A strategy that returns an off-board field ends the game with
    /// [`Error::CoordinateOutOfRange`], an occupied one with [`Error::IllegalMove`].
    pub fn play(&mut self) -> Result<GameResult> {
        while self.board.empty_count() > 0 {
            let mover = self.board.next_player();
            let strategy = match mover {
                Player::First => &mut self.first,
                Player::Second => &mut self.second,
            };

            let Some(c) = strategy.choose_move(&self.board) else {
                debug!("{:?} passed", mover);
                break;
            };
            if !self.board.contains(c) {
                return Err(Error::CoordinateOutOfRange {
                    row: c.row,
                    col: c.col,
                    size: self.board.size(),
                });
            }
            if !self.board.play(c) {
                return Err(Error::IllegalMove { row: c.row, col: c.col });
            }
            debug!("move {}: {:?} played {}", self.board.moves_played(), mover, c);

            if self.has_won(mover, c) {
                return Ok(GameResult {
                    winner: Some(mover),
                    moves: self.board.moves_played(),
                });
            }
        }

        Ok(GameResult {
            winner: None,
            moves: self.board.moves_played(),
        })
    }

    fn has_won(&mut self, mover: Player, c: Coordinate) -> bool {
        match self.kind {
            GameKind::Hex => {
                self.tracker.record(&self.board, c);
                self.tracker.has_won(mover)
            }
            GameKind::TicTacToe => line::has_line(&self.board, mover),
        }
    }
}
