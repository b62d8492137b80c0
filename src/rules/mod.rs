//! Win detection for the supported games.

/// Connection (Hex-like) win detection: the line sweep and the incremental union-find tracker.
pub mod connection;
/// Line (Tic-Tac-Toe-like) win detection.
pub mod line;

use crate::board::{Board, Player};
pub use connection::ConnectionTracker;

/// Decides whether a player has won on a board.
///
/// Rollouts call this once per playout, so implementations should recompute from the grid
/// cheaply rather than keep state between calls.
pub trait WinRule: Send + Sync {
    /// Returns `true` when `player` has a winning configuration on `board`.
    fn has_won(&self, board: &Board, player: Player) -> bool;

    /// Whether a completed playout counts as a win for `player`.
    ///
    /// The default requires `player` to hold a winning configuration the opponent does not.
    fn wins_playout(&self, board: &Board, player: Player) -> bool {
        self.has_won(board, player) && !self.has_won(board, player.opponent())
    }

    /// Returns the first player found with a winning configuration.
    fn winner(&self, board: &Board) -> Option<Player> {
        [Player::First, Player::Second]
            .into_iter()
            .find(|p| self.has_won(board, *p))
    }
}

/// The built-in win rules. Chosen when a game or evaluator is set up, never inferred from a board.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum WinRuleKind {
    /// Union-find over the fields plus virtual edge nodes, rebuilt from the grid on every call.
    /// Game loops keep a [`ConnectionTracker`] alive instead.
    ConnectionIncremental,
    /// Line sweep over the grid, the fast variant for rollouts.
    ConnectionSweep,
    /// Full row, column or diagonal.
    Line,
}

impl WinRule for WinRuleKind {
    fn has_won(&self, board: &Board, player: Player) -> bool {
        match self {
            WinRuleKind::ConnectionIncremental => ConnectionTracker::from_board(board).has_won(player),
            WinRuleKind::ConnectionSweep => connection::has_connection(board, player),
            WinRuleKind::Line => line::has_line(board, player),
        }
    }

    fn wins_playout(&self, board: &Board, player: Player) -> bool {
        match self {
            // at most one side connects on a hex board
            WinRuleKind::ConnectionIncremental | WinRuleKind::ConnectionSweep => self.has_won(board, player),
            WinRuleKind::Line => line::has_line(board, player) && !line::has_line(board, player.opponent()),
        }
    }
}

/// The supported game families.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum GameKind {
    /// Connect your two opposite edges on a rhombic hex grid.
    Hex,
    /// Fill a complete row, column or diagonal.
    TicTacToe,
}

impl GameKind {
    /// The rule used inside rollouts.
    pub fn rollout_rule(self) -> WinRuleKind {
        match self {
            GameKind::Hex => WinRuleKind::ConnectionSweep,
            GameKind::TicTacToe => WinRuleKind::Line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Mark;

    #[test]
    fn kinds_dispatch_to_their_checks() {
        let marks = [
            Mark::First, Mark::Second, Mark::Empty,
            Mark::First, Mark::Second, Mark::Empty,
            Mark::First, Mark::Empty, Mark::Empty,
        ];
        let board = Board::from_marks(3, &marks).unwrap();

        assert_eq!(WinRuleKind::Line.winner(&board), Some(Player::First));
        assert_eq!(WinRuleKind::ConnectionSweep.winner(&board), Some(Player::First));
        assert_eq!(WinRuleKind::ConnectionIncremental.winner(&board), Some(Player::First));
        assert_eq!(GameKind::Hex.rollout_rule(), WinRuleKind::ConnectionSweep);
        assert_eq!(GameKind::TicTacToe.rollout_rule(), WinRuleKind::Line);
    }

    #[test]
    fn shared_lines_are_not_a_playout_win() {
        // both sides hold a row
        let marks = [
            Mark::First, Mark::First, Mark::First,
            Mark::Second, Mark::Second, Mark::Second,
            Mark::Empty, Mark::Empty, Mark::Empty,
        ];
        let board = Board::from_marks(3, &marks).unwrap();

        assert!(WinRuleKind::Line.has_won(&board, Player::First));
        assert!(!WinRuleKind::Line.wins_playout(&board, Player::First));
        assert!(!WinRuleKind::Line.wins_playout(&board, Player::Second));
    }

    #[test]
    fn no_winner_on_empty_board() {
        let board = Board::new(5);
        assert_eq!(WinRuleKind::Line.winner(&board), None);
        assert_eq!(WinRuleKind::ConnectionSweep.winner(&board), None);
        assert_eq!(WinRuleKind::ConnectionIncremental.winner(&board), None);
    }
}
