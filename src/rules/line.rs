use crate::board::{Board, Player};

/// Checks whether `player` owns a full row, column or diagonal.
///
/// Counts own marks per line instead of comparing neighbouring fields, so every line is read
/// exactly once.
pub fn has_line(board: &Board, player: Player) -> bool {
    let n = board.size();
    if n == 0 {
        return false;
    }

    let cells = board.cells();
    let target = player.mark();
    let own = |row: usize, col: usize| (cells[row * n + col] == target) as usize;

    let mut diagonal = 0;
    let mut anti_diagonal = 0;
    for row in 0..n {
        let row_sum: usize = (0..n).map(|col| own(row, col)).sum();
        if row_sum == n {
            return true;
        }
        diagonal += own(row, row);
        anti_diagonal += own(row, n - 1 - row);
    }

    for col in 0..n {
        let col_sum: usize = (0..n).map(|row| own(row, col)).sum();
        if col_sum == n {
            return true;
        }
    }

    diagonal == n || anti_diagonal == n
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Mark;

    fn board(s: &str) -> Board {
        let marks: Vec<Mark> = s
            .chars()
            .map(|ch| match ch {
                'X' => Mark::First,
                'O' => Mark::Second,
                _ => Mark::Empty,
            })
            .collect();
        let size = (marks.len() as f64).sqrt() as usize;
        Board::from_marks(size, &marks).unwrap()
    }

    #[test]
    fn detects_rows_columns_and_diagonals() {
        assert!(has_line(&board("XXXOO____"), Player::First));
        assert!(has_line(&board("XO_XO_X__"), Player::First));
        assert!(has_line(&board("XO__XO__X"), Player::First));
        assert!(has_line(&board("OXXXO__XO"), Player::Second));
        assert!(has_line(&board("X_OXO_O_X"), Player::Second));
    }

    #[test]
    fn incomplete_lines_do_not_count() {
        let b = board("XX_OO____");
        assert!(!has_line(&b, Player::First));
        assert!(!has_line(&b, Player::Second));
        assert!(!has_line(&Board::new(3), Player::First));
    }

    #[test]
    fn works_on_larger_boards() {
        let b = board("XXXOOOO_X_______");
        assert!(!has_line(&b, Player::First));
        let b = board("XXXXOOO_________");
        assert!(has_line(&b, Player::First));
    }
}
