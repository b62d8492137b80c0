//! Plain-text dataset export of evaluated positions.
//!
//! Every ranked candidate becomes one line: the board after the mover claimed the candidate,
//! flattened to space separated marks (`1` first player, `-1` second, `0` empty), followed by the
//! candidate's win probability.
//!
//! ```text
//! 1 1 1 -1 -1 0 0 0 0 1
//! ```

use crate::board::Board;
use crate::error::{Error, Result};
use crate::rollout::RankedMove;
use std::io::Write;

pub struct DatasetWriter<W: Write> {
    out: W,
    lines: usize,
}

impl<W: Write> DatasetWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, lines: 0 }
    }

    /// Number of lines written so far.
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Writes one line per candidate in `ranking`.
    ///
    /// With `reverse_players` the first player's marks are written as `-1` and the second
    /// player's as `1`, so datasets from both sides can share the mover's perspective.
    pub fn write_evaluation(&mut self, board: &Board, ranking: &[RankedMove], reverse_players: bool) -> Result<()> {
        let mover = board.next_player().mark();
        let mut position = board.clone();

        for ranked in ranking {
            if !position.place(ranked.coordinate, mover) {
                return Err(Error::IllegalMove {
                    row: ranked.coordinate.row,
                    col: ranked.coordinate.col,
                });
            }
            let line = format!("{} {}", position.to_single_row(reverse_players), ranked.probability());
            position.remove(ranked.coordinate);

            writeln!(self.out, "{}", line).map_err(|source| Error::Io {
                operation: "write dataset line".to_string(),
                source,
            })?;
            self.lines += 1;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush().map_err(|source| Error::Io {
            operation: "flush dataset".to_string(),
            source,
        })
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Coordinate, Mark};
    use std::io;

    fn ranked(row: usize, col: usize, wins: u32) -> RankedMove {
        RankedMove {
            coordinate: Coordinate::new(row, col),
            wins,
            repetitions: 4,
        }
    }

    #[test]
    fn one_line_per_candidate() {
        // arrange
        let marks = [Mark::First, Mark::Empty, Mark::Empty, Mark::Empty];
        let board = Board::from_marks(2, &marks).unwrap();
        let mut writer = DatasetWriter::new(Vec::new());

        // act
        writer
            .write_evaluation(&board, &[ranked(1, 1, 3), ranked(0, 1, 1)], false)
            .unwrap();

        // assert
        assert_eq!(writer.lines(), 2);
        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(text, "1 0 0 -1 0.75\n1 -1 0 0 0.25\n");
    }

    #[test]
    fn reversed_players_swap_signs() {
        let board = Board::new(2);
        let mut writer = DatasetWriter::new(Vec::new());
        writer.write_evaluation(&board, &[ranked(0, 0, 4)], true).unwrap();
        assert_eq!(String::from_utf8(writer.into_inner()).unwrap(), "-1 0 0 0 1\n");
    }

    #[test]
    fn occupied_candidate_is_rejected() {
        let marks = [Mark::First, Mark::Empty, Mark::Empty, Mark::Empty];
        let board = Board::from_marks(2, &marks).unwrap();
        let mut writer = DatasetWriter::new(Vec::new());
        let result = writer.write_evaluation(&board, &[ranked(0, 0, 1)], false);
        assert!(matches!(result, Err(Error::IllegalMove { row: 0, col: 0 })));
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn io_errors_carry_context() {
        let mut writer = DatasetWriter::new(Broken);
        let err = writer
            .write_evaluation(&Board::new(2), &[ranked(0, 0, 1)], false)
            .unwrap_err();
        assert!(err.to_string().starts_with("failed to write dataset line"));
    }
}
