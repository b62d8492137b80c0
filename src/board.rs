use crate::error::{Error, Result};
use crate::random::RandomGenerator;
use std::fmt;

/// One of the two sides of a game. `First` always opens.
///
/// In the connection game `First` connects the top and bottom rows and `Second` the left and
/// right columns.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Player {
    First = 1,
    Second = 2,
}

impl Player {
    /// Returns the other side.
    pub fn opponent(self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    /// Returns the mark this player leaves on the board.
    pub fn mark(self) -> Mark {
        match self {
            Player::First => Mark::First,
            Player::Second => Mark::Second,
        }
    }
}

/// Content of a single field.
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Mark {
    #[default]
    Empty = 0,
    First = 1,
    Second = 2,
}

impl Mark {
    /// Returns the owner of the mark, `None` for an empty field.
    pub fn player(self) -> Option<Player> {
        match self {
            Mark::Empty => None,
            Mark::First => Some(Player::First),
            Mark::Second => Some(Player::Second),
        }
    }

    /// Value used by the flattened board representation: `1`, `-1` or `0`.
    fn flat_value(self, reverse_players: bool) -> i8 {
        match (self, reverse_players) {
            (Mark::Empty, _) => 0,
            (Mark::First, false) | (Mark::Second, true) => 1,
            (Mark::First, true) | (Mark::Second, false) => -1,
        }
    }
}

/// Row and column of a field.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    pub row: usize,
    pub col: usize,
}

impl Coordinate {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.row, self.col)
    }
}

/// A square grid of marks shared by both games.
///
/// The player to move is never stored: it is derived from the number of moves played, so
/// `place` and `remove` cannot let the two drift apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Mark>,
    empty_count: usize,
}

impl Board {
    /// Creates an empty `size` x `size` board.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Mark::Empty; size * size],
            empty_count: size * size,
        }
    }

    /// Overlays a row-major mark sequence on an empty board.
    ///
    /// The sequence must describe a position reachable by alternating play: the first player
    /// has as many marks as the second one, or exactly one more.
    pub fn from_marks(size: usize, marks: &[Mark]) -> Result<Self> {
        let cells = size * size;
        if marks.len() != cells {
            return Err(Error::InvalidBoardLength {
                expected: cells,
                got: marks.len(),
            });
        }

        let first = marks.iter().filter(|m| **m == Mark::First).count();
        let second = marks.iter().filter(|m| **m == Mark::Second).count();
        if first != second && first != second + 1 {
            return Err(Error::InvalidPieceCounts { first, second });
        }

        Ok(Self {
            size,
            cells: marks.to_vec(),
            empty_count: cells - first - second,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn empty_count(&self) -> usize {
        self.empty_count
    }

    pub fn moves_played(&self) -> usize {
        self.cells.len() - self.empty_count
    }

    /// Returns the player whose turn it is.
    pub fn next_player(&self) -> Player {
        if self.moves_played() % 2 == 0 {
            Player::First
        } else {
            Player::Second
        }
    }

    /// Returns the player who made the last move. On an empty board this is `Second`.
    pub fn last_player(&self) -> Player {
        self.next_player().opponent()
    }

    /// All fields in row-major order.
    pub fn cells(&self) -> &[Mark] {
        &self.cells
    }

    /// Returns the mark at `c`, or `None` when `c` lies outside the board.
    pub fn get(&self, c: Coordinate) -> Option<Mark> {
        self.contains(c).then(|| self.cells[self.index_of(c)])
    }

    /// Returns the mark at `c`.
    ///
    /// # Panics
    ///
    /// Panics when `c` lies outside the board. Use [`get`](Self::get) for unchecked input.
    pub fn mark(&self, c: Coordinate) -> Mark {
        assert!(self.contains(c), "coordinate {} outside of the board", c);
        self.cells[self.index_of(c)]
    }

    pub fn contains(&self, c: Coordinate) -> bool {
        c.row < self.size && c.col < self.size
    }

    /// A move is legal when it is on the board and the field is still empty.
    pub fn is_legal(&self, c: Coordinate) -> bool {
        self.contains(c) && self.cells[self.index_of(c)] == Mark::Empty
    }

    /// Puts `mark` on an empty field. Returns `false`, leaving the board untouched, when the
    /// field is occupied, outside the board, or `mark` is `Empty`.
    pub fn place(&mut self, c: Coordinate, mark: Mark) -> bool {
        if mark == Mark::Empty || !self.is_legal(c) {
            return false;
        }

        let index = self.index_of(c);
        self.cells[index] = mark;
        self.empty_count -= 1;
        true
    }

    /// Places the mark of the player to move.
    pub fn play(&mut self, c: Coordinate) -> bool {
        let mark = self.next_player().mark();
        self.place(c, mark)
    }

    /// Exact inverse of [`place`](Self::place). Returns `false` when the field is already empty.
    pub fn remove(&mut self, c: Coordinate) -> bool {
        if !self.contains(c) {
            return false;
        }

        let index = self.index_of(c);
        if self.cells[index] == Mark::Empty {
            return false;
        }

        self.cells[index] = Mark::Empty;
        self.empty_count += 1;
        true
    }

    /// Coordinates of the empty fields in row-major order.
    pub fn empty_fields(&self) -> Vec<Coordinate> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, m)| **m == Mark::Empty)
            .map(|(i, _)| Coordinate::new(i / self.size, i % self.size))
            .collect()
    }

    /// Translates a row-major linear index, e.g. on a 3x3 board 5 is (1, 2).
    pub fn coordinate_of(&self, index: usize) -> Result<Coordinate> {
        if index >= self.cells.len() {
            return Err(Error::IndexOutOfRange {
                index,
                cells: self.cells.len(),
            });
        }

        Ok(Coordinate::new(index / self.size, index % self.size))
    }

    pub fn index_of(&self, c: Coordinate) -> usize {
        c.row * self.size + c.col
    }

    /// Writes a mark without legality checks and without touching the empty-field count.
    ///
    /// Only the rollout loop uses this: it already knows every write targets a distinct field
    /// and it puts `Mark::Empty` back before the board is observed again.
    pub(crate) fn set_unchecked(&mut self, index: usize, mark: Mark) {
        self.cells[index] = mark;
    }

    /// Space separated marks (`1` first, `-1` second, `0` empty), used for dataset export.
    pub fn to_single_row(&self, reverse_players: bool) -> String {
        self.cells
            .iter()
            .map(|m| m.flat_value(reverse_players).to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Marks for the empty fields (in row-major order) of a legal random completion.
    pub fn random_completion<K: RandomGenerator>(&self, rng: &mut K) -> Vec<Mark> {
        let mut marks = completion_marks(self.empty_count, self.next_player());
        rng.shuffle(&mut marks);
        marks
    }

    /// Returns a copy with every empty field marked by a legal random completion.
    pub fn random_outcome<K: RandomGenerator>(&self, rng: &mut K) -> Board {
        let mut outcome = self.clone();
        let marks = self.random_completion(rng);
        for (c, mark) in self.empty_fields().into_iter().zip(marks) {
            outcome.place(c, mark);
        }
        outcome
    }
}

/// How many marks each side gets when `remaining` fields are filled and `next` moves first.
///
/// Returns `(first, second)`. The side to move gets the odd field, so its count is the ceiling.
pub fn completion_counts(remaining: usize, next: Player) -> (usize, usize) {
    let mover = remaining.div_ceil(2);
    let other = remaining / 2;
    match next {
        Player::First => (mover, other),
        Player::Second => (other, mover),
    }
}

/// Unshuffled legal completion: all first-player marks, then all second-player marks.
pub fn completion_marks(remaining: usize, next: Player) -> Vec<Mark> {
    let (first, second) = completion_counts(remaining, next);
    let mut marks = Vec::with_capacity(remaining);
    marks.resize(first, Mark::First);
    marks.resize(first + second, Mark::Second);
    marks
}
