use crate::board::{Board, Coordinate, Mark, Player};

/// Offsets of the six neighbours of a field on a rhombic Hex board.
const NEIGHBOURS: [(isize, isize); 6] = [(-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0)];

/// Checks whether `player` connects their two edges, by sweeping lines of the board.
///
/// The first player's lines are rows (top to bottom), the second player's are columns (left to
/// right). A field becomes active when it carries the player's mark and touches an active
/// field of the previous line, or an active field of its own line. A single top-down pass misses
/// paths that double back, so downward and upward passes alternate until nothing changes.
/// Nothing is kept between calls.
pub fn has_connection(board: &Board, player: Player) -> bool {
    let n = board.size();
    if n == 0 {
        return false;
    }

    let cells = board.cells();
    let target = player.mark();
    // line-major view: owned[line * n + i]
    let owned: Vec<bool> = (0..n * n)
        .map(|k| {
            let (line, i) = (k / n, k % n);
            let index = match player {
                Player::First => line * n + i,
                Player::Second => i * n + line,
            };
            cells[index] == target
        })
        .collect();

    let mut active = vec![false; n * n];
    for line in 0..n {
        if !owned[line * n..(line + 1) * n].iter().any(|x| *x) {
            // a line without a single own mark cannot be crossed
            return false;
        }
    }
    active[..n].copy_from_slice(&owned[..n]);

    loop {
        let mut changed = false;

        for line in 1..n {
            let prev = (line - 1) * n;
            for i in 0..n {
                let k = line * n + i;
                if !active[k] && owned[k] && (active[prev + i] || (i + 1 < n && active[prev + i + 1])) {
                    active[k] = true;
                    changed = true;
                }
            }
            changed |= spread_within_line(&owned, &mut active, line, n);
        }

        if active[(n - 1) * n..].iter().any(|x| *x) {
            return true;
        }

        for line in (0..n - 1).rev() {
            let next = (line + 1) * n;
            for i in 0..n {
                let k = line * n + i;
                if !active[k] && owned[k] && (active[next + i] || (i > 0 && active[next + i - 1])) {
                    active[k] = true;
                    changed = true;
                }
            }
            changed |= spread_within_line(&owned, &mut active, line, n);
        }

        if !changed {
            return false;
        }
    }
}

/// Activates own fields connected along the line to an already active field.
fn spread_within_line(owned: &[bool], active: &mut [bool], line: usize, n: usize) -> bool {
    let base = line * n;
    let mut changed = false;
    for i in 1..n {
        if !active[base + i] && owned[base + i] && active[base + i - 1] {
            active[base + i] = true;
            changed = true;
        }
    }
    for i in (0..n - 1).rev() {
        if !active[base + i] && owned[base + i] && active[base + i + 1] {
            active[base + i] = true;
            changed = true;
        }
    }
    changed
}

/// Incremental connectivity of a connection game, kept up to date move by move.
///
/// A disjoint-set forest over all fields plus four virtual edge nodes: top and bottom for the
/// first player, left and right for the second. A player has won once their two edge nodes
/// share a root.
#[derive(Debug, Clone)]
pub struct ConnectionTracker {
    size: usize,
    parents: Vec<usize>,
    ranks: Vec<u8>,
}

impl ConnectionTracker {
    pub fn new(size: usize) -> Self {
        let nodes = size * size + 4;
        Self {
            size,
            parents: (0..nodes).collect(),
            ranks: vec![0; nodes],
        }
    }

    /// Builds a tracker for a position by recording every marked field.
    pub fn from_board(board: &Board) -> Self {
        let mut tracker = ConnectionTracker::new(board.size());
        for (index, mark) in board.cells().iter().enumerate() {
            if *mark != Mark::Empty {
                let c = Coordinate::new(index / board.size(), index % board.size());
                tracker.record(board, c);
            }
        }
        tracker
    }

    /// Records the mark that was just placed on `c`. Empty fields are ignored.
    pub fn record(&mut self, board: &Board, c: Coordinate) {
        let Some(player) = board.get(c).and_then(Mark::player) else {
            return;
        };

        let field = board.index_of(c);
        for (dr, dc) in NEIGHBOURS {
            let (Some(row), Some(col)) = (c.row.checked_add_signed(dr), c.col.checked_add_signed(dc)) else {
                continue;
            };
            let neighbour = Coordinate::new(row, col);
            if board.get(neighbour) == Some(player.mark()) {
                self.union(field, board.index_of(neighbour));
            }
        }

        let last = self.size - 1;
        let (near, far) = self.edge_nodes(player);
        let position = match player {
            Player::First => c.row,
            Player::Second => c.col,
        };
        if position == 0 {
            self.union(field, near);
        }
        if position == last {
            self.union(field, far);
        }
    }

    pub fn has_won(&mut self, player: Player) -> bool {
        let (near, far) = self.edge_nodes(player);
        self.find(near) == self.find(far)
    }

    pub fn winner(&mut self) -> Option<Player> {
        [Player::First, Player::Second]
            .into_iter()
            .find(|p| self.has_won(*p))
    }

    fn edge_nodes(&self, player: Player) -> (usize, usize) {
        let base = self.size * self.size;
        match player {
            Player::First => (base, base + 1),
            Player::Second => (base + 2, base + 3),
        }
    }

    fn find(&mut self, mut node: usize) -> usize {
        while self.parents[node] != node {
            self.parents[node] = self.parents[self.parents[node]];
            node = self.parents[node];
        }
        node
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }

        match self.ranks[ra].cmp(&self.ranks[rb]) {
            std::cmp::Ordering::Less => self.parents[ra] = rb,
            std::cmp::Ordering::Greater => self.parents[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parents[rb] = ra;
                self.ranks[ra] += 1;
            }
        }
    }
}
