use crate::board::{Board, Player};
use crate::rollout::RankedMove;

/// Represents a single node in the lookahead tree.
///
/// Each node stores the position reached, the move that led to it and, once the node turns out
/// to be a leaf, the estimated win probability of the searching player.
#[derive(Debug, Clone)]
pub struct SearchNode {
    /// The position this node represents.
    pub board: Board,
    /// The move that led here from the parent, with its rollout score. `None` for the root.
    pub prev_move: Option<RankedMove>,
    /// The player who made `prev_move`. `None` for the root.
    pub mover: Option<Player>,
    /// The depth of the node in the tree.
    pub height: usize,
    /// Win probability of the searching player, set on leaves only.
    pub leaf_probability: Option<f64>,
}

impl SearchNode {
    pub fn root(board: Board) -> Self {
        SearchNode {
            board,
            prev_move: None,
            mover: None,
            height: 0,
            leaf_probability: None,
        }
    }

    /// Creates the child reached by playing `prev_move` on `parent`.
    pub fn child(parent: &SearchNode, prev_move: RankedMove) -> Self {
        let mover = parent.board.next_player();
        let mut board = parent.board.clone();
        let placed = board.play(prev_move.coordinate);
        debug_assert!(placed, "ranked move must be legal on its parent board");
        SearchNode {
            board,
            prev_move: Some(prev_move),
            mover: Some(mover),
            height: parent.height + 1,
            leaf_probability: None,
        }
    }
}
