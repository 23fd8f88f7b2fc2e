//! Win and draw detection over the fixed set of board lines.

use ttt_shared::{Board, Mark, Outcome};

/// The 8 triples that win the game: 3 rows, 3 columns, 2 diagonals.
pub const WINNING_LINES: [[usize; 3]; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

fn completes_line(board: &Board, mark: Mark) -> bool {
    WINNING_LINES
        .iter()
        .any(|line| line.iter().all(|&cell| board[cell] == Some(mark)))
}

fn is_full(board: &Board) -> bool {
    board.iter().all(Option::is_some)
}

/// Evaluate the board right after `last` was written.
///
/// Only the mark just played can have completed a line, so it is the only
/// one checked. Returns `None` while the game continues.
pub fn evaluate(board: &Board, last: Mark) -> Option<Outcome> {
    if completes_line(board, last) {
        Some(Outcome::Winner(last))
    } else if is_full(board) {
        Some(Outcome::Draw)
    } else {
        None
    }
}
