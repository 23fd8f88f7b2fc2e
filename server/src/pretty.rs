//! Human-readable renderings of sessions for the server console and the CLI.

use owo_colors::OwoColorize;
use ttt_shared::{Board, Mark, Outcome, SessionSnapshot, SessionStatus};

fn format_cell(cell: Option<Mark>, index: usize, color: bool) -> String {
    match cell {
        Some(mark) => {
            let text = mark.to_string();
            if !color {
                return text;
            }
            match mark {
                Mark::X => text.bold().cyan().to_string(),
                Mark::O => text.bold().magenta().to_string(),
            }
        }
        // Empty cells show their index so a player knows what to type.
        None if color => index.to_string().dimmed().to_string(),
        None => index.to_string(),
    }
}

/// Render the board as three rows, e.g. ` X | 1 | O `.
pub fn format_board(board: &Board, color: bool) -> String {
    board
        .chunks(3)
        .enumerate()
        .map(|(row, cells)| {
            let cells: Vec<String> = cells
                .iter()
                .enumerate()
                .map(|(col, &cell)| format_cell(cell, row * 3 + col, color))
                .collect();
            format!(" {} ", cells.join(" | "))
        })
        .collect::<Vec<_>>()
        .join("\n---+---+---\n")
}

pub fn format_outcome(outcome: Outcome, snapshot: &SessionSnapshot, color: bool) -> String {
    let text = match outcome {
        Outcome::Draw => "Draw".to_string(),
        Outcome::Winner(mark) => match snapshot.holder_of(mark) {
            Some(p) => format!("{} ({}) wins", p.display_name, mark),
            None => format!("{} wins", mark),
        },
    };
    if color {
        text.bold().green().to_string()
    } else {
        text
    }
}

fn format_status_line(snapshot: &SessionSnapshot, color: bool) -> String {
    match (snapshot.status, snapshot.outcome) {
        (SessionStatus::Concluded, Some(outcome)) => format_outcome(outcome, snapshot, color),
        (SessionStatus::InProgress, _) => {
            let mark = snapshot.current_mark;
            match snapshot.holder_of(mark) {
                Some(p) => format!("{} to move ({})", mark, p.display_name),
                None => format!("{} to move", mark),
            }
        }
        (status, _) => status.to_string(),
    }
}

/// Multi-line summary: header with players and status, then the board.
pub fn format_session_human(snapshot: &SessionSnapshot, color: bool) -> String {
    let players = if snapshot.players.is_empty() {
        "no players".to_string()
    } else {
        snapshot
            .players
            .iter()
            .map(|p| format!("{}: {} [{}]", p.mark, p.display_name, p.id))
            .collect::<Vec<_>>()
            .join(" vs ")
    };
    let header = format!("Session {} ({})", snapshot.id, snapshot.status);
    let header = if color {
        header.bold().to_string()
    } else {
        header
    };
    format!(
        "{}\n{}\n{}\n{}",
        header,
        players,
        format_status_line(snapshot, color),
        format_board(&snapshot.board, color)
    )
}
