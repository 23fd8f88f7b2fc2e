//! Tic tac toe session state machine.
//!
//! `lines` holds the fixed win/draw evaluation; `engine` owns one session's
//! board, seats, turn and lifecycle.

mod engine;
mod lines;

pub use engine::Session;
pub use lines::{evaluate, WINNING_LINES};
