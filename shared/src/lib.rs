//! Wire types shared by the tic tac toe relay server and its clients.

pub mod api;
pub mod game;
pub mod messages;
pub mod player;

pub use api::*;
pub use game::*;
pub use messages::*;
pub use player::*;
