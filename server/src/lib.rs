pub mod cli;
pub mod config;
pub mod error;
pub mod game;
pub mod pretty;
pub mod server;
