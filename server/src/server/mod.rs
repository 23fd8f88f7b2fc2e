pub mod game_ops;
pub mod http;
pub mod registry;
pub mod run;
pub mod stats;
pub mod subscriptions;
pub mod sweeper;
pub mod ws;

mod state;

// Export commonly used types and functions
pub use game_ops::{handle_client_msg, Connection};
pub use run::{build_router, run_server};
pub use state::AppState;
