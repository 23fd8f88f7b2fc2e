use clap::{Parser, Subcommand};
use ttt_shared::SessionStatus;

#[derive(Parser, Debug, Clone)]
#[command(name = "ttt-cli", version, about = "Headless CLI for the tic tac toe relay", long_about = None)]
pub struct Cli {
    /// Relay address. Accepted forms:
    /// - http(s)://host:port (e.g. --server http://localhost:3000)
    /// - ws(s)://host:port/ws (e.g. --server ws://localhost:3000/ws)
    ///
    /// Requests always go over HTTP and `watch` always uses the WebSocket;
    /// the scheme only picks TLS or not.
    #[arg(long, default_value = "http://localhost:3000")]
    pub server: ServerAddr,

    /// Participant id used for create, join, move and stats
    #[arg(short, long, default_value = "cli")]
    pub participant: String,

    /// Display name used for create and join
    #[arg(short, long, default_value = "CLI")]
    pub name: String,

    /// Output JSON instead of human-readable text
    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create a session and take the X seat
    Create,
    /// List sessions, optionally filtered
    List {
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
        /// Only sessions this participant is seated in
        #[arg(long, default_value_t = false)]
        mine: bool,
        /// Only sessions with a player whose name contains this text
        #[arg(long)]
        name: Option<String>,
        /// Only the N most recent sessions
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print one session
    Get { id: String },
    /// Take the O seat of a waiting session
    Join { id: String },
    /// Place your mark at a cell (0-8, row-major)
    Move { id: String, position: usize },
    /// Print win/loss/draw counters (defaults to --participant)
    Stats { participant: Option<String> },
    /// Print the top players
    Leaderboard {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Print totals over all sessions the relay holds
    Statistics,
    /// Follow a session and print every update as it happens
    Watch { id: String },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum StatusArg {
    Waiting,
    Playing,
    Concluded,
}

impl From<StatusArg> for SessionStatus {
    fn from(s: StatusArg) -> Self {
        match s {
            StatusArg::Waiting => SessionStatus::AwaitingSecondPlayer,
            StatusArg::Playing => SessionStatus::InProgress,
            StatusArg::Concluded => SessionStatus::Concluded,
        }
    }
}

/// Relay base address. Each variant carries the address as given:
/// - Http(address)      : e.g. http://host:port
/// - WebSocket(address) : e.g. ws://host:port/ws
#[derive(Debug, Clone)]
pub enum ServerAddr {
    Http(String),
    WebSocket(String),
}

impl std::str::FromStr for ServerAddr {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("server address cannot be empty".into());
        }
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Ok(ServerAddr::Http(s.to_string()));
        }
        if lower.starts_with("ws://") || lower.starts_with("wss://") {
            return Ok(ServerAddr::WebSocket(s.to_string()));
        }
        Err(format!(
            "unknown server address '{}', expected http(s)://URL or ws(s)://URL",
            s
        ))
    }
}

impl std::fmt::Display for ServerAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerAddr::Http(addr) | ServerAddr::WebSocket(addr) => write!(f, "{}", addr),
        }
    }
}

impl ServerAddr {
    pub fn as_str(&self) -> &str {
        match self {
            ServerAddr::Http(addr) | ServerAddr::WebSocket(addr) => addr,
        }
    }
}
