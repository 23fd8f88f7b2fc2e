use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

/// Server CLI for ttt-server
#[derive(Parser, Debug, Clone)]
#[command(name = "ttt-server", version, about = "Tic tac toe session relay")]
pub struct ServerCli {
    /// Path to config file
    #[arg(long, default_value = "ttt-server.toml")]
    pub config: PathBuf,

    /// Address to bind (overrides config.bind)
    #[arg(long)]
    pub bind: Option<String>,

    /// First port to try (overrides config.port)
    #[arg(long)]
    pub port: Option<u16>,

    /// Seconds to keep concluded sessions, 0 keeps them forever (overrides config)
    #[arg(long)]
    pub ttl: Option<u64>,

    /// Directory with a browser UI to serve at `/` (overrides config)
    #[arg(long)]
    pub static_dir: Option<PathBuf>,

    /// Persist CLI overrides back to the config file
    #[arg(long, default_value_t = false)]
    pub persist: bool,

    /// Verbose logging with targets, threads and source locations
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

impl ServerCli {
    /// Apply CLI overrides in-memory. Returns whether anything changed.
    pub fn apply_overrides(&self, cfg: &mut Config) -> bool {
        let before = cfg.clone();
        if let Some(bind) = &self.bind {
            cfg.bind = bind.clone();
        }
        if let Some(port) = self.port {
            cfg.port = port;
        }
        if let Some(ttl) = self.ttl {
            cfg.concluded_ttl_secs = ttl;
        }
        if let Some(dir) = &self.static_dir {
            cfg.static_dir = Some(dir.clone());
        }
        *cfg != before
    }
}
