use std::io::IsTerminal;

use serde::Serialize;
use ttt_shared::{
    GameStatistics, LeaderboardEntry, ParticipantId, PlayerStats, ServerMsg, SessionSnapshot,
};

use ttt_server::pretty::format_session_human;

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json_str) => println!("{}", json_str),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

pub struct MessagePrinter {
    json: bool,
    color: bool,
}

impl MessagePrinter {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            color: std::io::stdout().is_terminal(),
        }
    }

    pub fn handle(&self, msg: &ServerMsg) {
        if self.json {
            print_json(msg);
            return;
        }
        match msg {
            ServerMsg::GameUpdate { session } | ServerMsg::Session { session } => {
                self.session(session)
            }
            ServerMsg::Sessions { sessions } => self.sessions(sessions),
            ServerMsg::Subscribed { session_id } => println!("Watching session {}", session_id),
            ServerMsg::Unsubscribed => println!("Stopped watching"),
            ServerMsg::Error { error, code } => eprintln!("Server error ({:?}): {}", code, error),
            ServerMsg::Pong => println!("Received pong"),
        }
    }

    pub fn session(&self, session: &SessionSnapshot) {
        if self.json {
            print_json(session);
        } else {
            println!("{}\n", format_session_human(session, self.color));
        }
    }

    /// One line per session for lobby browsing.
    pub fn sessions(&self, sessions: &[SessionSnapshot]) {
        if self.json {
            print_json(&sessions);
            return;
        }
        if sessions.is_empty() {
            println!("No sessions");
            return;
        }
        for s in sessions {
            let names: Vec<&str> = s.players.iter().map(|p| p.display_name.as_str()).collect();
            println!("{}  {:<22}  {}", s.id, s.status.to_string(), names.join(" vs "));
        }
    }

    pub fn stats(&self, participant: &ParticipantId, stats: &PlayerStats) {
        if self.json {
            print_json(stats);
            return;
        }
        println!(
            "{}: played {}, won {}, lost {}, drew {} (win rate {:.0}%)",
            participant,
            stats.games_played,
            stats.wins,
            stats.losses,
            stats.draws,
            stats.win_rate() * 100.0
        );
    }

    pub fn leaderboard(&self, entries: &[LeaderboardEntry]) {
        if self.json {
            print_json(&entries);
            return;
        }
        if entries.is_empty() {
            println!("No finished games yet");
            return;
        }
        for e in entries {
            println!(
                "{:>2}. {:<20} {:>3} wins  {:>3} games  {:>5.1}%",
                e.rank,
                e.display_name,
                e.stats.wins,
                e.stats.games_played,
                e.win_rate * 100.0
            );
        }
    }

    pub fn statistics(&self, stats: &GameStatistics) {
        if self.json {
            print_json(stats);
            return;
        }
        println!(
            "{} sessions ({} active, {} concluded), {} players",
            stats.total_games, stats.active_games, stats.completed_games, stats.total_players
        );
        match stats.average_game_duration {
            Some(secs) => println!("average game: {:.1}s", secs),
            None => println!("no finished games yet"),
        }
    }
}
