// Per-participant win/loss/draw counters, updated when a session concludes.

use std::collections::HashMap;

use tokio::sync::RwLock;
use ttt_shared::{
    GameResult, LeaderboardEntry, Outcome, ParticipantId, PlayerPublic, PlayerStats,
};

#[derive(Clone, Debug)]
struct Record {
    display_name: String,
    stats: PlayerStats,
}

#[derive(Default)]
pub struct StatsBook {
    records: RwLock<HashMap<ParticipantId, Record>>,
}

impl StatsBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit both seated players with the result of a concluded session.
    pub async fn record_outcome(&self, players: &[PlayerPublic], outcome: Outcome) {
        if players.len() != 2 {
            return;
        }
        let mut records = self.records.write().await;
        for player in players {
            let result = match outcome {
                Outcome::Draw => GameResult::Draw,
                Outcome::Winner(mark) if mark == player.mark => GameResult::Win,
                Outcome::Winner(_) => GameResult::Loss,
            };
            let record = records.entry(player.id.clone()).or_insert_with(|| Record {
                display_name: player.display_name.clone(),
                stats: PlayerStats::default(),
            });
            record.display_name.clone_from(&player.display_name);
            record.stats.record(result);
        }
    }

    /// Counters for `participant`; zeros if they never finished a game.
    pub async fn get(&self, participant: &ParticipantId) -> PlayerStats {
        self.records
            .read()
            .await
            .get(participant)
            .map(|r| r.stats)
            .unwrap_or_default()
    }

    /// Best win rate first, then most games played.
    pub async fn leaderboard(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let records = self.records.read().await;
        let mut entries: Vec<LeaderboardEntry> = records
            .iter()
            .filter(|(_, r)| r.stats.games_played > 0)
            .map(|(id, r)| LeaderboardEntry {
                rank: 0,
                participant_id: id.clone(),
                display_name: r.display_name.clone(),
                stats: r.stats,
                win_rate: r.stats.win_rate(),
            })
            .collect();
        entries.sort_by(|a, b| {
            b.win_rate
                .total_cmp(&a.win_rate)
                .then_with(|| b.stats.games_played.cmp(&a.stats.games_played))
                .then_with(|| a.participant_id.cmp(&b.participant_id))
        });
        for (i, entry) in entries.iter_mut().enumerate() {
            entry.rank = i + 1;
        }
        entries.truncate(limit);
        entries
    }
}
