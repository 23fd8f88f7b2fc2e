// Background eviction of concluded sessions.

use chrono::{DateTime, Utc};

use super::AppState;

/// Remove sessions concluded before `now - ttl` and drop their subscribers.
/// Returns how many sessions were evicted.
pub async fn sweep_once(state: &AppState, now: DateTime<Utc>, ttl: std::time::Duration) -> usize {
    let Ok(ttl) = chrono::Duration::from_std(ttl) else {
        return 0;
    };
    let Some(cutoff) = now.checked_sub_signed(ttl) else {
        return 0;
    };

    let evicted = state.registry.evict_concluded_before(cutoff).await;
    for id in &evicted {
        state.subscriptions.drop_session(id).await;
        tracing::debug!(session = %id, "evicted concluded session");
    }
    if !evicted.is_empty() {
        let remaining = state.registry.len().await;
        tracing::info!(
            evicted = evicted.len(),
            remaining,
            "swept concluded sessions"
        );
    }
    evicted.len()
}

/// Run forever, sweeping on the configured interval. Returns immediately when
/// eviction is disabled.
pub async fn run_sweeper(state: AppState) {
    let Some(ttl) = state.config.concluded_ttl() else {
        tracing::info!("session eviction disabled");
        return;
    };
    let mut ticker = tokio::time::interval(state.config.sweep_interval());
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        sweep_once(&state, Utc::now(), ttl).await;
    }
}
