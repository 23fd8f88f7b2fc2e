use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use ttt_shared::{
    ErrorResponse, LeaderboardResponse, MoveRequest, ParticipantId, SeatRequest, SessionFilter,
    SessionResponse, SessionSnapshot, SessionsResponse, StatisticsResponse, StatsResponse,
};

/// Parse `base`, assuming http when no scheme is given.
fn parse_base(base: &str) -> anyhow::Result<Url> {
    let url = if base.contains("://") {
        Url::parse(base)
    } else {
        Url::parse(&format!("http://{}", base))
    };
    url.with_context(|| format!("parsing server address '{}'", base))
}

/// Normalize a base string to an http(s) URL without a path.
pub fn build_http_url(base: &str) -> anyhow::Result<Url> {
    let mut url = parse_base(base)?;
    match url.scheme() {
        "ws" => url.set_scheme("http").ok(),
        "wss" => url.set_scheme("https").ok(),
        "http" | "https" => Some(()),
        _ => None,
    }
    .ok_or_else(|| anyhow::anyhow!("Unsupported URL scheme: {}", url.scheme()))?;
    url.set_path("/");
    Ok(url)
}

/// Try to build a websocket URL from a base string (like "localhost:3000" or "http://host:3000")
pub fn build_ws_url(base: &str) -> anyhow::Result<Url> {
    let mut url = parse_base(base)?;

    match url.scheme() {
        "http" => url.set_scheme("ws").ok(),
        "https" => url.set_scheme("wss").ok(),
        "ws" | "wss" => Some(()),
        _ => None,
    }
    .ok_or_else(|| anyhow::anyhow!("Unsupported URL scheme: {}", url.scheme()))?;

    // Force path to /ws
    if url.path() != "/ws" {
        url.set_path("/ws");
    }
    Ok(url)
}

/// Thin typed wrapper over the relay's REST API.
pub struct ApiClient {
    base: Url,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base: &str) -> anyhow::Result<Self> {
        Ok(Self {
            base: build_http_url(base)?,
            client: reqwest::Client::new(),
        })
    }

    /// Base URL with its path replaced by `segments`, each percent-encoded,
    /// so ids containing `/` or `?` stay inside their segment.
    fn endpoint(&self, segments: &[&str]) -> anyhow::Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("server address '{}' cannot carry a path", self.base))?
            .clear()
            .extend(segments);
        Ok(url)
    }

    /// Decode a success body, or turn an error body into an `anyhow` error.
    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> anyhow::Result<T> {
        let status = resp.status();
        let bytes = resp.bytes().await.context("reading response body")?;
        if status.is_success() {
            return serde_json::from_slice(&bytes)
                .with_context(|| format!("decoding response ({})", status));
        }
        match serde_json::from_slice::<ErrorResponse>(&bytes) {
            Ok(err) => Err(anyhow::anyhow!(
                "server rejected request ({:?}): {}",
                err.code,
                err.error
            )),
            Err(_) => Err(anyhow::anyhow!(
                "server returned {}: {}",
                status,
                String::from_utf8_lossy(&bytes)
            )),
        }
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> anyhow::Result<T> {
        let resp = self.client.get(self.endpoint(segments)?).send().await?;
        Self::decode(resp).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> anyhow::Result<T> {
        let resp = self
            .client
            .post(self.endpoint(segments)?)
            .json(body)
            .send()
            .await?;
        Self::decode(resp).await
    }

    pub async fn create(&self, seat: &SeatRequest) -> anyhow::Result<SessionSnapshot> {
        let r: SessionResponse = self.post(&["api", "games"], seat).await?;
        Ok(r.session)
    }

    pub async fn list(&self, filter: &SessionFilter) -> anyhow::Result<Vec<SessionSnapshot>> {
        let resp = self
            .client
            .get(self.endpoint(&["api", "games"])?)
            .query(filter)
            .send()
            .await?;
        let r: SessionsResponse = Self::decode(resp).await?;
        Ok(r.sessions)
    }

    pub async fn get_session(&self, id: &str) -> anyhow::Result<SessionSnapshot> {
        let r: SessionResponse = self.get(&["api", "games", id]).await?;
        Ok(r.session)
    }

    pub async fn join(&self, id: &str, seat: &SeatRequest) -> anyhow::Result<SessionSnapshot> {
        let r: SessionResponse = self.post(&["api", "games", id, "join"], seat).await?;
        Ok(r.session)
    }

    pub async fn submit_move(
        &self,
        id: &str,
        mv: &MoveRequest,
    ) -> anyhow::Result<SessionSnapshot> {
        let r: SessionResponse = self.post(&["api", "games", id, "move"], mv).await?;
        Ok(r.session)
    }

    pub async fn stats(&self, participant: &ParticipantId) -> anyhow::Result<StatsResponse> {
        self.get(&["api", "players", participant.0.as_str(), "stats"]).await
    }

    pub async fn leaderboard(&self, limit: usize) -> anyhow::Result<LeaderboardResponse> {
        let resp = self
            .client
            .get(self.endpoint(&["api", "leaderboard"])?)
            .query(&[("limit", limit)])
            .send()
            .await?;
        Self::decode(resp).await
    }

    pub async fn statistics(&self) -> anyhow::Result<StatisticsResponse> {
        self.get(&["api", "statistics"]).await
    }
}
