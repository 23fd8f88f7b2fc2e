use anyhow::Result;
use serde_json::{json, Value};
use std::net::SocketAddr;

use ttt_server::server::{build_router, AppState};

async fn spawn_server() -> Result<(SocketAddr, tokio::task::JoinHandle<()>)> {
    let app = build_router(AppState::default());
    // Bind to port 0 so the OS chooses an available port.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });
    Ok((addr, handle))
}

struct Api {
    base: String,
    client: reqwest::Client,
}

impl Api {
    fn new(addr: SocketAddr) -> Self {
        Self {
            base: format!("http://{}", addr),
            client: reqwest::Client::new(),
        }
    }

    async fn get(&self, path: &str) -> Result<(u16, Value)> {
        let resp = self
            .client
            .get(format!("{}{}", self.base, path))
            .send()
            .await?;
        Ok((resp.status().as_u16(), resp.json().await?))
    }

    async fn post(&self, path: &str, body: Value) -> Result<(u16, Value)> {
        let resp = self
            .client
            .post(format!("{}{}", self.base, path))
            .json(&body)
            .send()
            .await?;
        Ok((resp.status().as_u16(), resp.json().await?))
    }

    async fn create(&self, participant: &str, name: &str) -> Result<String> {
        let (status, body) = self
            .post(
                "/api/games",
                json!({ "participantId": participant, "displayName": name }),
            )
            .await?;
        assert_eq!(status, 200, "create failed: {}", body);
        Ok(body["session"]["id"].as_str().unwrap().to_string())
    }

    async fn mv(&self, id: &str, participant: &str, position: usize) -> Result<(u16, Value)> {
        self.post(
            &format!("/api/games/{}/move", id),
            json!({ "participantId": participant, "position": position }),
        )
        .await
    }
}

#[tokio::test]
async fn health_reports_ok() -> Result<()> {
    let (addr, server) = spawn_server().await?;
    let api = Api::new(addr);
    let (status, body) = api.get("/health").await?;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "OK");
    assert!(body["timestamp"].is_string());
    server.abort();
    Ok(())
}

#[tokio::test]
async fn create_list_get_and_not_found() -> Result<()> {
    let (addr, server) = spawn_server().await?;
    let api = Api::new(addr);

    let (status, body) = api
        .post(
            "/api/games",
            json!({ "participantId": "p1", "displayName": "Alice" }),
        )
        .await?;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    let session = &body["session"];
    assert_eq!(session["status"], "awaiting-second-player");
    assert_eq!(session["currentMark"], "X");
    assert_eq!(session["players"][0]["displayName"], "Alice");
    assert_eq!(session["players"][0]["mark"], "X");
    assert_eq!(session["board"].as_array().unwrap().len(), 9);
    assert!(session["outcome"].is_null());
    assert!(session.get("concludedAt").is_none());
    let id = session["id"].as_str().unwrap().to_string();

    let (status, body) = api.get("/api/games").await?;
    assert_eq!(status, 200);
    assert_eq!(body["sessions"].as_array().unwrap().len(), 1);

    let (status, body) = api.get(&format!("/api/games/{}", id)).await?;
    assert_eq!(status, 200);
    assert_eq!(body["session"]["id"], id.as_str());

    let (status, body) = api.get("/api/games/does-not-exist").await?;
    assert_eq!(status, 404);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "not found");
    assert_eq!(body["code"], "not_found");

    server.abort();
    Ok(())
}

#[tokio::test]
async fn join_until_full() -> Result<()> {
    let (addr, server) = spawn_server().await?;
    let api = Api::new(addr);
    let id = api.create("p1", "Alice").await?;

    let join = |p: &'static str| json!({ "participantId": p, "displayName": p });
    let (status, body) = api
        .post(&format!("/api/games/{}/join", id), join("p2"))
        .await?;
    assert_eq!(status, 200);
    assert_eq!(body["session"]["status"], "in-progress");
    assert_eq!(body["session"]["players"][1]["mark"], "O");

    let (status, body) = api
        .post(&format!("/api/games/{}/join", id), join("p3"))
        .await?;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "session is full");
    assert_eq!(body["code"], "session_full");

    let (status, _) = api
        .post("/api/games/nope/join", join("p3"))
        .await?;
    assert_eq!(status, 404);

    server.abort();
    Ok(())
}

#[tokio::test]
async fn play_to_a_win_and_check_stats() -> Result<()> {
    let (addr, server) = spawn_server().await?;
    let api = Api::new(addr);
    let id = api.create("p1", "Alice").await?;
    api.post(
        &format!("/api/games/{}/join", id),
        json!({ "participantId": "p2", "displayName": "Bob" }),
    )
    .await?;

    let (status, body) = api.mv(&id, "p2", 0).await?;
    assert_eq!(status, 400);
    assert_eq!(body["code"], "not_your_turn");
    assert!(body["error"].as_str().unwrap().starts_with("invalid move"));

    let (status, body) = api.mv(&id, "p1", 0).await?;
    assert_eq!(status, 200);
    assert_eq!(body["session"]["board"][0], "X");
    assert_eq!(body["session"]["currentMark"], "O");

    let (status, body) = api.mv(&id, "p2", 0).await?;
    assert_eq!(status, 400);
    assert_eq!(body["code"], "cell_occupied");

    let (status, body) = api.mv(&id, "p2", 12).await?;
    assert_eq!(status, 400);
    assert_eq!(body["code"], "invalid_position");

    for (who, cell) in [("p2", 4), ("p1", 1), ("p2", 8)] {
        let (status, _) = api.mv(&id, who, cell).await?;
        assert_eq!(status, 200);
    }
    let (status, body) = api.mv(&id, "p1", 2).await?;
    assert_eq!(status, 200);
    assert_eq!(body["session"]["status"], "concluded");
    assert_eq!(body["session"]["outcome"], json!({ "winner": "X" }));
    assert!(body["session"]["concludedAt"].is_string());

    let (status, body) = api.mv(&id, "p2", 5).await?;
    assert_eq!(status, 400);
    assert_eq!(body["code"], "not_playing");

    let (_, body) = api.get("/api/players/p1/stats").await?;
    assert_eq!(
        body["stats"],
        json!({ "gamesPlayed": 1, "wins": 1, "losses": 0, "draws": 0 })
    );
    let (_, body) = api.get("/api/players/p2/stats").await?;
    assert_eq!(body["stats"]["losses"], 1);
    let (_, body) = api.get("/api/players/nobody/stats").await?;
    assert_eq!(body["stats"]["gamesPlayed"], 0);

    let (_, body) = api.get("/api/leaderboard?limit=1").await?;
    let board = body["leaderboard"].as_array().unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board[0]["participantId"], "p1");
    assert_eq!(board[0]["rank"], 1);

    let (_, body) = api.get("/api/games?status=concluded").await?;
    assert_eq!(body["sessions"].as_array().unwrap().len(), 1);
    let (_, body) = api.get("/api/games?status=in-progress").await?;
    assert!(body["sessions"].as_array().unwrap().is_empty());

    server.abort();
    Ok(())
}

#[tokio::test]
async fn malformed_bodies_are_rejected_like_domain_errors() -> Result<()> {
    let (addr, server) = spawn_server().await?;
    let api = Api::new(addr);

    let (status, body) = api
        .post("/api/games", json!({ "displayName": "no id" }))
        .await?;
    assert_eq!(status, 400);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "malformed");

    let resp = reqwest::Client::new()
        .post(format!("http://{}/api/games", addr))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await?;
    assert_eq!(body["code"], "malformed");

    let (status, body) = api.get("/api/games?status=sideways").await?;
    assert_eq!(status, 400);
    assert_eq!(body["code"], "malformed");

    server.abort();
    Ok(())
}

#[tokio::test]
async fn statistics_and_name_search() -> Result<()> {
    let (addr, server) = spawn_server().await?;
    let api = Api::new(addr);

    let (status, body) = api.get("/api/statistics").await?;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["statistics"],
        json!({
            "totalGames": 0,
            "activeGames": 0,
            "completedGames": 0,
            "totalPlayers": 0,
            "averageGameDuration": null
        })
    );

    let finished = api.create("p1", "Alice").await?;
    api.post(
        &format!("/api/games/{}/join", finished),
        json!({ "participantId": "p2", "displayName": "Bob" }),
    )
    .await?;
    for (who, cell) in [("p1", 0), ("p2", 3), ("p1", 1), ("p2", 4), ("p1", 2)] {
        let (status, _) = api.mv(&finished, who, cell).await?;
        assert_eq!(status, 200);
    }
    let waiting = api.create("p3", "Bobby Tables").await?;

    let (_, body) = api.get("/api/statistics").await?;
    let stats = &body["statistics"];
    assert_eq!(stats["totalGames"], 2);
    assert_eq!(stats["activeGames"], 1);
    assert_eq!(stats["completedGames"], 1);
    assert_eq!(stats["totalPlayers"], 3);
    assert!(stats["averageGameDuration"].as_f64().unwrap() >= 0.0);

    let (status, body) = api.get("/api/games?name=BOB").await?;
    assert_eq!(status, 200);
    let ids: Vec<_> = body["sessions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec![finished, waiting.clone()]);

    let (_, body) = api.get("/api/games?name=tables&status=awaiting-second-player").await?;
    assert_eq!(body["sessions"][0]["id"], waiting.as_str());
    let (_, body) = api.get("/api/games?name=carol").await?;
    assert!(body["sessions"].as_array().unwrap().is_empty());

    server.abort();
    Ok(())
}
