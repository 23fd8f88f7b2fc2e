mod cli;

use clap::Parser;
use cli::{ApiClient, Cli, Commands, MessagePrinter};
use ttt_shared::{MoveRequest, ParticipantId, SeatRequest, SessionFilter, SessionId};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let api = ApiClient::new(cli.server.as_str())?;
    let printer = MessagePrinter::new(cli.json);
    let me = ParticipantId(cli.participant.clone());
    let seat = SeatRequest {
        participant_id: me.clone(),
        display_name: cli.name.clone(),
    };

    match cli.command {
        Commands::Create => {
            let session = api.create(&seat).await?;
            printer.session(&session);
        }
        Commands::List {
            status,
            mine,
            name,
            limit,
        } => {
            let filter = SessionFilter {
                status: status.map(Into::into),
                participant_id: mine.then(|| me.clone()),
                name,
                limit,
            };
            let sessions = api.list(&filter).await?;
            printer.sessions(&sessions);
        }
        Commands::Get { id } => {
            let session = api.get_session(&id).await?;
            printer.session(&session);
        }
        Commands::Join { id } => {
            let session = api.join(&id, &seat).await?;
            printer.session(&session);
        }
        Commands::Move { id, position } => {
            let mv = MoveRequest {
                participant_id: me.clone(),
                position,
            };
            let session = api.submit_move(&id, &mv).await?;
            printer.session(&session);
        }
        Commands::Stats { participant } => {
            let who = participant.map(ParticipantId).unwrap_or(me);
            let resp = api.stats(&who).await?;
            printer.stats(&who, &resp.stats);
        }
        Commands::Leaderboard { limit } => {
            let resp = api.leaderboard(limit).await?;
            printer.leaderboard(&resp.leaderboard);
        }
        Commands::Statistics => {
            let resp = api.statistics().await?;
            printer.statistics(&resp.statistics);
        }
        Commands::Watch { id } => {
            cli::watch_ws(cli.server.as_str(), SessionId(id), cli.json).await?;
        }
    }

    Ok(())
}
