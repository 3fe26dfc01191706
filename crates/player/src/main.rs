//! Life System Player - terminal entry point.
//!
//! ```text
//! lifesys-player [dashboard]        stats, active quests, top players
//! lifesys-player complete <id>      complete a quest and show the refreshed dashboard
//! lifesys-player rank [limit]       public leaderboard
//! ```
//!
//! Reads `LIFESYS_API_URL`, `LIFESYS_EMAIL` and `LIFESYS_PASSWORD`.

use std::sync::Arc;

use anyhow::{bail, Context};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use lifesys_player::application::dashboard;
use lifesys_player::infrastructure::http_client::ApiAdapter;
use lifesys_player::ui::dashboard as view;
use lifesys_player::LifeClient;
use lifesys_shared::LoginRequest;

const DEFAULT_API_URL: &str = "http://localhost:3000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lifesys_player=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let api_url = std::env::var("LIFESYS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
    let mut client = LifeClient::new(Arc::new(ApiAdapter::new(&api_url)?));

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] | ["dashboard"] => {
            login(&mut client).await?;
            let data = dashboard::load(&client).await?;
            print!("{}", view::render(&data));
        }
        ["complete", id] => {
            let quest_id: Uuid = id.parse().with_context(|| format!("invalid quest id {id}"))?;
            login(&mut client).await?;
            let (completed, data) = dashboard::complete_and_refresh(&client, quest_id).await?;
            print!("{}", view::render_completion(&completed));
            println!();
            print!("{}", view::render(&data));
        }
        ["rank"] | ["rank", _] => {
            let limit = match args.get(1) {
                Some(raw) => Some(raw.parse().with_context(|| format!("invalid limit {raw}"))?),
                None => None,
            };
            let board = client.leaderboard(limit).await?;
            let mut out = String::new();
            view::render_leaderboard(&mut out, &board.entries);
            print!("{out}");
        }
        other => bail!("unknown command: {}", other.join(" ")),
    }

    if client.is_logged_in() {
        client.logout().await?;
    }
    Ok(())
}

async fn login(client: &mut LifeClient) -> anyhow::Result<()> {
    let email = std::env::var("LIFESYS_EMAIL").context("LIFESYS_EMAIL is not set")?;
    let password = std::env::var("LIFESYS_PASSWORD").context("LIFESYS_PASSWORD is not set")?;
    client.login(&LoginRequest { email, password }).await?;
    Ok(())
}
