//! reqwest adapter for `RawApiPort`.

use std::time::Duration;

use async_trait::async_trait;
use lifesys_shared::API_PREFIX;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde_json::Value;
use url::Url;

use crate::application::ClientError;
use crate::ports::RawApiPort;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone)]
pub struct ApiAdapter {
    client: Client,
    base_url: String,
}

impl ApiAdapter {
    /// `base_url` is the engine origin, e.g. `http://localhost:3000`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| ClientError::Transport(format!("invalid base URL {base_url}: {e}")))?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Ok(Self {
            client,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    fn request(&self, method: Method, path: &str, token: Option<String>) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Value, ClientError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| ClientError::Transport(e.to_string()))?;
            tracing::debug!(status = status.as_u16(), "API request failed");
            return Err(ClientError::from_status(status.as_u16(), &body));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn send_with_body(
        &self,
        method: Method,
        path: &str,
        token: Option<String>,
        body: Option<Value>,
    ) -> Result<Value, ClientError> {
        let builder = self.request(method, path, token);
        let builder = match body {
            Some(body) => builder.json(&body),
            None => builder,
        };
        self.send(builder).await
    }
}

#[async_trait]
impl RawApiPort for ApiAdapter {
    async fn get_json(&self, path: &str, token: Option<String>) -> Result<Value, ClientError> {
        self.send(self.request(Method::GET, path, token)).await
    }

    async fn post_json(
        &self,
        path: &str,
        token: Option<String>,
        body: Option<Value>,
    ) -> Result<Value, ClientError> {
        self.send_with_body(Method::POST, path, token, body).await
    }

    async fn patch_json(
        &self,
        path: &str,
        token: Option<String>,
        body: Option<Value>,
    ) -> Result<Value, ClientError> {
        self.send_with_body(Method::PATCH, path, token, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard;
    use crate::LifeClient;
    use chrono::Utc;
    use lifesys_engine::infrastructure::clock::SystemClock;
    use lifesys_engine::infrastructure::persistence::SqliteRepositories;
    use lifesys_engine::App;
    use lifesys_shared::{
        Attribute, CreateQuestRequest, LoginRequest, QuestDifficulty, QuestStatus,
        RegisterRequest,
    };
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Serves a fresh engine on an ephemeral port.
    async fn spawn_engine() -> (TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("player.db").display());
        let repos = SqliteRepositories::open(&url, Utc::now()).await.unwrap();
        let app = Arc::new(App::new(
            repos,
            Arc::new(SystemClock::new()),
            chrono::Duration::hours(1),
        ));
        let router = lifesys_engine::api::http::routes().with_state(app);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        (dir, format!("http://{addr}"))
    }

    async fn logged_in_client(base_url: &str, email: &str) -> LifeClient {
        let mut client = LifeClient::new(Arc::new(ApiAdapter::new(base_url).unwrap()));
        client
            .register(&RegisterRequest {
                email: email.into(),
                password: "correct horse".into(),
                name: "Hero".into(),
            })
            .await
            .unwrap();
        client
            .login(&LoginRequest {
                email: email.into(),
                password: "correct horse".into(),
            })
            .await
            .unwrap();
        client
    }

    #[test]
    fn rejects_unparseable_base_url() {
        assert!(ApiAdapter::new("not a url").is_err());
    }

    #[tokio::test]
    async fn quest_round_trip_against_the_engine() {
        let (_dir, base_url) = spawn_engine().await;
        let client = logged_in_client(&base_url, "e2e@example.com").await;

        let quest = client
            .create_quest(&CreateQuestRequest {
                title: "Morning run".into(),
                description: None,
                difficulty: QuestDifficulty::Easy,
                attribute: Attribute::Agility,
                xp_reward: Some(50),
                due_date: None,
            })
            .await
            .unwrap();
        assert_eq!(quest.status, QuestStatus::Active);

        let (completed, data) = dashboard::complete_and_refresh(&client, quest.id)
            .await
            .unwrap();
        assert_eq!(completed.xp_gained, 50);
        assert_eq!(data.stats.total_xp, 50);
        assert_eq!(data.stats.attributes.agility.xp, 50);
        assert!(data.active_quests.is_empty());
        assert_eq!(data.leaderboard[0].total_xp, 50);

        let err = client.complete_quest(quest.id).await.unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(client.player_stats().await.unwrap().total_xp, 50);
    }

    #[tokio::test]
    async fn revoked_session_is_unauthorized() {
        let (_dir, base_url) = spawn_engine().await;
        let mut client = logged_in_client(&base_url, "bye@example.com").await;
        let token = client.session().unwrap().token().to_string();

        client.logout().await.unwrap();

        let raw = ApiAdapter::new(&base_url).unwrap();
        let err = raw.get_json("/auth/me", Some(token)).await.unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized(_)));
    }
}
