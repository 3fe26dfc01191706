//! Typed API client.
//!
//! One method per endpoint: build the path, attach the session's bearer
//! token when the endpoint needs one, decode the answer. No retries.

use std::sync::Arc;

use chrono::Utc;
use lifesys_shared::{
    BodyMetricResponse, CategoryResponse, CreateBodyMetricRequest, CreateCategoryRequest,
    CreateQuestRequest, CreateTransactionRequest, DailyFinanceResponse, ExpireOverdueResponse,
    FinanceSummaryResponse, FinanceTrendsResponse, LeaderboardResponse, LoginRequest, PageQuery,
    PlayerStatsResponse, QuestCompleteResponse, QuestResponse, QuestStatus, RegisterRequest,
    TokenResponse, TransactionResponse, UpdateStatsRequest, UserResponse,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;
use uuid::Uuid;

use super::{ClientError, Session};
use crate::ports::RawApiPort;

pub struct LifeClient {
    api: Arc<dyn RawApiPort>,
    session: Option<Session>,
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ClientError> {
    serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))
}

fn encode<T: Serialize>(body: &T) -> Result<Value, ClientError> {
    serde_json::to_value(body).map_err(|e| ClientError::Encode(e.to_string()))
}

fn with_query(path: &str, pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return path.to_string();
    }
    let mut query = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        query.append_pair(key, value);
    }
    format!("{path}?{}", query.finish())
}

fn page_pairs(page: PageQuery) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();
    if let Some(skip) = page.skip {
        pairs.push(("skip", skip.to_string()));
    }
    if let Some(limit) = page.limit {
        pairs.push(("limit", limit.to_string()));
    }
    pairs
}

impl LifeClient {
    pub fn new(api: Arc<dyn RawApiPort>) -> Self {
        Self { api, session: None }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    fn token(&self) -> Result<Option<String>, ClientError> {
        match &self.session {
            Some(session) if !session.is_expired(Utc::now()) => {
                Ok(Some(session.token().to_string()))
            }
            _ => Err(ClientError::NotLoggedIn),
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        decode(self.api.get_json(path, self.token()?).await?)
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ClientError> {
        decode(self.api.post_json(path, self.token()?, body).await?)
    }

    // -------------------------------------------------------------------------
    // Auth
    // -------------------------------------------------------------------------

    pub async fn register(&self, request: &RegisterRequest) -> Result<UserResponse, ClientError> {
        let value = self
            .api
            .post_json("/auth/register", None, Some(encode(request)?))
            .await?;
        decode(value)
    }

    /// Replaces any previous session on success.
    pub async fn login(&mut self, request: &LoginRequest) -> Result<&Session, ClientError> {
        let value = self
            .api
            .post_json("/auth/login", None, Some(encode(request)?))
            .await?;
        let response: TokenResponse = decode(value)?;
        tracing::info!(user = %response.user.email, "Logged in");
        let session = self.session.insert(Session::from(response));
        Ok(&*session)
    }

    /// Revokes the token server-side. The local session is dropped even when
    /// the server call fails.
    pub async fn logout(&mut self) -> Result<(), ClientError> {
        let session = self.session.take().ok_or(ClientError::NotLoggedIn)?;
        self.api
            .post_json("/auth/logout", Some(session.token().to_string()), None)
            .await?;
        Ok(())
    }

    pub async fn me(&self) -> Result<UserResponse, ClientError> {
        self.get("/auth/me").await
    }

    // -------------------------------------------------------------------------
    // Quests
    // -------------------------------------------------------------------------

    pub async fn list_quests(
        &self,
        status: Option<QuestStatus>,
    ) -> Result<Vec<QuestResponse>, ClientError> {
        let pairs: Vec<(&str, String)> = status
            .map(|s| vec![("status", s.as_str().to_string())])
            .unwrap_or_default();
        self.get(&with_query("/quests", &pairs)).await
    }

    pub async fn create_quest(
        &self,
        request: &CreateQuestRequest,
    ) -> Result<QuestResponse, ClientError> {
        self.post("/quests", Some(encode(request)?)).await
    }

    pub async fn get_quest(&self, quest_id: Uuid) -> Result<QuestResponse, ClientError> {
        self.get(&format!("/quests/{quest_id}")).await
    }

    pub async fn complete_quest(
        &self,
        quest_id: Uuid,
    ) -> Result<QuestCompleteResponse, ClientError> {
        let value = self
            .api
            .patch_json(&format!("/quests/{quest_id}/complete"), self.token()?, None)
            .await?;
        decode(value)
    }

    pub async fn cancel_quest(&self, quest_id: Uuid) -> Result<QuestResponse, ClientError> {
        self.post(&format!("/quests/{quest_id}/cancel"), None).await
    }

    pub async fn expire_overdue(&self) -> Result<ExpireOverdueResponse, ClientError> {
        self.post("/quests/expire-overdue", None).await
    }

    // -------------------------------------------------------------------------
    // Stats & leaderboard
    // -------------------------------------------------------------------------

    pub async fn player_stats(&self) -> Result<PlayerStatsResponse, ClientError> {
        self.get("/player/stats").await
    }

    pub async fn update_stats(
        &self,
        request: &UpdateStatsRequest,
    ) -> Result<PlayerStatsResponse, ClientError> {
        let value = self
            .api
            .patch_json("/player/stats", self.token()?, Some(encode(request)?))
            .await?;
        decode(value)
    }

    /// Public; works without a session.
    pub async fn leaderboard(&self, limit: Option<u32>) -> Result<LeaderboardResponse, ClientError> {
        let pairs: Vec<(&str, String)> = limit
            .map(|l| vec![("limit", l.to_string())])
            .unwrap_or_default();
        let value = self
            .api
            .get_json(&with_query("/rank", &pairs), None)
            .await?;
        decode(value)
    }

    // -------------------------------------------------------------------------
    // Finance
    // -------------------------------------------------------------------------

    pub async fn list_transactions(
        &self,
        page: PageQuery,
    ) -> Result<Vec<TransactionResponse>, ClientError> {
        self.get(&with_query("/finance/transactions", &page_pairs(page)))
            .await
    }

    pub async fn create_transaction(
        &self,
        request: &CreateTransactionRequest,
    ) -> Result<TransactionResponse, ClientError> {
        self.post("/finance/transactions", Some(encode(request)?))
            .await
    }

    pub async fn list_categories(&self) -> Result<Vec<CategoryResponse>, ClientError> {
        self.get("/finance/categories").await
    }

    pub async fn create_category(
        &self,
        request: &CreateCategoryRequest,
    ) -> Result<CategoryResponse, ClientError> {
        self.post("/finance/categories", Some(encode(request)?))
            .await
    }

    pub async fn finance_summary(&self) -> Result<FinanceSummaryResponse, ClientError> {
        self.get("/finance/summary").await
    }

    pub async fn finance_daily(&self) -> Result<DailyFinanceResponse, ClientError> {
        self.get("/finance/daily").await
    }

    pub async fn finance_trends(&self) -> Result<FinanceTrendsResponse, ClientError> {
        self.get("/finance/trends").await
    }

    // -------------------------------------------------------------------------
    // Body metrics
    // -------------------------------------------------------------------------

    pub async fn list_body_metrics(
        &self,
        page: PageQuery,
    ) -> Result<Vec<BodyMetricResponse>, ClientError> {
        self.get(&with_query("/body", &page_pairs(page))).await
    }

    pub async fn create_body_metric(
        &self,
        request: &CreateBodyMetricRequest,
    ) -> Result<BodyMetricResponse, ClientError> {
        self.post("/body", Some(encode(request)?)).await
    }
}
