//! HTTP routes.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use lifesys_domain::QuestId;
use lifesys_shared::{
    BodyMetricResponse, CategoryResponse, CreateBodyMetricRequest, CreateCategoryRequest,
    CreateQuestRequest, CreateTransactionRequest, DailyFinanceResponse, ExpireOverdueResponse,
    FinanceSummaryResponse, FinanceTrendsResponse, HealthResponse, LeaderboardResponse,
    ListQuestsQuery, LoginRequest, PageQuery, PlayerStatsResponse, QuestCompleteResponse,
    QuestResponse, RankQuery, RegisterRequest, TokenResponse, TransactionResponse,
    UpdateStatsRequest, UserResponse, API_PREFIX, TOKEN_TYPE_BEARER,
};

use super::dto;
use super::error::ApiError;
use super::extract::{CurrentUser, ValidJson, ValidQuery};
use crate::app::App;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    let api = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
        .route("/quests", get(list_quests).post(create_quest))
        .route("/quests/expire-overdue", post(expire_overdue))
        .route("/quests/{id}", get(get_quest))
        .route(
            "/quests/{id}/complete",
            patch(complete_quest).post(complete_quest),
        )
        .route("/quests/{id}/cancel", post(cancel_quest))
        .route("/player/stats", get(get_stats).patch(update_stats))
        .route("/stats", get(get_stats).patch(update_stats))
        .route(
            "/finance/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route(
            "/finance/categories",
            get(list_categories).post(create_category),
        )
        .route("/finance/summary", get(finance_summary))
        .route("/finance/daily", get(finance_daily))
        .route("/finance/trends", get(finance_trends))
        .route("/body", get(list_body_metrics).post(create_body_metric))
        .route("/rank", get(leaderboard));

    Router::new()
        .route("/health", get(health))
        .nest(API_PREFIX, api)
}

fn parse_quest_id(raw: &str) -> Result<QuestId, ApiError> {
    QuestId::from_str(raw).map_err(|e| ApiError::BadRequest(e.to_string()))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

// =============================================================================
// Auth
// =============================================================================

async fn register(
    State(app): State<Arc<App>>,
    ValidJson(body): ValidJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = app.use_cases.auth.register.execute(body).await?;
    Ok((StatusCode::CREATED, Json(dto::user(&user))))
}

async fn login(
    State(app): State<Arc<App>>,
    ValidJson(body): ValidJson<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let result = app.use_cases.auth.login.execute(body).await?;
    Ok(Json(TokenResponse {
        access_token: result.token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_at: result.expires_at,
        user: dto::user(&result.user),
    }))
}

async fn logout(
    State(app): State<Arc<App>>,
    current: CurrentUser,
) -> Result<StatusCode, ApiError> {
    app.use_cases.auth.logout.execute(&current.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn me(current: CurrentUser) -> Json<UserResponse> {
    Json(dto::user(&current.user))
}

// =============================================================================
// Quests
// =============================================================================

async fn list_quests(
    State(app): State<Arc<App>>,
    current: CurrentUser,
    ValidQuery(query): ValidQuery<ListQuestsQuery>,
) -> Result<Json<Vec<QuestResponse>>, ApiError> {
    let quests = app
        .use_cases
        .quests
        .list
        .execute(current.user.id(), query.status)
        .await?;
    Ok(Json(quests.iter().map(dto::quest).collect()))
}

async fn create_quest(
    State(app): State<Arc<App>>,
    current: CurrentUser,
    ValidJson(body): ValidJson<CreateQuestRequest>,
) -> Result<(StatusCode, Json<QuestResponse>), ApiError> {
    let quest = app
        .use_cases
        .quests
        .create
        .execute(current.user.id(), body)
        .await?;
    Ok((StatusCode::CREATED, Json(dto::quest(&quest))))
}

async fn get_quest(
    State(app): State<Arc<App>>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<QuestResponse>, ApiError> {
    let quest = app
        .use_cases
        .quests
        .get
        .execute(current.user.id(), parse_quest_id(&id)?)
        .await?;
    Ok(Json(dto::quest(&quest)))
}

async fn complete_quest(
    State(app): State<Arc<App>>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<QuestCompleteResponse>, ApiError> {
    let done = app
        .use_cases
        .quests
        .complete
        .execute(current.user.id(), parse_quest_id(&id)?)
        .await?;
    Ok(Json(dto::completion(&done)))
}

async fn cancel_quest(
    State(app): State<Arc<App>>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<QuestResponse>, ApiError> {
    let quest = app
        .use_cases
        .quests
        .cancel
        .execute(current.user.id(), parse_quest_id(&id)?)
        .await?;
    Ok(Json(dto::quest(&quest)))
}

async fn expire_overdue(
    State(app): State<Arc<App>>,
    current: CurrentUser,
) -> Result<Json<ExpireOverdueResponse>, ApiError> {
    let expired = app
        .use_cases
        .quests
        .expire_overdue
        .execute(current.user.id())
        .await?;
    Ok(Json(ExpireOverdueResponse {
        expired: expired.into_iter().map(QuestId::to_uuid).collect(),
    }))
}

// =============================================================================
// Player stats & leaderboard
// =============================================================================

async fn get_stats(
    State(app): State<Arc<App>>,
    current: CurrentUser,
) -> Result<Json<PlayerStatsResponse>, ApiError> {
    let stats = app.use_cases.stats.get.execute(current.user.id()).await?;
    Ok(Json(dto::stats(&stats)))
}

async fn update_stats(
    State(app): State<Arc<App>>,
    current: CurrentUser,
    ValidJson(body): ValidJson<UpdateStatsRequest>,
) -> Result<Json<PlayerStatsResponse>, ApiError> {
    let stats = app
        .use_cases
        .stats
        .update
        .execute(current.user.id(), body)
        .await?;
    Ok(Json(dto::stats(&stats)))
}

async fn leaderboard(
    State(app): State<Arc<App>>,
    ValidQuery(query): ValidQuery<RankQuery>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    let ranked = app
        .use_cases
        .stats
        .leaderboard
        .execute(query.limit())
        .await?;
    Ok(Json(LeaderboardResponse {
        entries: ranked.into_iter().map(dto::ranked).collect(),
    }))
}

// =============================================================================
// Finance
// =============================================================================

async fn list_transactions(
    State(app): State<Arc<App>>,
    current: CurrentUser,
    ValidQuery(page): ValidQuery<PageQuery>,
) -> Result<Json<Vec<TransactionResponse>>, ApiError> {
    let transactions = app
        .use_cases
        .finance
        .transactions
        .list(current.user.id(), page)
        .await?;
    Ok(Json(transactions.iter().map(dto::transaction).collect()))
}

async fn create_transaction(
    State(app): State<Arc<App>>,
    current: CurrentUser,
    ValidJson(body): ValidJson<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<TransactionResponse>), ApiError> {
    let transaction = app
        .use_cases
        .finance
        .transactions
        .create(current.user.id(), body)
        .await?;
    Ok((StatusCode::CREATED, Json(dto::transaction(&transaction))))
}

async fn list_categories(
    State(app): State<Arc<App>>,
    current: CurrentUser,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let categories = app
        .use_cases
        .finance
        .categories
        .list(current.user.id())
        .await?;
    Ok(Json(categories.iter().map(dto::category).collect()))
}

async fn create_category(
    State(app): State<Arc<App>>,
    current: CurrentUser,
    ValidJson(body): ValidJson<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiError> {
    let category = app
        .use_cases
        .finance
        .categories
        .create(current.user.id(), body)
        .await?;
    Ok((StatusCode::CREATED, Json(dto::category(&category))))
}

async fn finance_summary(
    State(app): State<Arc<App>>,
    current: CurrentUser,
) -> Result<Json<FinanceSummaryResponse>, ApiError> {
    let summary = app
        .use_cases
        .finance
        .reports
        .summary(current.user.id())
        .await?;
    Ok(Json(dto::summary(summary)))
}

async fn finance_daily(
    State(app): State<Arc<App>>,
    current: CurrentUser,
) -> Result<Json<DailyFinanceResponse>, ApiError> {
    let buckets = app
        .use_cases
        .finance
        .reports
        .daily(current.user.id())
        .await?;
    Ok(Json(dto::daily(buckets)))
}

async fn finance_trends(
    State(app): State<Arc<App>>,
    current: CurrentUser,
) -> Result<Json<FinanceTrendsResponse>, ApiError> {
    let trends = app
        .use_cases
        .finance
        .reports
        .trends(current.user.id())
        .await?;
    Ok(Json(dto::trends(trends)))
}

// =============================================================================
// Body metrics
// =============================================================================

async fn list_body_metrics(
    State(app): State<Arc<App>>,
    current: CurrentUser,
    ValidQuery(page): ValidQuery<PageQuery>,
) -> Result<Json<Vec<BodyMetricResponse>>, ApiError> {
    let metrics = app
        .use_cases
        .body
        .list(current.user.id(), page)
        .await?;
    Ok(Json(metrics.iter().map(dto::body_metric).collect()))
}

async fn create_body_metric(
    State(app): State<Arc<App>>,
    current: CurrentUser,
    ValidJson(body): ValidJson<CreateBodyMetricRequest>,
) -> Result<(StatusCode, Json<BodyMetricResponse>), ApiError> {
    let metric = app
        .use_cases
        .body
        .create(current.user.id(), body)
        .await?;
    Ok((StatusCode::CREATED, Json(dto::body_metric(&metric))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::SystemClock;
    use crate::infrastructure::persistence::{test_support::test_pool, SqliteRepositories};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use axum::response::Response;
    use lifesys_shared::ErrorBody;
    use serde::de::DeserializeOwned;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn test_router() -> (TempDir, Router) {
        let (dir, pool) = test_pool().await;
        let app = App::new(
            SqliteRepositories::new(pool),
            Arc::new(SystemClock::new()),
            chrono::Duration::hours(1),
        );
        (dir, routes().with_state(Arc::new(app)))
    }

    async fn send(
        router: &Router,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut request = Request::builder()
            .method(method)
            .uri(format!("{API_PREFIX}{path}"));
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        router.clone().oneshot(request).await.unwrap()
    }

    async fn read<T: DeserializeOwned>(response: Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn sign_up(router: &Router, email: &str) -> String {
        let response = send(
            router,
            "POST",
            "/auth/register",
            None,
            Some(json!({"email": email, "password": "correct horse", "name": "Hero"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = send(
            router,
            "POST",
            "/auth/login",
            None,
            Some(json!({"email": email, "password": "correct horse"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let token: TokenResponse = read(response).await;
        assert_eq!(token.token_type, TOKEN_TYPE_BEARER);
        token.access_token
    }

    #[tokio::test]
    async fn health_is_outside_the_prefix() {
        let (_dir, router) = test_router().await;
        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: HealthResponse = read(response).await;
        assert_eq!(body.status, "ok");
    }

    #[tokio::test]
    async fn protected_routes_require_a_token() {
        let (_dir, router) = test_router().await;

        let response = send(&router, "GET", "/player/stats", None, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: ErrorBody = read(response).await;
        assert_eq!(body.error, "unauthorized");

        let response = send(&router, "GET", "/quests", Some("not-a-session"), None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn completing_twice_conflicts_and_keeps_stats() {
        let (_dir, router) = test_router().await;
        let token = sign_up(&router, "hero@example.com").await;

        let response = send(
            &router,
            "POST",
            "/quests",
            Some(&token),
            Some(json!({"title": "Squat session", "difficulty": "hard", "attribute": "strength"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let quest: QuestResponse = read(response).await;
        assert_eq!(quest.xp_reward, 50);

        let path = format!("/quests/{}/complete", quest.id);
        let response = send(&router, "PATCH", &path, Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let done: QuestCompleteResponse = read(response).await;
        assert_eq!(done.xp_gained, 50);
        assert_eq!(done.stats.total_xp, 50);
        assert_eq!(done.stats.attributes.strength.xp, 50);
        assert_eq!(done.stats.quests_completed, 1);
        assert!(!done.level_up);

        let response = send(&router, "POST", &path, Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body: ErrorBody = read(response).await;
        assert_eq!(body.error, "conflict");

        let response = send(&router, "GET", "/stats", Some(&token), None).await;
        let stats: PlayerStatsResponse = read(response).await;
        assert_eq!(stats.total_xp, 50);
        assert_eq!(stats.quests_completed, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn parallel_completions_of_distinct_quests_all_succeed() {
        let (_dir, router) = test_router().await;
        let token = sign_up(&router, "busy@example.com").await;

        let mut paths = Vec::new();
        for i in 0..10 {
            let response = send(
                &router,
                "POST",
                "/quests",
                Some(&token),
                Some(json!({"title": format!("Rep {i}"), "difficulty": "hard", "attribute": "agility"})),
            )
            .await;
            let quest: QuestResponse = read(response).await;
            paths.push(format!("/quests/{}/complete", quest.id));
        }

        let handles: Vec<_> = paths
            .into_iter()
            .map(|path| {
                let router = router.clone();
                let token = token.clone();
                tokio::spawn(async move { send(&router, "PATCH", &path, Some(&token), None).await.status() })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.await.unwrap(), StatusCode::OK);
        }

        let response = send(&router, "GET", "/player/stats", Some(&token), None).await;
        let stats: PlayerStatsResponse = read(response).await;
        assert_eq!(stats.total_xp, 500);
        assert_eq!(stats.attributes.agility.xp, 500);
        assert_eq!(stats.quests_completed, 10);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let (_dir, router) = test_router().await;
        sign_up(&router, "twin@example.com").await;

        let response = send(
            &router,
            "POST",
            "/auth/register",
            None,
            Some(json!({"email": "twin@example.com", "password": "another pass", "name": "Twin"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn malformed_bodies_and_ids_are_bad_requests() {
        let (_dir, router) = test_router().await;
        let token = sign_up(&router, "strict@example.com").await;

        let response = send(
            &router,
            "POST",
            "/quests",
            Some(&token),
            Some(json!({"title": "Roll a d20", "attribute": "luck"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorBody = read(response).await;
        assert_eq!(body.error, "bad_request");

        let response = send(&router, "GET", "/quests/not-a-uuid", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(
            &router,
            "PATCH",
            "/player/stats",
            Some(&token),
            Some(json!({"total_xp": 1_000_000})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn logout_revokes_the_token() {
        let (_dir, router) = test_router().await;
        let token = sign_up(&router, "leaver@example.com").await;

        let response = send(&router, "GET", "/auth/me", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let me: UserResponse = read(response).await;
        assert_eq!(me.email, "leaver@example.com");

        let response = send(&router, "POST", "/auth/logout", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&router, "GET", "/auth/me", Some(&token), None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn transactions_feed_the_daily_report() {
        let (_dir, router) = test_router().await;
        let token = sign_up(&router, "saver@example.com").await;

        let response = send(&router, "GET", "/finance/categories", Some(&token), None).await;
        let categories: Vec<CategoryResponse> = read(response).await;
        let salary = categories
            .iter()
            .find(|c| c.category_type == lifesys_shared::TransactionType::Income)
            .unwrap();
        let food = categories
            .iter()
            .find(|c| c.category_type == lifesys_shared::TransactionType::Expense)
            .unwrap();

        for (category, kind, amount) in [
            (salary.id, "income", "1000.00"),
            (food.id, "expense", "25.50"),
        ] {
            let response = send(
                &router,
                "POST",
                "/finance/transactions",
                Some(&token),
                Some(json!({
                    "category_id": category,
                    "type": kind,
                    "amount": amount,
                    "date": "2026-03-01T10:00:00Z"
                })),
            )
            .await;
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = send(&router, "GET", "/finance/daily", Some(&token), None).await;
        let daily: DailyFinanceResponse = read(response).await;
        assert_eq!(daily.days.len(), 1);
        assert_eq!(daily.days[0].income, rust_decimal::Decimal::new(100_000, 2));
        assert_eq!(daily.days[0].expense, rust_decimal::Decimal::new(2_550, 2));
    }

    #[tokio::test]
    async fn leaderboard_is_public() {
        let (_dir, router) = test_router().await;
        sign_up(&router, "first@example.com").await;

        let response = send(&router, "GET", "/rank?limit=5", None, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let board: LeaderboardResponse = read(response).await;
        assert_eq!(board.entries.len(), 1);
        assert_eq!(board.entries[0].position, 1);
        assert_eq!(board.entries[0].level, 1);
    }
}
