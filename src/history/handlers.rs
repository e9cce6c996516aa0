use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::{ChatMessage, PredictionRecord};

use super::tables;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/yield-history", get(yield_history))
        .route("/weather-history", get(weather_history))
        .route("/my-predictions", get(my_predictions))
        .route("/chat-history", get(chat_history))
}

#[derive(Debug, Deserialize)]
pub struct YieldHistoryQuery {
    pub crop: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct YieldHistoryPoint {
    pub month: &'static str,
    #[serde(rename = "yield")]
    pub value: f64,
}

#[derive(Debug, Serialize)]
pub struct YieldHistoryResponse {
    pub crop: &'static str,
    pub history: Vec<YieldHistoryPoint>,
}

#[instrument]
pub async fn yield_history(
    AuthUser(_claims): AuthUser,
    Query(q): Query<YieldHistoryQuery>,
) -> Json<YieldHistoryResponse> {
    let series = tables::yield_history(q.crop.as_deref().unwrap_or("maize"));
    Json(YieldHistoryResponse {
        crop: series.crop,
        history: series
            .points
            .iter()
            .map(|p| YieldHistoryPoint {
                month: p.month,
                value: p.value,
            })
            .collect(),
    })
}

#[derive(Debug, Deserialize)]
pub struct WeatherHistoryQuery {
    pub location: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WeatherHistoryDay {
    pub day: &'static str,
    pub temperature: f64,
    pub rainfall: f64,
}

#[derive(Debug, Serialize)]
pub struct WeatherHistoryResponse {
    pub location: &'static str,
    pub history: Vec<WeatherHistoryDay>,
}

#[instrument]
pub async fn weather_history(
    AuthUser(_claims): AuthUser,
    Query(q): Query<WeatherHistoryQuery>,
) -> Json<WeatherHistoryResponse> {
    let series = tables::weather_history(q.location.as_deref().unwrap_or("nairobi"));
    Json(WeatherHistoryResponse {
        location: series.region,
        history: series
            .days
            .iter()
            .map(|d| WeatherHistoryDay {
                day: d.day,
                temperature: d.temperature,
                rainfall: d.rainfall,
            })
            .collect(),
    })
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    20
}

impl Pagination {
    /// Client-supplied limits are clamped before they reach a store; a
    /// negative LIMIT is a query error in Postgres.
    fn capped(&self) -> i64 {
        self.limit.clamp(0, 100)
    }
}

#[derive(Debug, Serialize)]
pub struct MyPredictionsResponse {
    pub predictions: Vec<PredictionRecord>,
    pub count: usize,
}

#[instrument(skip(state))]
pub async fn my_predictions(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<MyPredictionsResponse>, ApiError> {
    let predictions = state
        .stores
        .predictions
        .list_by_user(claims.sub, p.capped())
        .await?;
    let count = predictions.len();
    Ok(Json(MyPredictionsResponse { predictions, count }))
}

#[derive(Debug, Serialize)]
pub struct ChatHistoryResponse {
    pub messages: Vec<ChatMessage>,
    pub count: usize,
}

#[instrument(skip(state))]
pub async fn chat_history(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<ChatHistoryResponse>, ApiError> {
    let messages = state.stores.chats.list_by_user(claims.sub, p.capped()).await?;
    let count = messages.len();
    Ok(Json(ChatHistoryResponse { messages, count }))
}
