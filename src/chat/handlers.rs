use axum::{extract::State, routing::post, Json, Router};
use tracing::instrument;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::{NewChatMessage, Sender};
use crate::validate::ValidateRequest;

use super::dto::{ChatRequest, ChatResponse};
use super::rules;

pub fn router() -> Router<AppState> {
    Router::new().route("/chat", post(chat))
}

/// One chat turn persists two rows, the inbound message and the bot's reply,
/// both tagged with the matched category. The store writes the pair
/// atomically so a failure cannot leave a half turn behind.
#[instrument(skip(state, payload))]
pub async fn chat(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(mut payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    payload.validate()?;

    let (response, category) = rules::reply(&payload.message);

    state
        .stores
        .chats
        .append_turn(
            NewChatMessage {
                user_id: claims.sub,
                message: payload.message,
                sender: Sender::User,
                category: category.to_string(),
            },
            NewChatMessage {
                user_id: claims.sub,
                message: response.to_string(),
                sender: Sender::Bot,
                category: category.to_string(),
            },
        )
        .await?;

    Ok(Json(ChatResponse {
        success: true,
        response,
        category,
    }))
}
