use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tracing::instrument;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::{NewNotification, Notification, NotificationKind, Priority};

pub fn router() -> Router<AppState> {
    Router::new().route("/notifications", get(list_notifications))
}

#[derive(Debug, Serialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<Notification>,
    pub count: usize,
}

#[instrument(skip(state))]
pub async fn list_notifications(
    State(state): State<AppState>,
    AuthUser(_claims): AuthUser,
) -> Result<Json<NotificationsResponse>, ApiError> {
    let notifications = state.stores.notifications.list().await?;
    let count = notifications.len();
    Ok(Json(NotificationsResponse {
        notifications,
        count,
    }))
}

/// Seed batch applied at startup when the notification table is empty.
/// Notifications are read-only to end users; there is no admin CRUD in scope.
pub fn default_notifications() -> Vec<NewNotification> {
    vec![
        NewNotification {
            message: "Heavy rainfall expected in the Rift Valley over the next 48 hours.".into(),
            kind: NotificationKind::Weather,
            priority: Priority::High,
        },
        NewNotification {
            message: "Fall armyworm sightings reported in neighbouring counties. Scout your maize."
                .into(),
            kind: NotificationKind::Pest,
            priority: Priority::Critical,
        },
        NewNotification {
            message: "Optimal harvest window for early-planted maize opens next week.".into(),
            kind: NotificationKind::Harvest,
            priority: Priority::Medium,
        },
        NewNotification {
            message: "New soil-testing subsidy available through county extension offices.".into(),
            kind: NotificationKind::General,
            priority: Priority::Low,
        },
    ]
}
