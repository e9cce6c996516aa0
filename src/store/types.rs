use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Account role. New registrations default to `Farmer`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum Role {
    Farmer,
    Admin,
}

/// User record. The password hash is never serialized into responses.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Fields needed to insert a user; the store assigns id and created_at.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "notification_kind", rename_all = "lowercase")]
pub enum NotificationKind {
    Weather,
    Pest,
    Harvest,
    General,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "notification_priority", rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub priority: Priority,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub message: String,
    pub kind: NotificationKind,
    pub priority: Priority,
}

/// One contributing factor attached to a prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Factor {
    pub factor: String,
    pub impact: String,
    pub score: i32,
}

/// Persisted outcome of a /predict call. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub crop: String,
    pub region: String,
    #[serde(rename = "yieldEstimate")]
    pub yield_estimate: f64,
    pub confidence: f64,
    pub factors: Vec<Factor>,
    pub recommendations: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewPrediction {
    pub user_id: Uuid,
    pub crop: String,
    pub region: String,
    pub yield_estimate: f64,
    pub confidence: f64,
    pub factors: Vec<Factor>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "chat_sender", rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChatMessage {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub message: String,
    pub sender: Sender,
    pub category: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewChatMessage {
    pub user_id: Uuid,
    pub message: String,
    pub sender: Sender,
    pub category: String,
}
