use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

mod memory;
mod postgres;
pub mod types;

pub use memory::MemStore;
pub use postgres::PgStore;
pub use types::{
    ChatMessage, Factor, NewChatMessage, NewNotification, NewPrediction, NewUser, Notification,
    NotificationKind, PredictionRecord, Priority, Role, Sender, User,
};

#[derive(Debug, Error)]
pub enum StoreError {
    /// The (normalized) email is already taken. Uniqueness is enforced by the
    /// store itself so concurrent registrations resolve to exactly one winner.
    #[error("email already registered")]
    DuplicateEmail,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, new: NewUser) -> Result<User, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Notification>, StoreError>;
    async fn seed(&self, items: Vec<NewNotification>) -> Result<(), StoreError>;
}

#[async_trait]
pub trait PredictionStore: Send + Sync {
    async fn create(&self, new: NewPrediction) -> Result<PredictionRecord, StoreError>;
    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<PredictionRecord>, StoreError>;
}

#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Persist one chat turn atomically: either both rows land or neither.
    async fn append_turn(
        &self,
        user_msg: NewChatMessage,
        bot_msg: NewChatMessage,
    ) -> Result<(ChatMessage, ChatMessage), StoreError>;
    async fn list_by_user(&self, user_id: Uuid, limit: i64)
        -> Result<Vec<ChatMessage>, StoreError>;
}

/// Liveness probe for the health endpoint, separate from process liveness.
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Bundle of store handles injected into handlers. Cloning is cheap.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub notifications: Arc<dyn NotificationStore>,
    pub predictions: Arc<dyn PredictionStore>,
    pub chats: Arc<dyn ChatStore>,
    pub health: Arc<dyn StoreHealth>,
}

impl Stores {
    pub fn in_memory() -> Self {
        let store = Arc::new(MemStore::new());
        Self {
            users: store.clone(),
            notifications: store.clone(),
            predictions: store.clone(),
            chats: store.clone(),
            health: store,
        }
    }

    pub fn postgres(pool: sqlx::PgPool) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self {
            users: store.clone(),
            notifications: store.clone(),
            predictions: store.clone(),
            chats: store.clone(),
            health: store,
        }
    }
}
