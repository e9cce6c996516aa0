use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::types::{
    ChatMessage, NewChatMessage, NewNotification, NewPrediction, NewUser, Notification,
    PredictionRecord, User,
};
use super::{ChatStore, NotificationStore, PredictionStore, StoreError, StoreHealth, UserStore};

/// In-memory store used by tests and when no DATABASE_URL is configured.
/// Each write takes the table's write lock, so the uniqueness check and the
/// insert for a user are a single atomic step.
#[derive(Default)]
pub struct MemStore {
    users: RwLock<Vec<User>>,
    notifications: RwLock<Vec<Notification>>,
    predictions: RwLock<Vec<PredictionRecord>>,
    chats: RwLock<Vec<ChatMessage>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemStore {
    async fn create(&self, new: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == new.email) {
            return Err(StoreError::DuplicateEmail);
        }
        let user = User {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            role: new.role,
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl NotificationStore for MemStore {
    async fn list(&self) -> Result<Vec<Notification>, StoreError> {
        let items = self.notifications.read().await;
        Ok(items.clone())
    }

    async fn seed(&self, items: Vec<NewNotification>) -> Result<(), StoreError> {
        let mut table = self.notifications.write().await;
        if !table.is_empty() {
            return Ok(());
        }
        for item in items {
            table.push(Notification {
                id: Uuid::new_v4(),
                message: item.message,
                kind: item.kind,
                priority: item.priority,
                created_at: OffsetDateTime::now_utc(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PredictionStore for MemStore {
    async fn create(&self, new: NewPrediction) -> Result<PredictionRecord, StoreError> {
        let record = PredictionRecord {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            crop: new.crop,
            region: new.region,
            yield_estimate: new.yield_estimate,
            confidence: new.confidence,
            factors: new.factors,
            recommendations: new.recommendations,
            created_at: OffsetDateTime::now_utc(),
        };
        self.predictions.write().await.push(record.clone());
        Ok(record)
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<PredictionRecord>, StoreError> {
        let table = self.predictions.read().await;
        let mut rows: Vec<_> = table.iter().filter(|p| p.user_id == user_id).cloned().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }
}

fn chat_row(new: NewChatMessage) -> ChatMessage {
    ChatMessage {
        id: Uuid::new_v4(),
        user_id: new.user_id,
        message: new.message,
        sender: new.sender,
        category: new.category,
        created_at: OffsetDateTime::now_utc(),
    }
}

#[async_trait]
impl ChatStore for MemStore {
    async fn append_turn(
        &self,
        user_msg: NewChatMessage,
        bot_msg: NewChatMessage,
    ) -> Result<(ChatMessage, ChatMessage), StoreError> {
        // One write lock for the pair: a turn lands as two rows or none.
        let mut table = self.chats.write().await;
        let user_row = chat_row(user_msg);
        let bot_row = chat_row(bot_msg);
        table.push(user_row.clone());
        table.push(bot_row.clone());
        Ok((user_row, bot_row))
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ChatMessage>, StoreError> {
        let table = self.chats.read().await;
        let mut rows: Vec<_> = table.iter().filter(|m| m.user_id == user_id).cloned().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }
}

#[async_trait]
impl StoreHealth for MemStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::{Role, Sender};

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ama".into(),
            email: email.into(),
            password_hash: "$argon2id$fake".into(),
            role: Role::Farmer,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = MemStore::new();
        UserStore::create(&store, new_user("ama@example.com"))
            .await
            .expect("first insert");
        let err = UserStore::create(&store, new_user("ama@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));

        let found = store.find_by_email("ama@example.com").await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn concurrent_registration_has_one_winner() {
        let store = Arc::new(MemStore::new());
        let a = {
            let store = store.clone();
            tokio::spawn(async move { UserStore::create(&*store, new_user("race@example.com")).await })
        };
        let b = {
            let store = store.clone();
            tokio::spawn(async move { UserStore::create(&*store, new_user("race@example.com")).await })
        };
        let (ra, rb) = (a.await.unwrap(), b.await.unwrap());
        assert_eq!(ra.is_ok() as u8 + rb.is_ok() as u8, 1, "exactly one winner");
    }

    #[tokio::test]
    async fn prediction_rows_are_scoped_to_owner() {
        let store = MemStore::new();
        let owner = UserStore::create(&store, new_user("owner@example.com")).await.unwrap();
        let other = UserStore::create(&store, new_user("other@example.com")).await.unwrap();

        PredictionStore::create(
            &store,
            NewPrediction {
                user_id: owner.id,
                crop: "maize".into(),
                region: "nakuru".into(),
                yield_estimate: 5.1,
                confidence: 91.0,
                factors: vec![],
                recommendations: vec![],
            },
        )
        .await
        .unwrap();

        let mine = PredictionStore::list_by_user(&store, owner.id, 20).await.unwrap();
        let theirs = PredictionStore::list_by_user(&store, other.id, 20).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert!(theirs.is_empty());
    }

    #[tokio::test]
    async fn chat_turn_lands_as_two_rows() {
        let store = MemStore::new();
        let user = UserStore::create(&store, new_user("chat@example.com")).await.unwrap();
        let msg = |sender, text: &str| NewChatMessage {
            user_id: user.id,
            message: text.into(),
            sender,
            category: "crops".into(),
        };
        let (user_row, bot_row) = ChatStore::append_turn(
            &store,
            msg(Sender::User, "When should I plant maize?"),
            msg(Sender::Bot, "Plant at the onset of the long rains."),
        )
        .await
        .unwrap();
        assert_eq!(user_row.sender, Sender::User);
        assert_eq!(bot_row.sender, Sender::Bot);

        let rows = ChatStore::list_by_user(&store, user.id, 10).await.unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn seed_is_idempotent() {
        let store = MemStore::new();
        let batch = || {
            vec![NewNotification {
                message: "Rain expected".into(),
                kind: crate::store::NotificationKind::Weather,
                priority: crate::store::Priority::Medium,
            }]
        };
        store.seed(batch()).await.unwrap();
        store.seed(batch()).await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), 1);
    }
}
