use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::types::{
    ChatMessage, Factor, NewChatMessage, NewNotification, NewPrediction, NewUser, Notification,
    PredictionRecord, User,
};
use super::{ChatStore, NotificationStore, PredictionStore, StoreError, StoreHealth, UserStore};

/// Postgres-backed store. The `users.email` unique index is the arbiter for
/// concurrent registrations.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_sqlx(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return StoreError::DuplicateEmail;
        }
    }
    StoreError::Other(e.into())
}

/// Row shape for predictions; factors and recommendations live in JSONB.
#[derive(Debug, FromRow)]
struct PredictionRow {
    id: Uuid,
    user_id: Uuid,
    crop: String,
    region: String,
    yield_estimate: f64,
    confidence: f64,
    factors: Json<Vec<Factor>>,
    recommendations: Json<Vec<String>>,
    created_at: OffsetDateTime,
}

impl From<PredictionRow> for PredictionRecord {
    fn from(r: PredictionRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            crop: r.crop,
            region: r.region,
            yield_estimate: r.yield_estimate,
            confidence: r.confidence,
            factors: r.factors.0,
            recommendations: r.recommendations.0,
            created_at: r.created_at,
        }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create(&self, new: NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, role, created_at
            "#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(new.role)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(user)
    }
}

#[async_trait]
impl NotificationStore for PgStore {
    async fn list(&self) -> Result<Vec<Notification>, StoreError> {
        let rows = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, message, kind, priority, created_at
            FROM notifications
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(rows)
    }

    async fn seed(&self, items: Vec<NewNotification>) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM notifications")
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx)?;
        if count > 0 {
            return Ok(());
        }
        for item in items {
            sqlx::query(
                r#"
                INSERT INTO notifications (message, kind, priority)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(&item.message)
            .bind(item.kind)
            .bind(item.priority)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx)?;
        }
        tx.commit().await.map_err(map_sqlx)?;
        Ok(())
    }
}

#[async_trait]
impl PredictionStore for PgStore {
    async fn create(&self, new: NewPrediction) -> Result<PredictionRecord, StoreError> {
        let row = sqlx::query_as::<_, PredictionRow>(
            r#"
            INSERT INTO predictions
                (user_id, crop, region, yield_estimate, confidence, factors, recommendations)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, crop, region, yield_estimate, confidence,
                      factors, recommendations, created_at
            "#,
        )
        .bind(new.user_id)
        .bind(&new.crop)
        .bind(&new.region)
        .bind(new.yield_estimate)
        .bind(new.confidence)
        .bind(Json(&new.factors))
        .bind(Json(&new.recommendations))
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(row.into())
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<PredictionRecord>, StoreError> {
        let rows = sqlx::query_as::<_, PredictionRow>(
            r#"
            SELECT id, user_id, crop, region, yield_estimate, confidence,
                   factors, recommendations, created_at
            FROM predictions
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

async fn insert_chat_message(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    new: &NewChatMessage,
) -> Result<ChatMessage, sqlx::Error> {
    sqlx::query_as::<_, ChatMessage>(
        r#"
        INSERT INTO chat_messages (user_id, message, sender, category)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, message, sender, category, created_at
        "#,
    )
    .bind(new.user_id)
    .bind(&new.message)
    .bind(new.sender)
    .bind(&new.category)
    .fetch_one(&mut **tx)
    .await
}

#[async_trait]
impl ChatStore for PgStore {
    async fn append_turn(
        &self,
        user_msg: NewChatMessage,
        bot_msg: NewChatMessage,
    ) -> Result<(ChatMessage, ChatMessage), StoreError> {
        // Both rows commit together; a failed bot insert rolls back the
        // user-side row as well.
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;
        let user_row = insert_chat_message(&mut tx, &user_msg).await.map_err(map_sqlx)?;
        let bot_row = insert_chat_message(&mut tx, &bot_msg).await.map_err(map_sqlx)?;
        tx.commit().await.map_err(map_sqlx)?;
        Ok((user_row, bot_row))
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ChatMessage>, StoreError> {
        let rows = sqlx::query_as::<_, ChatMessage>(
            r#"
            SELECT id, user_id, message, sender, category, created_at
            FROM chat_messages
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(rows)
    }
}

#[async_trait]
impl StoreHealth for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(())
    }
}
