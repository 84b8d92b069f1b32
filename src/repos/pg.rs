/*
 * Responsibility
 * - Postgres-backed Store (SQLx)
 * - Runs the bundled migrations on connect
 * - Every sqlx::Error goes through RepoError::from_sqlx so unique violations keep their meaning
 */
use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};
use crate::repos::store::{BookingRow, EventRow, NewEvent, NewUser, Store, UserRow};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("failed to connect to DATABASE_URL")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run migrations")?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, user: NewUser) -> RepoResult<UserRow> {
        sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, email, name)
            VALUES ($1, $2, $3)
            RETURNING id, email, name, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.email)
        .bind(&user.name)
        .fetch_one(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)
    }

    async fn list_events(&self) -> RepoResult<Vec<EventRow>> {
        sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, owner_id, title, description, price, starts_at, created_at
            FROM events
            ORDER BY starts_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)
    }

    async fn get_event(&self, event_id: Uuid) -> RepoResult<Option<EventRow>> {
        sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, owner_id, title, description, price, starts_at, created_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)
    }

    async fn create_event(&self, event: NewEvent) -> RepoResult<EventRow> {
        sqlx::query_as::<_, EventRow>(
            r#"
            INSERT INTO events (id, owner_id, title, description, price, starts_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, owner_id, title, description, price, starts_at, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&event.owner_id)
        .bind(&event.title)
        .bind(event.description.as_deref())
        .bind(event.price)
        .bind(event.starts_at)
        .fetch_one(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)
    }

    async fn create_booking(&self, event_id: Uuid, user_id: &str) -> RepoResult<BookingRow> {
        sqlx::query_as::<_, BookingRow>(
            r#"
            INSERT INTO bookings (id, event_id, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, event_id, user_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(event_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)
    }
}
