/*
 * Responsibility
 * - Persistence seam used by handlers (users / events / bookings)
 * - Rows are plain data; handlers map them into response DTOs
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub starts_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct BookingRow {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub starts_at: DateTime<Utc>,
}

/// Unique keys: `users.email`, `bookings(event_id, user_id)`.
/// Implementations report violations as `RepoError::Duplicate`.
#[async_trait]
pub trait Store: Send + Sync {
    async fn create_user(&self, user: NewUser) -> RepoResult<UserRow>;

    async fn list_events(&self) -> RepoResult<Vec<EventRow>>;

    async fn get_event(&self, event_id: Uuid) -> RepoResult<Option<EventRow>>;

    async fn create_event(&self, event: NewEvent) -> RepoResult<EventRow>;

    async fn create_booking(&self, event_id: Uuid, user_id: &str) -> RepoResult<BookingRow>;
}
