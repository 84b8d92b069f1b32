/*
 * Responsibility
 * - In-process Store used when DATABASE_URL is unset (and by tests)
 * - Enforces the same unique keys as the Postgres schema
 */
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};
use crate::repos::store::{BookingRow, EventRow, NewEvent, NewUser, Store, UserRow};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<UserRow>,
    events: Vec<EventRow>,
    bookings: Vec<BookingRow>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, user: NewUser) -> RepoResult<UserRow> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(RepoError::duplicate([("email", user.email)]));
        }

        let row = UserRow {
            id: Uuid::new_v4(),
            email: user.email,
            name: user.name,
            created_at: Utc::now(),
        };
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn list_events(&self) -> RepoResult<Vec<EventRow>> {
        let tables = self.tables.read().await;
        let mut rows = tables.events.clone();
        rows.sort_by(|a, b| a.starts_at.cmp(&b.starts_at));
        Ok(rows)
    }

    async fn get_event(&self, event_id: Uuid) -> RepoResult<Option<EventRow>> {
        let tables = self.tables.read().await;
        Ok(tables.events.iter().find(|e| e.id == event_id).cloned())
    }

    async fn create_event(&self, event: NewEvent) -> RepoResult<EventRow> {
        let row = EventRow {
            id: Uuid::new_v4(),
            owner_id: event.owner_id,
            title: event.title,
            description: event.description,
            price: event.price,
            starts_at: event.starts_at,
            created_at: Utc::now(),
        };
        self.tables.write().await.events.push(row.clone());
        Ok(row)
    }

    async fn create_booking(&self, event_id: Uuid, user_id: &str) -> RepoResult<BookingRow> {
        let mut tables = self.tables.write().await;
        if tables
            .bookings
            .iter()
            .any(|b| b.event_id == event_id && b.user_id == user_id)
        {
            return Err(RepoError::duplicate([
                ("event_id", event_id.to_string()),
                ("user_id", user_id.to_string()),
            ]));
        }

        let row = BookingRow {
            id: Uuid::new_v4(),
            event_id,
            user_id: user_id.to_string(),
            created_at: Utc::now(),
        };
        tables.bookings.push(row.clone());
        Ok(row)
    }
}
