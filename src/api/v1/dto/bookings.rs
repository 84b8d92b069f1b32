use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::repos::store::BookingRow;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<BookingRow> for BookingResponse {
    fn from(row: BookingRow) -> Self {
        Self {
            id: row.id,
            event_id: row.event_id,
            user_id: row.user_id,
            created_at: row.created_at,
        }
    }
}
