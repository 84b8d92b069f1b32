/*
 * Responsibility
 * - Events の request/response DTO
 * - `date` arrives as a string so a bad timestamp is a field issue, not a JSON rejection
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::store::{EventRow, NewEvent};
use crate::validation::ValidationErrors;

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub date: String,
}

impl CreateEventRequest {
    pub fn validate(self, owner_id: &str) -> Result<NewEvent, ValidationErrors> {
        let title = self.title.trim().to_string();
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        let mut errors = ValidationErrors::new();
        errors.check(!title.is_empty(), "title", "is required");
        errors.check(title.chars().count() <= 200, "title", "must be <= 200 chars");
        if let Some(d) = &description {
            errors.check(
                d.chars().count() <= 2000,
                "description",
                "must be <= 2000 chars",
            );
        }
        errors.check(self.price > 0.0, "price", "must be positive");

        let starts_at = match DateTime::parse_from_rfc3339(self.date.trim()) {
            Ok(dt) => Some(dt.with_timezone(&Utc)),
            Err(_) => {
                errors.add("date", "must be an RFC 3339 timestamp");
                None
            }
        };

        match starts_at {
            Some(starts_at) => errors.finish(NewEvent {
                owner_id: owner_id.to_string(),
                title,
                description,
                price: self.price,
                starts_at,
            }),
            None => Err(errors),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: Uuid,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<EventRow> for EventResponse {
    fn from(row: EventRow) -> Self {
        Self {
            id: row.id,
            owner_id: row.owner_id,
            title: row.title,
            description: row.description,
            price: row.price,
            date: row.starts_at,
            created_at: row.created_at,
        }
    }
}
