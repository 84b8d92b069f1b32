/*
 * Responsibility
 * - Users の request/response DTO
 * - validate() turns the raw request into a NewUser or the full list of field issues
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::store::{NewUser, UserRow};
use crate::validation::ValidationErrors;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
}

impl CreateUserRequest {
    pub fn validate(self) -> Result<NewUser, ValidationErrors> {
        let email = self.email.trim().to_ascii_lowercase();
        let name = self.name.trim().to_string();

        let mut errors = ValidationErrors::new();
        errors.check(
            email.split_once('@').is_some_and(|(local, domain)| {
                !local.is_empty() && !domain.is_empty()
            }),
            "email",
            "must be a valid email address",
        );
        errors.check(!name.is_empty(), "name", "is required");
        errors.check(name.chars().count() <= 100, "name", "must be <= 100 chars");

        errors.finish(NewUser { email, name })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            name: row.name,
            created_at: row.created_at,
        }
    }
}
