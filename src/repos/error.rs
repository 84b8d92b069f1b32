/*
 * Responsibility
 * - What the store layer tells the layers above
 * - Unique-key violations are lifted into `Duplicate` with the conflicting field/value pairs
 */
use serde_json::{Map, Value};
use sqlx::error::{DatabaseError, ErrorKind};
use sqlx::postgres::PgDatabaseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("duplicate key")]
    Duplicate { fields: Map<String, Value> },
    #[error("db error")]
    Db(#[from] sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;

impl RepoError {
    pub fn duplicate<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        RepoError::Duplicate {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn from_sqlx(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(dbe) = &e
            && let Some(fields) = unique_violation_fields(&**dbe)
        {
            return RepoError::Duplicate { fields };
        }
        RepoError::Db(e)
    }
}

/// Conflicting fields of a unique violation, `None` for any other database error.
///
/// Postgres reports them in the detail line; when that is unavailable the violation is still
/// recognised, just without field details.
pub fn unique_violation_fields(dbe: &dyn DatabaseError) -> Option<Map<String, Value>> {
    if !matches!(dbe.kind(), ErrorKind::UniqueViolation) {
        return None;
    }

    let fields = dbe
        .try_downcast_ref::<PgDatabaseError>()
        .and_then(PgDatabaseError::detail)
        .and_then(parse_key_detail)
        .unwrap_or_default();

    Some(fields)
}

// "Key (owner_id, title)=(u1, Standup) already exists."
fn parse_key_detail(detail: &str) -> Option<Map<String, Value>> {
    let rest = detail.strip_prefix("Key (")?;
    let (columns, rest) = rest.split_once(")=(")?;
    let (values, _) = rest.rsplit_once(") already exists")?;

    let columns: Vec<&str> = columns.split(", ").collect();
    let values: Vec<&str> = if columns.len() == 1 {
        vec![values]
    } else {
        values.split(", ").collect()
    };

    if columns.len() != values.len() {
        return None;
    }

    Some(
        columns
            .into_iter()
            .zip(values)
            .map(|(c, v)| (c.to_string(), Value::String(v.to_string())))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_single_column_detail() {
        let fields = parse_key_detail("Key (email)=(ada@example.com) already exists.").unwrap();
        assert_eq!(Value::Object(fields), json!({ "email": "ada@example.com" }));
    }

    #[test]
    fn single_column_value_may_contain_commas() {
        let fields = parse_key_detail("Key (name)=(Lovelace, Ada) already exists.").unwrap();
        assert_eq!(Value::Object(fields), json!({ "name": "Lovelace, Ada" }));
    }

    #[test]
    fn parses_composite_detail() {
        let fields =
            parse_key_detail("Key (event_id, user_id)=(e-1, u-9) already exists.").unwrap();
        assert_eq!(
            Value::Object(fields),
            json!({ "event_id": "e-1", "user_id": "u-9" })
        );
    }

    #[test]
    fn rejects_unrelated_detail() {
        assert!(parse_key_detail("Failing row contains (null).").is_none());
        assert!(parse_key_detail("Key (a, b)=(x, y, z) already exists.").is_none());
    }

    #[test]
    fn duplicate_builder_keeps_pairs() {
        let err = RepoError::duplicate([("email", "ada@example.com")]);
        match err {
            RepoError::Duplicate { fields } => {
                assert_eq!(fields.get("email"), Some(&json!("ada@example.com")));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
