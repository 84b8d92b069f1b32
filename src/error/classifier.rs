//! Failure classification.
//!
//! `classify` is total. Rules are tried in order against the whole source chain of the failure, so
//! a duplicate-key error wrapped in context is still a conflict. New failure shapes get a rule here
//! and nowhere else.

use std::borrow::Cow;
use std::error::Error as StdError;

use serde_json::Value;

use super::{AppError, ClassifiedError, ErrorKind};
use crate::repos::error::{RepoError, unique_violation_fields};
use crate::validation::ValidationErrors;

type Rule = fn(&(dyn StdError + 'static)) -> Option<ClassifiedError>;

// Most specific first.
const RULES: [Rule; 3] = [uniqueness_violation, input_validation, pre_classified];

pub fn classify(failure: &(dyn StdError + 'static)) -> ClassifiedError {
    for rule in RULES {
        if let Some(classified) = chain(failure).find_map(rule) {
            return classified;
        }
    }

    // Only the server log ever sees the original error.
    tracing::error!(error = %Report(failure), "unclassified failure");
    ClassifiedError::internal()
}

fn chain<'a>(
    failure: &'a (dyn StdError + 'static),
) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(Some(failure), |&e| e.source())
}

fn uniqueness_violation(failure: &(dyn StdError + 'static)) -> Option<ClassifiedError> {
    let fields = if let Some(RepoError::Duplicate { fields }) = failure.downcast_ref::<RepoError>()
    {
        fields.clone()
    } else if let Some(sqlx::Error::Database(dbe)) = failure.downcast_ref::<sqlx::Error>() {
        unique_violation_fields(&**dbe)?
    } else {
        return None;
    };

    let message = if fields.is_empty() {
        "duplicate value".to_string()
    } else {
        let names: Vec<&str> = fields.keys().map(String::as_str).collect();
        format!("duplicate value for {}", names.join(", "))
    };

    Some(ClassifiedError::of_kind(
        ErrorKind::Conflict,
        message,
        Some(Value::Object(fields)),
    ))
}

fn input_validation(failure: &(dyn StdError + 'static)) -> Option<ClassifiedError> {
    let errors = failure.downcast_ref::<ValidationErrors>()?;
    let details = serde_json::to_value(errors.issues()).ok()?;

    Some(ClassifiedError::of_kind(
        ErrorKind::BadInput,
        "invalid input",
        Some(details),
    ))
}

fn pre_classified(failure: &(dyn StdError + 'static)) -> Option<ClassifiedError> {
    let err = failure.downcast_ref::<AppError>()?;
    let kind = ErrorKind::from_carried_code(err.code());

    Some(ClassifiedError {
        kind,
        message: Cow::Owned(err.to_string()),
        status: kind.status(),
        code: Cow::Borrowed(err.code()),
        details: err.details().cloned(),
    })
}

// "outer: inner: root" for the log line
struct Report<'a>(&'a (dyn StdError + 'static));

impl std::fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for e in chain(self.0) {
            if !first {
                f.write_str(": ")?;
            }
            write!(f, "{e}")?;
            first = false;
        }
        Ok(())
    }
}
