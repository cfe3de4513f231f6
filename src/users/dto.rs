use serde::{Deserialize, Serialize};
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime,
};
use uuid::Uuid;

/// Request body for user creation, also used for each bulk entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_second: String,
    #[serde(default)]
    pub cellphone: String,
}

/// Request body for `PUT /users/:id`; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub password: Option<String>,
    pub cellphone: Option<String>,
}

/// Bulk body. Entries stay raw JSON so each one is decoded on its own.
#[derive(Debug, Deserialize)]
pub struct BulkCreateRequest {
    pub users: Vec<serde_json::Value>,
}

/// Query string for `GET /users/search`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindUsersQuery {
    pub name: Option<String>,
    /// `"true"` selects soft-deleted users, any other value active ones.
    pub eliminado: Option<String>,
    pub last_login_before: Option<String>,
    pub last_login_after: Option<String>,
}

/// Reason a bulk entry was or wasn't inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BulkOutcome {
    Created { id: Uuid },
    /// Entry could not be decoded as a create request.
    Invalid,
    PasswordMismatch,
    AlreadyExists,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkItemResult {
    pub index: usize,
    pub email: String,
    #[serde(flatten)]
    pub outcome: BulkOutcome,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkReport {
    pub created: usize,
    pub failed: usize,
    pub results: Vec<BulkItemResult>,
}

impl BulkReport {
    pub fn record(&mut self, index: usize, email: String, outcome: BulkOutcome) {
        match outcome {
            BulkOutcome::Created { .. } => self.created += 1,
            _ => self.failed += 1,
        }
        self.results.push(BulkItemResult {
            index,
            email,
            outcome,
        });
    }
}

/// Parses a timestamp from a query string. Accepts RFC 3339, a naive
/// `YYYY-MM-DDTHH:MM[:SS[.fff]]` (UTC) or a bare `YYYY-MM-DD` (UTC midnight).
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(ts);
    }
    let naive = PrimitiveDateTime::parse(
        raw,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
    )
    .or_else(|_| {
        PrimitiveDateTime::parse(
            raw,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        )
    })
    .or_else(|_| {
        PrimitiveDateTime::parse(raw, format_description!("[year]-[month]-[day]T[hour]:[minute]"))
    });
    if let Ok(ts) = naive {
        return Some(ts.assume_utc());
    }
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|d| d.midnight().assume_utc())
}
