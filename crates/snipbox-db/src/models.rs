//! Database row types — these map directly to SQLite rows.
//! Distinct from the snipbox-types entities so timestamp parsing stays in
//! the DB layer.

use chrono::{DateTime, NaiveDateTime, Utc};
use snipbox_types::{Snippet, User};
use tracing::warn;

pub struct SnippetRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created: String,
    pub expires: String,
}

pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub hashed_password: String,
    pub created: String,
}

impl SnippetRow {
    pub fn into_snippet(self) -> Snippet {
        Snippet {
            id: self.id,
            title: self.title,
            content: self.content,
            created: parse_datetime(&self.created),
            expires: parse_datetime(&self.expires),
        }
    }
}

impl UserRow {
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            created: parse_datetime(&self.created),
        }
    }
}

/// SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone.
/// Parse as naive UTC, falling back to RFC 3339.
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .or_else(|_| s.parse::<DateTime<Utc>>())
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}': {}", s, e);
            DateTime::default()
        })
}
