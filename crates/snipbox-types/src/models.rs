use chrono::{DateTime, Utc};

/// A stored text note with a creation time and an expiry. Snippets are
/// immutable once created and are never deleted in-app; expiry is a query
/// filter in the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Snippet {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created: DateTime<Utc>,
    pub expires: DateTime<Utc>,
}

/// An account holder. The password hash never leaves the store and is
/// deliberately absent here.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created: DateTime<Utc>,
}
