use crate::{ModelError, Snippet, User};

/// Storage capability for snippets. Implemented by the SQLite-backed
/// `Database` in snipbox-db and by in-memory doubles in handler tests.
pub trait SnippetStore: Send + Sync {
    /// Inserts a snippet expiring `expires_days` from now and returns the
    /// storage-assigned id.
    fn insert(&self, title: &str, content: &str, expires_days: i64) -> Result<i64, ModelError>;

    /// Fetches a snippet by id. Unknown and already-expired ids both fail
    /// with `NoRecord`.
    fn get(&self, id: i64) -> Result<Snippet, ModelError>;

    /// The most recent non-expired snippets, newest first.
    fn latest(&self) -> Result<Vec<Snippet>, ModelError>;
}

/// Storage capability for user accounts.
pub trait UserStore: Send + Sync {
    /// Creates an account, hashing the password before storage. Fails with
    /// `DuplicateEmail` if the email is already registered.
    fn insert(&self, name: &str, email: &str, password: &str) -> Result<(), ModelError>;

    /// Verifies the credentials and returns the user id. Unknown email and
    /// wrong password collapse into the same `InvalidCredentials`.
    fn authenticate(&self, email: &str, password: &str) -> Result<i64, ModelError>;

    /// Whether an account with this id exists. Used to drop stale session
    /// identities.
    fn exists(&self, id: i64) -> Result<bool, ModelError>;

    fn get(&self, id: i64) -> Result<User, ModelError>;

    /// Re-verifies `current_password` before overwriting the stored hash
    /// with the hash of `new_password`.
    fn password_update(
        &self,
        id: i64,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ModelError>;
}
