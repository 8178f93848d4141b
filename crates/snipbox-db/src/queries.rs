use anyhow::anyhow;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use rusqlite::Connection;

use snipbox_types::{ModelError, Snippet, SnippetStore, User, UserStore};

use crate::Database;
use crate::models::{SnippetRow, UserRow};

/// Snippets per listing page.
const LATEST_LIMIT: u32 = 10;

impl SnippetStore for Database {
    fn insert(&self, title: &str, content: &str, expires_days: i64) -> Result<i64, ModelError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO snippets (title, content, created, expires)
                 VALUES (?1, ?2, datetime('now'), datetime('now', ?3))",
                rusqlite::params![title, content, format!("{:+} days", expires_days)],
            )
            .map_err(db_err)?;
            Ok(conn.last_insert_rowid())
        })
    }

    fn get(&self, id: i64) -> Result<Snippet, ModelError> {
        self.with_conn(|conn| {
            query_snippet(conn, id)?
                .map(SnippetRow::into_snippet)
                .ok_or(ModelError::NoRecord)
        })
    }

    fn latest(&self) -> Result<Vec<Snippet>, ModelError> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, title, content, created, expires FROM snippets
                     WHERE expires > datetime('now')
                     ORDER BY created DESC, id DESC
                     LIMIT ?1",
                )
                .map_err(db_err)?;

            let rows = stmt
                .query_map([LATEST_LIMIT], snippet_row)
                .map_err(db_err)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(db_err)?;

            Ok(rows.into_iter().map(SnippetRow::into_snippet).collect())
        })
    }
}

impl UserStore for Database {
    fn insert(&self, name: &str, email: &str, password: &str) -> Result<(), ModelError> {
        let hashed = hash_password(password)?;

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (name, email, hashed_password, created)
                 VALUES (?1, ?2, ?3, datetime('now'))",
                (name, email, hashed.as_str()),
            )
            .map_err(|e| {
                // The email UNIQUE constraint surfaces as a constraint
                // violation naming users.email.
                if let rusqlite::Error::SqliteFailure(inner, Some(msg)) = &e {
                    if inner.code == rusqlite::ErrorCode::ConstraintViolation
                        && msg.contains("users.email")
                    {
                        return ModelError::DuplicateEmail;
                    }
                }
                db_err(e)
            })?;
            Ok(())
        })
    }

    fn authenticate(&self, email: &str, password: &str) -> Result<i64, ModelError> {
        let row = self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, hashed_password FROM users WHERE email = ?1",
                [email],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()
        })?;

        // Unknown email and wrong password collapse into the same error so
        // the response cannot be used to probe for registered addresses.
        let (id, hashed) = row.ok_or(ModelError::InvalidCredentials)?;
        verify_password(&hashed, password)?;
        Ok(id)
    }

    fn exists(&self, id: i64) -> Result<bool, ModelError> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)",
                [id],
                |row| row.get(0),
            )
            .map_err(db_err)
        })
    }

    fn get(&self, id: i64) -> Result<User, ModelError> {
        self.with_conn(|conn| {
            query_user(conn, id)?
                .map(UserRow::into_user)
                .ok_or(ModelError::NoRecord)
        })
    }

    fn password_update(
        &self,
        id: i64,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ModelError> {
        let hashed: String = self
            .with_conn(|conn| {
                conn.query_row(
                    "SELECT hashed_password FROM users WHERE id = ?1",
                    [id],
                    |row| row.get(0),
                )
                .optional()
            })?
            .ok_or(ModelError::NoRecord)?;

        verify_password(&hashed, current_password)?;

        let new_hash = hash_password(new_password)?;
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE users SET hashed_password = ?1 WHERE id = ?2",
                (new_hash.as_str(), id),
            )
            .map_err(db_err)?;
            Ok(())
        })
    }
}

fn hash_password(password: &str) -> Result<String, ModelError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ModelError::Other(anyhow!("password hash failed: {}", e)))?;
    Ok(hash.to_string())
}

fn verify_password(hashed: &str, password: &str) -> Result<(), ModelError> {
    let parsed = PasswordHash::new(hashed)
        .map_err(|e| ModelError::Other(anyhow!("corrupt password hash: {}", e)))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(()),
        Err(argon2::password_hash::Error::Password) => Err(ModelError::InvalidCredentials),
        Err(e) => Err(ModelError::Other(anyhow!("password verify failed: {}", e))),
    }
}

fn query_snippet(conn: &Connection, id: i64) -> Result<Option<SnippetRow>, ModelError> {
    let mut stmt = conn
        .prepare(
            "SELECT id, title, content, created, expires FROM snippets
             WHERE expires > datetime('now') AND id = ?1",
        )
        .map_err(db_err)?;

    stmt.query_row([id], snippet_row).optional()
}

fn query_user(conn: &Connection, id: i64) -> Result<Option<UserRow>, ModelError> {
    let mut stmt = conn
        .prepare("SELECT id, name, email, hashed_password, created FROM users WHERE id = ?1")
        .map_err(db_err)?;

    stmt.query_row([id], |row| {
        Ok(UserRow {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            hashed_password: row.get(3)?,
            created: row.get(4)?,
        })
    })
    .optional()
}

fn snippet_row(row: &rusqlite::Row) -> Result<SnippetRow, rusqlite::Error> {
    Ok(SnippetRow {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        created: row.get(3)?,
        expires: row.get(4)?,
    })
}

fn db_err(e: rusqlite::Error) -> ModelError {
    ModelError::Other(e.into())
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, ModelError>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>, ModelError> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(db_err(e)),
        }
    }
}
