use thiserror::Error;

/// Failures surfaced by the model layer. Handlers match on the first three
/// variants to map them back onto forms or a 404; `Other` is any unexpected
/// storage failure and becomes a generic server error.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("no matching record found")]
    NoRecord,

    #[error("duplicate email")]
    DuplicateEmail,

    /// Covers both unknown-email and wrong-password so callers cannot tell
    /// which one occurred.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
