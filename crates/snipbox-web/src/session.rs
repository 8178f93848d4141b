use tower_sessions::Session;

use crate::error::Error;

/// Session key for the authenticated user's id.
pub const AUTH_USER_ID_KEY: &str = "authenticated_user_id";
/// One-shot flash message shown on the next rendered page.
pub const FLASH_KEY: &str = "flash";
/// Path stashed by the auth gate so login can send the user back.
pub const PATH_BEFORE_LOGIN_KEY: &str = "path_before_login";

pub async fn set_flash(session: &Session, message: &str) -> Result<(), Error> {
    session.insert(FLASH_KEY, message).await?;
    Ok(())
}

/// Read-once: the flash is removed as it is read.
pub async fn pop_flash(session: &Session) -> Result<Option<String>, Error> {
    Ok(session.remove::<String>(FLASH_KEY).await?)
}

pub async fn auth_user_id(session: &Session) -> Result<Option<i64>, Error> {
    Ok(session.get::<i64>(AUTH_USER_ID_KEY).await?)
}
