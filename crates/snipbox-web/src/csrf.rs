use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use tower_sessions::Session;

use crate::error::Error;

const CSRF_KEY: &str = "csrf_token";

/// Returns the session's anti-forgery token, minting one on first use. The
/// token is rendered into every form as a hidden `csrf_token` input.
pub async fn issue_token(session: &Session) -> Result<String, Error> {
    if let Some(token) = session.get::<String>(CSRF_KEY).await? {
        return Ok(token);
    }

    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    let token = URL_SAFE_NO_PAD.encode(bytes);

    session.insert(CSRF_KEY, &token).await?;
    Ok(token)
}

/// State-changing submissions must echo the session token back; anything
/// else is rejected before the form is acted on.
pub async fn verify(session: &Session, submitted: &str) -> Result<(), Error> {
    match session.get::<String>(CSRF_KEY).await? {
        Some(token) if !submitted.is_empty() && tokens_match(&token, submitted) => Ok(()),
        _ => Err(Error::BadRequest),
    }
}

/// Length-safe comparison that does not bail at the first mismatched byte.
fn tokens_match(a: &str, b: &str) -> bool {
    a.len() == b.len()
        && a.bytes()
            .zip(b.bytes())
            .fold(0u8, |acc, (x, y)| acc | (x ^ y))
            == 0
}
