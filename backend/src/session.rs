//! Session context
//!
//! The logged-in username is kept in a signed cookie. `CurrentUser` resolves
//! it for handlers and only accepts usernames that are still registered.

use crate::error::AppError;
use crate::state::AppState;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use sha2::{Digest, Sha512};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "username";

/// Derive the cookie signing key from the configured secret
pub fn signing_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

/// Bind `username` to the client
pub fn start(jar: SignedCookieJar, username: &str) -> SignedCookieJar {
    jar.add(
        Cookie::build((SESSION_COOKIE, username.to_owned()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build(),
    )
}

/// Drop the session binding
pub fn end(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/").build())
}

/// Username stored in the session cookie, if the signature checks out
pub fn username(jar: &SignedCookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_owned())
}

/// The authenticated user of a request
///
/// Rejects with `AppError::Unauthorized`; page handlers take
/// `Option<CurrentUser>` and redirect instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub String);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = SignedCookieJar::<Key>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::Unauthorized)?;

        let username = username(&jar).ok_or(AppError::Unauthorized)?;

        // A signed cookie can outlive the in-memory registry (e.g. a restart).
        if !state.store.read().await.users.contains(&username) {
            tracing::debug!(username = %username, "Session for unknown user");
            return Err(AppError::Unauthorized);
        }

        Ok(CurrentUser(username))
    }
}
